use std::collections::BTreeSet;
use std::sync::Arc;

use crate::schema::WorkspaceDocument;

/// Side effects requested by the store; carried out by the owner of the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Write this document to durable storage.
    Persist(Arc<WorkspaceDocument>),
    /// The set of bound channels changed; `None` means subscribe to everything.
    SubscribeSlots(Option<BTreeSet<String>>),
}
