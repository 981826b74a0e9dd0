//! Persisted workspace document: versioned shape, validation and migration.
//!
//! The on-disk document is strict about its `version` and overall shape. Anything that
//! reaches the kernel through [`validate`] is a well-formed [`WorkspaceDocument`].

pub mod error;
pub mod migrate;
pub mod v1;

pub use error::{DocumentError, MigrationError, ValidationIssue};
pub use migrate::{MigrationStep, Migrator};
pub use v1::{
    AxisConstraint, DashboardId, DashboardRecord, DashboardsRecord, Viewport, WidgetId,
    WidgetLayout, WidgetLayoutConstraints, WidgetRecord, WorkspaceDocument,
};

/// Version literal every accepted document must carry.
pub const CURRENT_VERSION: u32 = v1::VERSION;

/// Parses raw document text into an untyped JSON value.
pub fn parse(text: &str) -> Result<serde_json::Value, DocumentError> {
    serde_json::from_str(text).map_err(|e| DocumentError::Parse(e.to_string()))
}

/// Validates an untrusted value against the current schema.
///
/// Never applies anything partially: either the whole document is returned or every
/// violation found is reported.
pub fn validate(candidate: &serde_json::Value) -> Result<WorkspaceDocument, DocumentError> {
    v1::validate(candidate)
}
