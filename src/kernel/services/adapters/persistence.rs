use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::kernel::services::ports::{StorageError, WorkspaceStorage};
use crate::kernel::services::{StoreBusSender, StoreMessage};
use crate::kernel::Effect;
use crate::schema::WorkspaceDocument;

enum WriterMsg {
    Save(Arc<WorkspaceDocument>),
    Flush(oneshot::Sender<()>),
}

/// Moves workspace documents between the store and durable storage off the store's thread.
pub struct PersistenceService {
    runtime: tokio::runtime::Runtime,
    storage: Arc<dyn WorkspaceStorage>,
    bus: StoreBusSender,
    writer_tx: Option<mpsc::UnboundedSender<WriterMsg>>,
    writer: Option<JoinHandle<()>>,
}

impl PersistenceService {
    pub fn new(
        storage: Arc<dyn WorkspaceStorage>,
        bus: StoreBusSender,
        debounce: Duration,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;

        let (writer_tx, writer_rx) = mpsc::unbounded_channel();
        let writer = runtime.spawn(run_writer(storage.clone(), writer_rx, debounce));

        Ok(Self {
            runtime,
            storage,
            bus,
            writer_tx: Some(writer_tx),
            writer: Some(writer),
        })
    }

    /// Reads the stored document and posts [`StoreMessage::Hydrated`] on the bus.
    pub fn hydrate(&self) {
        let storage = self.storage.clone();
        let bus = self.bus.clone();
        self.runtime.spawn(async move {
            let result = match tokio::task::spawn_blocking(move || storage.load()).await {
                Ok(result) => result,
                Err(e) => Err(StorageError::io("workspace", io::Error::other(e))),
            };
            if bus.send(StoreMessage::Hydrated(result)).is_err() {
                tracing::warn!("store bus closed before hydration finished");
            }
        });
    }

    /// Queues `document` for writing. Rapid successive calls coalesce into one write,
    /// which still lands within a few debounce windows under a steady stream of calls.
    pub fn persist(&self, document: Arc<WorkspaceDocument>) {
        let Some(tx) = self.writer_tx.as_ref() else {
            return;
        };
        if tx.send(WriterMsg::Save(document)).is_err() {
            tracing::warn!("persistence writer stopped, dropping document");
        }
    }

    pub fn handle_effects(&self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::Persist(document) => self.persist(document.clone()),
                Effect::SubscribeSlots(slots) => {
                    tracing::debug!(slots = ?slots.as_ref().map(|s| s.len()), "bound slots changed");
                }
            }
        }
    }

    /// Blocks until every queued document has been written.
    pub fn flush(&self) {
        let Some(tx) = self.writer_tx.as_ref() else {
            return;
        };
        let (ack_tx, ack_rx) = oneshot::channel();
        if tx.send(WriterMsg::Flush(ack_tx)).is_err() {
            return;
        }
        let _ = self.runtime.block_on(ack_rx);
    }

    /// Writes anything still queued and stops the writer.
    pub fn shutdown(mut self) {
        self.writer_tx.take();
        if let Some(writer) = self.writer.take() {
            if let Err(e) = self.runtime.block_on(writer) {
                tracing::error!(error = %e, "persistence writer panicked");
            }
        }
    }
}

/// A pending document is written at most this many debounce windows after it was queued.
const MAX_WAIT_WINDOWS: u32 = 4;

async fn run_writer(
    storage: Arc<dyn WorkspaceStorage>,
    mut rx: mpsc::UnboundedReceiver<WriterMsg>,
    debounce: Duration,
) {
    let max_wait = debounce.saturating_mul(MAX_WAIT_WINDOWS);
    let mut pending: Option<Arc<WorkspaceDocument>> = None;
    let mut pending_since: Option<Instant> = None;

    loop {
        let msg = if let Some(since) = pending_since {
            let deadline = (Instant::now() + debounce).min(since + max_wait);
            match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(msg) => msg,
                Err(_) => {
                    pending_since = None;
                    write_document(&storage, pending.take()).await;
                    continue;
                }
            }
        } else {
            rx.recv().await
        };

        match msg {
            Some(WriterMsg::Save(document)) => {
                pending = Some(document);
                pending_since.get_or_insert_with(Instant::now);
            }
            Some(WriterMsg::Flush(ack)) => {
                pending_since = None;
                write_document(&storage, pending.take()).await;
                let _ = ack.send(());
            }
            None => {
                write_document(&storage, pending.take()).await;
                return;
            }
        }
    }
}

async fn write_document(storage: &Arc<dyn WorkspaceStorage>, document: Option<Arc<WorkspaceDocument>>) {
    let Some(document) = document else {
        return;
    };

    let storage = storage.clone();
    let result = tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(document.as_ref())?;
        storage.save(&text)
    })
    .await;

    match result {
        Ok(Ok(())) => tracing::debug!("workspace persisted"),
        Ok(Err(error)) => tracing::error!(%error, "persist workspace failed"),
        Err(error) => tracing::error!(%error, "persist task failed"),
    }
}
