use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use super::ports::StorageError;

/// Messages delivered to the thread that owns the store.
#[derive(Debug)]
pub enum StoreMessage {
    /// Result of reading the persisted workspace at startup.
    Hydrated(Result<Option<String>, StorageError>),
}

#[derive(Debug, Clone)]
pub struct StoreBusSender {
    tx: Sender<StoreMessage>,
}

#[derive(Debug)]
pub struct StoreBusReceiver {
    rx: Receiver<StoreMessage>,
}

pub fn store_bus() -> (StoreBusSender, StoreBusReceiver) {
    let (tx, rx) = mpsc::channel();
    (StoreBusSender { tx }, StoreBusReceiver { rx })
}

impl StoreBusSender {
    pub fn send(&self, msg: StoreMessage) -> Result<(), mpsc::SendError<StoreMessage>> {
        self.tx.send(msg)
    }
}

impl StoreBusReceiver {
    pub fn try_recv(&mut self) -> Result<StoreMessage, TryRecvError> {
        self.rx.try_recv()
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<StoreMessage, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}
