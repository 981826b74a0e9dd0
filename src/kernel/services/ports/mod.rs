//! Service ports: traits + data contracts.

pub mod settings;
pub mod storage;

pub use settings::Settings;
pub use storage::{StorageError, WorkspaceStorage};
