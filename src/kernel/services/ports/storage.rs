use std::path::PathBuf;

/// Durable home of the serialized workspace document.
pub trait WorkspaceStorage: Send + Sync {
    /// Stored document text, `None` when nothing has been written yet.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replaces the stored document.
    fn save(&self, contents: &str) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not encode workspace document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("no workspace location could be determined")]
    NoLocation,
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
