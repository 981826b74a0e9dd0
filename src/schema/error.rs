use std::fmt;

/// One schema violation, addressed by a JSON pointer into the candidate document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "/: {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("workspace document is not valid JSON: {0}")]
    Parse(String),
    #[error("workspace document failed validation with {} issue(s)", .issues.len())]
    Invalid { issues: Vec<ValidationIssue> },
    #[error("workspace schema could not be compiled: {0}")]
    Schema(String),
}

impl DocumentError {
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            DocumentError::Invalid { issues } => issues,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    #[error("document has no numeric version")]
    MissingVersion,
    #[error("document version {found} is newer than supported version {supported}")]
    FromFuture { found: u32, supported: u32 },
    #[error("no migration registered from version {from}")]
    MissingStep { from: u32 },
    #[error("migration from version {from} failed: {reason}")]
    StepFailed { from: u32, reason: String },
    #[error("migration from version {from} did not advance the version")]
    Stalled { from: u32 },
}
