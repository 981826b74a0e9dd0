use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PERSIST_DEBOUNCE_MS: u64 = 250;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Overrides the default workspace document location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_file: Option<PathBuf>,
    #[serde(default = "default_persist_debounce_ms")]
    pub persist_debounce_ms: u64,
    /// `tracing` filter directive, e.g. `robodash=debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

fn default_persist_debounce_ms() -> u64 {
    DEFAULT_PERSIST_DEBOUNCE_MS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workspace_file: None,
            persist_debounce_ms: DEFAULT_PERSIST_DEBOUNCE_MS,
            log_filter: None,
        }
    }
}

impl Settings {
    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }
}
