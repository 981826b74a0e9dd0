//! Application data locations.
//!
//! - macOS: ~/Library/Application Support/robodash
//! - Linux: ~/.local/share/robodash
//! - Windows: %APPDATA%\robodash

use std::path::PathBuf;

const APP_NAME: &str = "robodash";
const LOG_DIR: &str = "logs";
const WORKSPACE_FILE: &str = "workspace.json";

/// Overrides the workspace document path.
pub const WORKSPACE_ENV: &str = "ROBODASH_WORKSPACE";

pub fn get_app_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_NAME))
}

pub fn get_log_dir() -> Option<PathBuf> {
    get_app_data_dir().map(|dir| dir.join(LOG_DIR))
}

pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    let dir = get_log_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "Cannot determine log directory")
    })?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn default_workspace_path() -> Option<PathBuf> {
    get_app_data_dir().map(|dir| dir.join(WORKSPACE_FILE))
}

/// Workspace document path: the environment override, then `configured`, then the default.
pub fn workspace_path(configured: Option<PathBuf>) -> Option<PathBuf> {
    std::env::var_os(WORKSPACE_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or(configured)
        .or_else(default_workspace_path)
}
