//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod paths;
pub mod persistence;
pub mod settings;
pub mod storage;

pub use paths::{
    default_workspace_path, ensure_log_dir, get_app_data_dir, get_log_dir, workspace_path,
    WORKSPACE_ENV,
};
pub use persistence::PersistenceService;
pub use settings::{ensure_settings_file, get_settings_path, load_settings};
pub use storage::{FileStorage, MemoryStorage};
