pub mod config_io;
pub mod local_store;
pub mod lock;
pub mod remote_store;
pub mod session;

use std::path::{Path, PathBuf};

use crate::model::config::{Backend, Config};
use crate::model::state::AppState;
use crate::model::tab::Tab;
use crate::model::task::Task;

/// Error type for persistence operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("state file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error(transparent)]
    Lock(#[from] lock::LockError),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("not logged in (run `th login`)")]
    AuthRequired,
}

/// The persistence adapter: mirrors the app state to a backing store.
///
/// Both backends expose the same contract. Callers apply mutations to the
/// in-memory state optimistically, persist through these methods, and revert
/// the in-memory change if persistence fails.
pub trait StateStore {
    /// Rehydrate the app state at startup
    fn load(&mut self) -> Result<AppState, StoreError>;

    /// Fetch one tab's tasks on demand. The local backend loads everything
    /// eagerly and returns None.
    fn load_tab_tasks(&mut self, tab_id: &str) -> Result<Option<Vec<Task>>, StoreError>;

    /// Persist a new tab. The returned tab carries the assigned id (the
    /// remote backend's server echo wins).
    fn create_tab(&mut self, tab: &Tab) -> Result<Tab, StoreError>;

    /// Persist a tab deletion (the server cascades to its tasks)
    fn delete_tab(&mut self, tab_id: &str) -> Result<(), StoreError>;

    /// Persist a new task. The returned task carries the assigned id.
    fn create_task(&mut self, task: &Task) -> Result<Task, StoreError>;

    /// Persist a task update (completion flag changes)
    fn update_task(&mut self, task: &Task) -> Result<Task, StoreError>;

    /// Persist a task deletion
    fn delete_task(&mut self, tab_id: &str, task_id: &str) -> Result<(), StoreError>;

    /// Persist the active-tab preference
    fn set_active_tab(&mut self, tab_id: &str) -> Result<(), StoreError>;

    /// Flush the full state. The local backend writes its JSON document
    /// here; the remote backend has already persisted each mutation.
    fn commit(&mut self, state: &AppState) -> Result<(), StoreError>;
}

/// Open the store configured in config.toml
pub fn open_store(config: &Config, data_dir: &Path) -> Result<Box<dyn StateStore>, StoreError> {
    match config.store.backend {
        Backend::Local => Ok(Box::new(local_store::LocalStore::new(data_dir))),
        Backend::Remote => Ok(Box::new(remote_store::RemoteStore::new(
            &config.remote.base_url,
            data_dir,
        )?)),
    }
}
