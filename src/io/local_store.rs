use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::io::lock::FileLock;
use crate::io::{StateStore, StoreError};
use crate::model::state::AppState;
use crate::model::tab::Tab;
use crate::model::task::Task;

/// Local persistence: the entire app state as one JSON document at
/// `<data_dir>/state.json`, written synchronously after every mutation.
///
/// The per-mutation methods validate nothing and persist nothing; the whole
/// snapshot is written by `commit`. Writes go through a temp file plus rename
/// under an advisory file lock, so a CLI invocation racing the TUI cannot
/// leave a torn state file.
pub struct LocalStore {
    data_dir: PathBuf,
}

impl LocalStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        LocalStore {
            data_dir: data_dir.into(),
        }
    }

    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join("state.json")
    }
}

impl StateStore for LocalStore {
    fn load(&mut self) -> Result<AppState, StoreError> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(AppState::default());
        }
        let content = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        let state: AppState = serde_json::from_str(&content)?;
        Ok(state)
    }

    fn load_tab_tasks(&mut self, _tab_id: &str) -> Result<Option<Vec<Task>>, StoreError> {
        // Everything was loaded eagerly by load()
        Ok(None)
    }

    fn create_tab(&mut self, tab: &Tab) -> Result<Tab, StoreError> {
        Ok(tab.clone())
    }

    fn delete_tab(&mut self, _tab_id: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn create_task(&mut self, task: &Task) -> Result<Task, StoreError> {
        Ok(task.clone())
    }

    fn update_task(&mut self, task: &Task) -> Result<Task, StoreError> {
        Ok(task.clone())
    }

    fn delete_task(&mut self, _tab_id: &str, _task_id: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn set_active_tab(&mut self, _tab_id: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn commit(&mut self, state: &AppState) -> Result<(), StoreError> {
        let path = self.state_path();
        if !self.data_dir.is_dir() {
            fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::WriteError {
                path: self.data_dir.clone(),
                source: e,
            })?;
        }

        let _lock = FileLock::acquire_default(&self.data_dir)?;

        let content = serde_json::to_string_pretty(state)?;
        write_atomic(&self.data_dir, &path, content.as_bytes())
    }
}

/// Write via a temp file in the same directory, then rename into place
fn write_atomic(dir: &Path, path: &Path, content: &[u8]) -> Result<(), StoreError> {
    let wrap = |e: std::io::Error| StoreError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(wrap)?;
    tmp.write_all(content).map_err(wrap)?;
    tmp.persist(path).map_err(|e| StoreError::WriteError {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
