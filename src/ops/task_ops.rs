use crate::io::{StateStore, StoreError};
use crate::model::state::AppState;
use crate::model::task::Task;

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task text cannot be empty")]
    EmptyText,
    #[error("tab not found: {0}")]
    UnknownTab(String),
    #[error("task not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Add a task to a tab. Returns the stored task's id (server-assigned on the
/// remote backend, `t<N>` locally).
pub fn add_task(
    state: &mut AppState,
    store: &mut dyn StateStore,
    tab_id: &str,
    text: &str,
    description: &str,
) -> Result<String, TaskError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TaskError::EmptyText);
    }
    if !state.has_tab(tab_id) {
        return Err(TaskError::UnknownTab(tab_id.to_string()));
    }

    let draft = Task::new(state.next_task_id(tab_id), tab_id, text, description.trim());
    let stored = store.create_task(&draft)?;
    let id = stored.id.clone();

    state.push_task(stored);
    if let Err(e) = store.commit(state) {
        state.remove_task(tab_id, &id);
        return Err(e.into());
    }
    Ok(id)
}

/// Set a task's completion flag. Only that task's record changes; sibling
/// order and content are untouched. On persistence failure the previous flag
/// is restored before the error is returned.
pub fn toggle_task(
    state: &mut AppState,
    store: &mut dyn StateStore,
    tab_id: &str,
    task_id: &str,
    completed: bool,
) -> Result<(), TaskError> {
    let task = state
        .task_mut(tab_id, task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    let previous = task.completed;
    task.completed = completed;
    let snapshot = task.clone();

    let persisted = store
        .update_task(&snapshot)
        .and_then(|_| store.commit(state));
    if let Err(e) = persisted {
        if let Some(task) = state.task_mut(tab_id, task_id) {
            task.completed = previous;
        }
        return Err(e.into());
    }
    Ok(())
}

/// Remove a task. Confirmation is the caller's job (the TUI confirm prompt,
/// the CLI `--yes` flag).
pub fn remove_task(
    state: &mut AppState,
    store: &mut dyn StateStore,
    tab_id: &str,
    task_id: &str,
) -> Result<(), TaskError> {
    if state.task(tab_id, task_id).is_none() {
        return Err(TaskError::NotFound(task_id.to_string()));
    }

    store.delete_task(tab_id, task_id)?;
    let removed = state.remove_task(tab_id, task_id);
    if let Err(e) = store.commit(state) {
        if let Some((index, task)) = removed {
            state.insert_task_at(index, task);
        }
        return Err(e.into());
    }
    Ok(())
}
