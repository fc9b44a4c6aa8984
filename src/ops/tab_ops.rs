use crate::io::{StateStore, StoreError};
use crate::model::state::AppState;
use crate::model::tab::{MAIN_TAB_ID, Tab, slugify};

/// Error type for tab registry operations
#[derive(Debug, thiserror::Error)]
pub enum TabError {
    #[error("tab name cannot be empty")]
    EmptyName,
    #[error("a tab with id '{0}' already exists")]
    Duplicate(String),
    #[error("tab not found: {0}")]
    NotFound(String),
    #[error("the main tab cannot be deleted")]
    MainUndeletable,
    #[error("cannot delete the last remaining tab")]
    LastTab,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Create a tab from a display name and append it to the registry.
/// The id is the slug of the trimmed name; collisions are rejected.
/// Returns the stored tab (the remote backend's server echo wins).
pub fn create_tab(
    state: &mut AppState,
    store: &mut dyn StateStore,
    name: &str,
) -> Result<Tab, TabError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TabError::EmptyName);
    }
    let id = slugify(name);
    if state.has_tab(&id) {
        return Err(TabError::Duplicate(id));
    }

    let stored = store.create_tab(&Tab::new(id, name))?;
    if state.has_tab(&stored.id) {
        // The server assigned an id we already track
        return Err(TabError::Duplicate(stored.id));
    }

    state.add_tab(stored.clone());
    if let Err(e) = store.commit(state) {
        state.remove_tab(&stored.id);
        return Err(e.into());
    }
    Ok(stored)
}

/// Delete a tab and all of its tasks, switching the active tab back to main.
/// The main tab and the last remaining tab are protected.
pub fn delete_tab(
    state: &mut AppState,
    store: &mut dyn StateStore,
    tab_id: &str,
) -> Result<(), TabError> {
    if tab_id == MAIN_TAB_ID {
        return Err(TabError::MainUndeletable);
    }
    if state.tabs.len() <= 1 {
        return Err(TabError::LastTab);
    }
    if !state.has_tab(tab_id) {
        return Err(TabError::NotFound(tab_id.to_string()));
    }

    store.delete_tab(tab_id)?;
    state.remove_tab(tab_id);
    state.active_tab_id = MAIN_TAB_ID.to_string();
    store.set_active_tab(MAIN_TAB_ID)?;
    store.commit(state)?;
    Ok(())
}

/// Switch the active tab, persisting the preference and lazily loading the
/// tab's tasks if they haven't been fetched yet.
pub fn set_active_tab(
    state: &mut AppState,
    store: &mut dyn StateStore,
    tab_id: &str,
) -> Result<(), TabError> {
    if !state.has_tab(tab_id) {
        return Err(TabError::NotFound(tab_id.to_string()));
    }

    let previous = std::mem::replace(&mut state.active_tab_id, tab_id.to_string());
    if let Err(e) = store.set_active_tab(tab_id) {
        state.active_tab_id = previous;
        return Err(e.into());
    }
    ensure_tab_loaded(state, store, tab_id)?;
    store.commit(state)?;
    Ok(())
}

/// Make sure a tab's tasks are in memory, fetching them on the remote
/// backend the first time the tab is visited.
pub fn ensure_tab_loaded(
    state: &mut AppState,
    store: &mut dyn StateStore,
    tab_id: &str,
) -> Result<(), TabError> {
    if state.tab_loaded(tab_id) {
        return Ok(());
    }
    let tasks = store.load_tab_tasks(tab_id)?.unwrap_or_default();
    state.tasks.insert(tab_id.to_string(), tasks);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::io::local_store::LocalStore;
    use crate::model::task::Task;

    fn setup() -> (TempDir, AppState, LocalStore) {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        (tmp, AppState::default(), store)
    }

    #[test]
    fn create_tab_slugs_the_name() {
        let (_tmp, mut state, mut store) = setup();
        let tab = create_tab(&mut state, &mut store, "Work Stuff").unwrap();
        assert_eq!(tab.id, "work-stuff");
        assert_eq!(tab.name, "Work Stuff");
        assert!(state.has_tab("work-stuff"));
        assert!(state.tab_loaded("work-stuff"));
    }

    #[test]
    fn create_tab_rejects_empty_and_whitespace_names() {
        let (_tmp, mut state, mut store) = setup();
        assert!(matches!(
            create_tab(&mut state, &mut store, ""),
            Err(TabError::EmptyName)
        ));
        assert!(matches!(
            create_tab(&mut state, &mut store, "   \t"),
            Err(TabError::EmptyName)
        ));
        assert_eq!(state.tabs.len(), 1);
    }

    #[test]
    fn create_tab_rejects_id_collisions() {
        let (_tmp, mut state, mut store) = setup();
        create_tab(&mut state, &mut store, "Work").unwrap();
        // Different display name, same slug
        let result = create_tab(&mut state, &mut store, "  work  ");
        assert!(matches!(result, Err(TabError::Duplicate(id)) if id == "work"));
        assert_eq!(state.tabs.len(), 2);
    }

    #[test]
    fn delete_tab_removes_tab_and_tasks_and_returns_to_main() {
        let (_tmp, mut state, mut store) = setup();
        create_tab(&mut state, &mut store, "Work").unwrap();
        state.push_task(Task::new("t1", "work", "A", ""));
        set_active_tab(&mut state, &mut store, "work").unwrap();

        delete_tab(&mut state, &mut store, "work").unwrap();
        assert!(!state.has_tab("work"));
        assert!(state.tasks_for("work").is_empty());
        assert_eq!(state.active_tab_id, MAIN_TAB_ID);
    }

    #[test]
    fn delete_tab_refuses_main() {
        let (_tmp, mut state, mut store) = setup();
        create_tab(&mut state, &mut store, "Work").unwrap();
        assert!(matches!(
            delete_tab(&mut state, &mut store, MAIN_TAB_ID),
            Err(TabError::MainUndeletable)
        ));
    }

    #[test]
    fn delete_tab_refuses_the_last_tab() {
        let (_tmp, mut state, mut store) = setup();
        assert!(matches!(
            delete_tab(&mut state, &mut store, "anything"),
            Err(TabError::LastTab)
        ));
    }

    #[test]
    fn set_active_tab_requires_an_existing_tab() {
        let (_tmp, mut state, mut store) = setup();
        let result = set_active_tab(&mut state, &mut store, "nope");
        assert!(matches!(result, Err(TabError::NotFound(_))));
        assert_eq!(state.active_tab_id, MAIN_TAB_ID);
    }

    #[test]
    fn set_active_tab_persists_across_reload() {
        let (_tmp, mut state, mut store) = setup();
        create_tab(&mut state, &mut store, "Work").unwrap();
        set_active_tab(&mut state, &mut store, "work").unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.active_tab_id, "work");
    }

    #[test]
    fn ensure_tab_loaded_seeds_missing_entries() {
        let (_tmp, mut state, mut store) = setup();
        create_tab(&mut state, &mut store, "Work").unwrap();
        state.tasks.shift_remove("work");
        assert!(!state.tab_loaded("work"));

        ensure_tab_loaded(&mut state, &mut store, "work").unwrap();
        assert!(state.tab_loaded("work"));
        assert!(state.tasks_for("work").is_empty());
    }
}
