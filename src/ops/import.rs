use crate::io::{StateStore, StoreError};
use crate::model::state::AppState;
use crate::model::task::Task;
use crate::parse::parse_import;

/// Error type for import operations
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("no tasks found in import file")]
    NoTasks,
    #[error("tab not found: {0}")]
    UnknownTab(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of an import operation
#[derive(Debug)]
pub struct ImportReport {
    /// Tasks that made it into the store
    pub imported: usize,
    /// Parseable entries in the file
    pub attempted: usize,
}

/// Bulk-insert tasks parsed from delimited text into one tab.
///
/// Each entry becomes a task with `completed = mark_completed`. Per-entry
/// persistence failures are tolerated and reflected in the report
/// ("imported N of M"); an expired login aborts the whole run instead, since
/// every remaining entry would fail the same way.
pub fn import_tasks(
    state: &mut AppState,
    store: &mut dyn StateStore,
    tab_id: &str,
    raw: &str,
    mark_completed: bool,
) -> Result<ImportReport, ImportError> {
    if !state.has_tab(tab_id) {
        return Err(ImportError::UnknownTab(tab_id.to_string()));
    }

    let entries = parse_import(raw);
    if entries.is_empty() {
        return Err(ImportError::NoTasks);
    }

    let attempted = entries.len();
    let mut imported = 0;
    for entry in entries {
        let mut draft = Task::new(
            state.next_task_id(tab_id),
            tab_id,
            entry.text,
            entry.description,
        );
        draft.completed = mark_completed;
        match store.create_task(&draft) {
            Ok(stored) => {
                state.push_task(stored);
                imported += 1;
            }
            Err(StoreError::AuthRequired) => return Err(StoreError::AuthRequired.into()),
            Err(_) => {}
        }
    }

    store.commit(state)?;
    Ok(ImportReport {
        imported,
        attempted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use crate::io::local_store::LocalStore;
    use crate::model::tab::MAIN_TAB_ID;

    fn setup() -> (TempDir, AppState, LocalStore) {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        (tmp, AppState::default(), store)
    }

    #[test]
    fn imports_lines_with_and_without_descriptions() {
        let (_tmp, mut state, mut store) = setup();
        let report =
            import_tasks(&mut state, &mut store, MAIN_TAB_ID, "A|desc1\nB\n", false).unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.attempted, 2);

        let tasks = state.tasks_for(MAIN_TAB_ID);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].text, "A");
        assert_eq!(tasks[0].description, "desc1");
        assert_eq!(tasks[1].text, "B");
        assert_eq!(tasks[1].description, "");
        assert!(tasks.iter().all(|t| !t.completed));
    }

    #[test]
    fn mark_completed_applies_to_every_import() {
        let (_tmp, mut state, mut store) = setup();
        import_tasks(&mut state, &mut store, MAIN_TAB_ID, "A\nB\n", true).unwrap();
        assert!(state.tasks_for(MAIN_TAB_ID).iter().all(|t| t.completed));
        assert_eq!(state.progress_percent(MAIN_TAB_ID), 100);
    }

    #[test]
    fn imported_tasks_get_sequential_ids() {
        let (_tmp, mut state, mut store) = setup();
        crate::ops::task_ops::add_task(&mut state, &mut store, MAIN_TAB_ID, "existing", "")
            .unwrap();
        import_tasks(&mut state, &mut store, MAIN_TAB_ID, "A\nB\n", false).unwrap();

        let ids: Vec<_> = state
            .tasks_for(MAIN_TAB_ID)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn empty_file_is_an_error() {
        let (_tmp, mut state, mut store) = setup();
        assert!(matches!(
            import_tasks(&mut state, &mut store, MAIN_TAB_ID, "", false),
            Err(ImportError::NoTasks)
        ));
        assert!(matches!(
            import_tasks(&mut state, &mut store, MAIN_TAB_ID, "\n  \n", false),
            Err(ImportError::NoTasks)
        ));
    }

    #[test]
    fn unknown_tab_is_an_error() {
        let (_tmp, mut state, mut store) = setup();
        assert!(matches!(
            import_tasks(&mut state, &mut store, "ghost", "A\n", false),
            Err(ImportError::UnknownTab(_))
        ));
    }

    #[test]
    fn import_persists_across_reload() {
        let (_tmp, mut state, mut store) = setup();
        import_tasks(&mut state, &mut store, MAIN_TAB_ID, "A|d\nB\n", false).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.task_count(MAIN_TAB_ID), 2);
        assert_eq!(reloaded.tasks_for(MAIN_TAB_ID)[0].description, "d");
    }
}
