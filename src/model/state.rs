use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::tab::{MAIN_TAB_ID, Tab};
use crate::model::task::Task;

/// The entire client-side application state.
///
/// Persisted as-is by the local backend (one JSON document); assembled from
/// per-resource requests by the remote backend. A tab id missing from `tasks`
/// means that tab's tasks have not been loaded yet (remote backends load
/// lazily).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Tabs in display order
    pub tabs: Vec<Tab>,
    /// Currently displayed tab. Always refers to an existing tab.
    #[serde(rename = "activeTab")]
    pub active_tab_id: String,
    /// Tab id → ordered task list
    #[serde(default)]
    pub tasks: IndexMap<String, Vec<Task>>,
}

impl Default for AppState {
    fn default() -> Self {
        let mut tasks = IndexMap::new();
        tasks.insert(MAIN_TAB_ID.to_string(), Vec::new());
        AppState {
            tabs: vec![Tab::main()],
            active_tab_id: MAIN_TAB_ID.to_string(),
            tasks,
        }
    }
}

impl AppState {
    pub fn has_tab(&self, tab_id: &str) -> bool {
        self.tabs.iter().any(|t| t.id == tab_id)
    }

    pub fn tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    pub fn tab_position(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    /// Tasks for a tab, or an empty slice if none are loaded
    pub fn tasks_for(&self, tab_id: &str) -> &[Task] {
        self.tasks.get(tab_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a tab's task list has been loaded into memory
    pub fn tab_loaded(&self, tab_id: &str) -> bool {
        self.tasks.contains_key(tab_id)
    }

    pub fn task(&self, tab_id: &str, task_id: &str) -> Option<&Task> {
        self.tasks_for(tab_id).iter().find(|t| t.id == task_id)
    }

    pub fn task_mut(&mut self, tab_id: &str, task_id: &str) -> Option<&mut Task> {
        self.tasks
            .get_mut(tab_id)?
            .iter_mut()
            .find(|t| t.id == task_id)
    }

    /// Append a tab to the registry, seeding an empty task list
    pub fn add_tab(&mut self, tab: Tab) {
        self.tasks.entry(tab.id.clone()).or_default();
        self.tabs.push(tab);
    }

    /// Remove a tab and all of its tasks. Returns the removed tab and its
    /// former position, or None if no such tab exists.
    pub fn remove_tab(&mut self, tab_id: &str) -> Option<(usize, Tab, Vec<Task>)> {
        let position = self.tab_position(tab_id)?;
        let tab = self.tabs.remove(position);
        let tasks = self.tasks.shift_remove(tab_id).unwrap_or_default();
        Some((position, tab, tasks))
    }

    /// Append a task to its owning tab's list
    pub fn push_task(&mut self, task: Task) {
        self.tasks.entry(task.tab_id.clone()).or_default().push(task);
    }

    /// Remove a task, returning it along with its former index
    pub fn remove_task(&mut self, tab_id: &str, task_id: &str) -> Option<(usize, Task)> {
        let list = self.tasks.get_mut(tab_id)?;
        let index = list.iter().position(|t| t.id == task_id)?;
        Some((index, list.remove(index)))
    }

    /// Re-insert a task at a specific index (bounded by the list length)
    pub fn insert_task_at(&mut self, index: usize, task: Task) {
        let list = self.tasks.entry(task.tab_id.clone()).or_default();
        let index = index.min(list.len());
        list.insert(index, task);
    }

    /// Next locally assigned task id for a tab: `t<N>` where N is one past
    /// the highest existing numeric suffix.
    pub fn next_task_id(&self, tab_id: &str) -> String {
        let mut max = 0u64;
        for task in self.tasks_for(tab_id) {
            if let Some(rest) = task.id.strip_prefix('t')
                && let Ok(n) = rest.parse::<u64>()
                && n > max
            {
                max = n;
            }
        }
        format!("t{}", max + 1)
    }

    /// Number of tasks in a tab
    pub fn task_count(&self, tab_id: &str) -> usize {
        self.tasks_for(tab_id).len()
    }

    /// Completion percentage for a tab, rounded to the nearest integer.
    /// Defined as 0 for an empty tab.
    pub fn progress_percent(&self, tab_id: &str) -> u8 {
        let tasks = self.tasks_for(tab_id);
        if tasks.is_empty() {
            return 0;
        }
        let completed = tasks.iter().filter(|t| t.completed).count();
        ((completed as f64 / tasks.len() as f64) * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_state() -> AppState {
        let mut state = AppState::default();
        state.add_tab(Tab::new("work", "Work"));
        state.push_task(Task::new("t1", "work", "Write report", ""));
        state.push_task(Task::new("t2", "work", "Send invoice", "by Friday"));
        state
    }

    #[test]
    fn default_state_is_a_lone_main_tab() {
        let state = AppState::default();
        assert_eq!(state.tabs, vec![Tab::main()]);
        assert_eq!(state.active_tab_id, MAIN_TAB_ID);
        assert!(state.tab_loaded(MAIN_TAB_ID));
        assert_eq!(state.task_count(MAIN_TAB_ID), 0);
    }

    #[test]
    fn progress_is_zero_for_empty_tab() {
        let state = AppState::default();
        assert_eq!(state.progress_percent(MAIN_TAB_ID), 0);
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        let mut state = sample_state();
        state.push_task(Task::new("t3", "work", "File taxes", ""));
        // 1 of 3 done → 33%
        state.task_mut("work", "t1").unwrap().completed = true;
        assert_eq!(state.progress_percent("work"), 33);
        // 2 of 3 done → 67%
        state.task_mut("work", "t2").unwrap().completed = true;
        assert_eq!(state.progress_percent("work"), 67);
        // 3 of 3 done → 100%
        state.task_mut("work", "t3").unwrap().completed = true;
        assert_eq!(state.progress_percent("work"), 100);
    }

    #[test]
    fn next_task_id_scans_the_maximum() {
        let mut state = sample_state();
        assert_eq!(state.next_task_id("work"), "t3");
        // Gaps don't get reused
        state.remove_task("work", "t1");
        assert_eq!(state.next_task_id("work"), "t3");
        // Non-numeric (server-assigned) ids are ignored by the scan
        state.push_task(Task::new("a8f2c", "work", "Remote task", ""));
        assert_eq!(state.next_task_id("work"), "t3");
    }

    #[test]
    fn remove_tab_drops_its_tasks() {
        let mut state = sample_state();
        let (position, tab, tasks) = state.remove_tab("work").unwrap();
        assert_eq!(position, 1);
        assert_eq!(tab.id, "work");
        assert_eq!(tasks.len(), 2);
        assert!(!state.has_tab("work"));
        assert!(!state.tab_loaded("work"));
    }

    #[test]
    fn remove_and_reinsert_preserves_position() {
        let mut state = sample_state();
        let (index, task) = state.remove_task("work", "t1").unwrap();
        assert_eq!(index, 0);
        state.insert_task_at(index, task);
        let ids: Vec<_> = state.tasks_for("work").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
    }

    #[test]
    fn serializes_with_the_persisted_field_names() {
        let state = AppState::default();
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"activeTab\":\"main\""));
        assert!(json.contains("\"tabs\""));
        assert!(json.contains("\"tasks\""));
    }

    #[test]
    fn round_trips_through_json_preserving_order() {
        let state = sample_state();
        let json = serde_json::to_string_pretty(&state).unwrap();
        let loaded: AppState = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, state);
        let ids: Vec<_> = loaded.tasks_for("work").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
    }
}
