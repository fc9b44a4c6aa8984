use serde::Serialize;

use crate::model::state::AppState;
use crate::model::tab::Tab;
use crate::model::task::Task;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub completed: bool,
}

#[derive(Serialize)]
pub struct TaskListJson {
    pub tab: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct TabJson {
    pub id: String,
    pub name: String,
    pub tasks: usize,
    pub progress: u8,
    pub active: bool,
}

#[derive(Serialize)]
pub struct ProgressJson {
    pub tab: String,
    pub tasks: usize,
    pub completed: usize,
    pub progress: u8,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        text: task.text.clone(),
        description: task.description.clone(),
        completed: task.completed,
    }
}

pub fn tab_to_json(state: &AppState, tab: &Tab) -> TabJson {
    TabJson {
        id: tab.id.clone(),
        name: tab.name.clone(),
        tasks: state.task_count(&tab.id),
        progress: state.progress_percent(&tab.id),
        active: state.active_tab_id == tab.id,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task) -> String {
    format!("[{}] {} {}", task.checkbox_char(), task.id, task.text)
}

/// Format a task with its description lines, indented
pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = vec![format_task_line(task)];
    for line in task.description.lines() {
        lines.push(format!("      {}", line));
    }
    lines
}

/// Format the tab listing header
pub fn format_tab_header(tab: &Tab) -> String {
    format!("== {} ({}) ==", tab.name, tab.id)
}

/// Format one row of the tabs listing
pub fn format_tab_line(tab: &Tab, count: usize, progress: u8, active: bool) -> String {
    let marker = if active { '*' } else { ' ' };
    format!(
        "{} {} ({})  {}, {}%",
        marker,
        tab.name,
        tab.id,
        format_count(count),
        progress
    )
}

/// "1 task" / "N tasks", the counter wording used across the UI
pub fn format_count(count: usize) -> String {
    if count == 1 {
        "1 task".to_string()
    } else {
        format!("{} tasks", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn task_line_shows_checkbox_id_and_text() {
        let mut task = Task::new("t1", "main", "Buy honey", "");
        assert_snapshot!(format_task_line(&task), @"[ ] t1 Buy honey");
        task.completed = true;
        assert_snapshot!(format_task_line(&task), @"[x] t1 Buy honey");
    }

    #[test]
    fn task_detail_indents_the_description() {
        let task = Task::new("t2", "main", "Clean hive", "the big one\nbring gloves");
        let lines = format_task_detail(&task);
        assert_eq!(lines.len(), 3);
        assert_snapshot!(lines.join("\n"), @r"
        [ ] t2 Clean hive
              the big one
              bring gloves
        ");
    }

    #[test]
    fn tab_line_marks_the_active_tab() {
        let tab = Tab::new("work", "Work");
        assert_snapshot!(format_tab_line(&tab, 3, 67, true), @"* Work (work)  3 tasks, 67%");
        assert_snapshot!(format_tab_line(&tab, 1, 0, false), @"  Work (work)  1 task, 0%");
    }

    #[test]
    fn json_skips_empty_descriptions() {
        let json = serde_json::to_string(&task_to_json(&Task::new("t1", "main", "A", ""))).unwrap();
        assert!(!json.contains("description"));
        let json =
            serde_json::to_string(&task_to_json(&Task::new("t1", "main", "A", "d"))).unwrap();
        assert!(json.contains("\"description\":\"d\""));
    }
}
