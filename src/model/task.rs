use serde::{Deserialize, Serialize};

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique within the owning tab. Locally assigned (`t1`, `t2`, …) or
    /// server-assigned on the remote backend.
    pub id: String,
    /// Task text
    pub text: String,
    /// Optional longer description (empty string when absent)
    #[serde(default)]
    pub description: String,
    /// Completion flag
    #[serde(default)]
    pub completed: bool,
    /// Owning tab
    #[serde(rename = "tabId")]
    pub tab_id: String,
}

impl Task {
    /// Create a new, not-yet-completed task
    pub fn new(
        id: impl Into<String>,
        tab_id: impl Into<String>,
        text: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Task {
            id: id.into(),
            text: text.into(),
            description: description.into(),
            completed: false,
            tab_id: tab_id.into(),
        }
    }

    /// The character used inside the checkbox `[ ]`
    pub fn checkbox_char(&self) -> char {
        if self.completed { 'x' } else { ' ' }
    }
}
