use serde::{Deserialize, Serialize};

/// The always-present default tab. It cannot be deleted.
pub const MAIN_TAB_ID: &str = "main";

/// A named grouping of tasks, shown as one panel in the tab bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    /// Slug identifier, unique across the registry
    pub id: String,
    /// Display label
    pub name: String,
}

impl Tab {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Tab {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The built-in main tab
    pub fn main() -> Self {
        Tab::new(MAIN_TAB_ID, "Main")
    }
}

/// Derive a tab id from its display name: lowercased, runs of whitespace
/// collapsed to single dashes.
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
