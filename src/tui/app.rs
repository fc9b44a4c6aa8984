use std::collections::HashSet;
use std::error::Error;
use std::fs;
use std::io::Stdout;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::session::{self, Session};
use crate::io::{self, StateStore, config_io};
use crate::model::config::{Backend, Config};
use crate::model::state::AppState;
use crate::model::task::Task;
use crate::ops::{import, tab_ops, task_ops};

use super::input::{self, InputField};
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Prompt(Prompt),
    Confirm(Confirm),
}

/// Which text prompt is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// New task: text first...
    TaskText,
    /// ...then the optional description
    TaskDescription { text: String },
    TabName,
    ImportPath,
}

/// Which yes/no question is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    RemoveTask { task_id: String, text: String },
    DeleteTab { tab_id: String },
}

/// Transient message for the status row
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Main application state
pub struct App {
    pub state: AppState,
    pub store: Box<dyn StateStore>,
    pub theme: Theme,
    pub should_quit: bool,
    pub mode: Mode,
    /// Buffer for the open prompt
    pub input: InputField,
    /// Task cursor within the active tab
    pub cursor: usize,
    /// First visible row of the task list
    pub scroll_offset: usize,
    /// Tasks with their description shown, keyed `tab:task`
    pub expanded: HashSet<String>,
    pub status: Option<StatusMessage>,
    /// Username for the greeting line
    pub greeting: String,
    pub show_key_hints: bool,
}

impl App {
    pub fn new(state: AppState, store: Box<dyn StateStore>, config: &Config, greeting: String) -> Self {
        App {
            state,
            store,
            theme: Theme::from_config(&config.ui),
            should_quit: false,
            mode: Mode::Navigate,
            input: InputField::new(),
            cursor: 0,
            scroll_offset: 0,
            expanded: HashSet::new(),
            status: None,
            greeting,
            show_key_hints: config.ui.show_key_hints,
        }
    }

    // -- Selection --------------------------------------------------------

    pub fn active_tab_index(&self) -> usize {
        self.state
            .tab_position(&self.state.active_tab_id)
            .unwrap_or(0)
    }

    pub fn active_tasks(&self) -> &[Task] {
        self.state.tasks_for(&self.state.active_tab_id)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.active_tasks().get(self.cursor)
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.active_tasks().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.active_tasks().len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn expand_key(&self, task_id: &str) -> String {
        format!("{}:{}", self.state.active_tab_id, task_id)
    }

    pub fn is_expanded(&self, task_id: &str) -> bool {
        self.expanded.contains(&self.expand_key(task_id))
    }

    /// Show or hide the selected task's description
    pub fn toggle_expanded(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if task.description.is_empty() {
            return;
        }
        let key = self.expand_key(&task.id);
        if !self.expanded.remove(&key) {
            self.expanded.insert(key);
        }
    }

    // -- Status row -------------------------------------------------------

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    // -- Actions ----------------------------------------------------------

    /// Move to the neighboring tab (wrapping), persisting the preference
    pub fn switch_tab(&mut self, delta: isize) {
        let count = self.state.tabs.len();
        if count <= 1 {
            return;
        }
        let index = self.active_tab_index() as isize + delta;
        let index = index.rem_euclid(count as isize) as usize;
        let tab_id = self.state.tabs[index].id.clone();

        match tab_ops::set_active_tab(&mut self.state, self.store.as_mut(), &tab_id) {
            Ok(()) => {
                self.cursor = 0;
                self.scroll_offset = 0;
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Flip the selected task's completion flag
    pub fn toggle_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let (task_id, completed) = (task.id.clone(), task.completed);
        let tab_id = self.state.active_tab_id.clone();
        if let Err(e) =
            task_ops::toggle_task(&mut self.state, self.store.as_mut(), &tab_id, &task_id, !completed)
        {
            // The optimistic flag was already reverted
            self.set_error(e.to_string());
        }
    }

    pub fn add_task(&mut self, text: &str, description: &str) {
        let tab_id = self.state.active_tab_id.clone();
        match task_ops::add_task(&mut self.state, self.store.as_mut(), &tab_id, text, description)
        {
            Ok(id) => {
                self.cursor = self.active_tasks().len().saturating_sub(1);
                self.set_info(format!("added {}", id));
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn remove_task(&mut self, task_id: &str) {
        let tab_id = self.state.active_tab_id.clone();
        match task_ops::remove_task(&mut self.state, self.store.as_mut(), &tab_id, task_id) {
            Ok(()) => {
                self.clamp_cursor();
                self.set_info(format!("removed {}", task_id));
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Create a tab from the prompt and switch to it
    pub fn create_tab(&mut self, name: &str) {
        let created = tab_ops::create_tab(&mut self.state, self.store.as_mut(), name);
        match created {
            Ok(tab) => {
                if let Err(e) =
                    tab_ops::set_active_tab(&mut self.state, self.store.as_mut(), &tab.id)
                {
                    self.set_error(e.to_string());
                    return;
                }
                self.cursor = 0;
                self.scroll_offset = 0;
                self.set_info(format!("created tab {}", tab.id));
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn delete_tab(&mut self, tab_id: &str) {
        match tab_ops::delete_tab(&mut self.state, self.store.as_mut(), tab_id) {
            Ok(()) => {
                self.cursor = 0;
                self.scroll_offset = 0;
                self.set_info(format!("deleted tab {}", tab_id));
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Import tasks from a file path typed into the prompt
    pub fn import_file(&mut self, path: &str) {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                self.set_error(format!("could not read {}: {}", path, e));
                return;
            }
        };
        let tab_id = self.state.active_tab_id.clone();
        match import::import_tasks(&mut self.state, self.store.as_mut(), &tab_id, &raw, false) {
            Ok(report) => {
                self.set_info(format!(
                    "imported {} of {} tasks",
                    report.imported, report.attempted
                ))
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point and event loop
// ---------------------------------------------------------------------------

pub fn run(data_dir_override: Option<&str>) -> Result<(), Box<dyn Error>> {
    let data_dir = config_io::data_dir(data_dir_override.map(Path::new));
    let config = config_io::read_config(&data_dir)?;
    let mut store = io::open_store(&config, &data_dir)?;
    let mut state = store.load()?;
    let active = state.active_tab_id.clone();
    tab_ops::ensure_tab_loaded(&mut state, store.as_mut(), &active)?;

    let (greeting, login_hint) = greeting_for(&config, &data_dir);
    let mut app = App::new(state, store, &config, greeting);
    if let Some(hint) = login_hint {
        app.set_error(hint);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    result
}

/// Username for the greeting line. Remote backends ask the server; anything
/// else (local backend, network trouble) falls back to "User".
fn greeting_for(config: &Config, data_dir: &Path) -> (String, Option<String>) {
    if config.store.backend != Backend::Remote {
        return ("User".to_string(), None);
    }
    let Ok(client) = reqwest::blocking::Client::builder().build() else {
        return ("User".to_string(), None);
    };
    let session = Session::load(data_dir);
    match session::auth_status(&client, &config.remote.base_url, &session) {
        Ok(status) if status.is_logged_in => (
            status.username.unwrap_or_else(|| "User".to_string()),
            None,
        ),
        _ => (
            "User".to_string(),
            Some("not logged in (run `th login`)".to_string()),
        ),
    }
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;
        if app.should_quit {
            return Ok(());
        }
        // The poll timeout doubles as the clock tick
        if event::poll(Duration::from_millis(1000))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }
    }
}
