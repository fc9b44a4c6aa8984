use crossterm::event::{KeyCode, KeyEvent};

use crate::model::tab::MAIN_TAB_ID;
use crate::tui::app::{App, Confirm, Mode, Prompt};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Task cursor
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Char('g') | KeyCode::Home => {
            app.cursor = 0;
            app.scroll_offset = 0;
        }
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor = app.active_tasks().len().saturating_sub(1);
        }

        // Tab switching
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => app.switch_tab(-1),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.switch_tab(1),

        // Task actions
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
        KeyCode::Char('e') => app.toggle_expanded(),
        KeyCode::Char('d') | KeyCode::Char('x') => {
            if let Some(task) = app.selected_task() {
                app.mode = Mode::Confirm(Confirm::RemoveTask {
                    task_id: task.id.clone(),
                    text: task.text.clone(),
                });
            }
        }

        // Prompts
        KeyCode::Char('a') => open_prompt(app, Prompt::TaskText),
        KeyCode::Char('t') => open_prompt(app, Prompt::TabName),
        KeyCode::Char('i') => open_prompt(app, Prompt::ImportPath),

        // Tab deletion
        KeyCode::Char('D') => {
            let tab_id = app.state.active_tab_id.clone();
            if tab_id == MAIN_TAB_ID {
                app.set_error("the main tab cannot be deleted");
            } else {
                app.mode = Mode::Confirm(Confirm::DeleteTab { tab_id });
            }
        }

        _ => {}
    }
}

fn open_prompt(app: &mut App, prompt: Prompt) {
    app.input.clear();
    app.mode = Mode::Prompt(prompt);
}
