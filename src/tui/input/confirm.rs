use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Confirm, Mode};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => accept(app),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}

fn accept(app: &mut App) {
    let Mode::Confirm(confirm) = std::mem::replace(&mut app.mode, Mode::Navigate) else {
        return;
    };
    match confirm {
        Confirm::RemoveTask { task_id, .. } => app.remove_task(&task_id),
        Confirm::DeleteTab { tab_id } => app.delete_tab(&tab_id),
    }
}
