use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode, Prompt};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => submit(app),
        KeyCode::Backspace => app.input.backspace(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Home => app.input.move_home(),
        KeyCode::End => app.input.move_end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.insert(c)
        }
        _ => {}
    }
}

fn submit(app: &mut App) {
    let Mode::Prompt(prompt) = std::mem::replace(&mut app.mode, Mode::Navigate) else {
        return;
    };
    let value = app.input.take();

    match prompt {
        Prompt::TaskText => {
            let text = value.trim().to_string();
            if text.is_empty() {
                app.set_error("task text cannot be empty");
                return;
            }
            // Text accepted, ask for the optional description next
            app.mode = Mode::Prompt(Prompt::TaskDescription { text });
        }
        Prompt::TaskDescription { text } => app.add_task(&text, value.trim()),
        Prompt::TabName => app.create_tab(&value),
        Prompt::ImportPath => {
            let path = value.trim();
            if path.is_empty() {
                app.set_error("no file selected");
                return;
            }
            app.import_file(path);
        }
    }
}
