pub mod confirm;
pub mod field;
pub mod navigate;
pub mod prompt;

pub use field::InputField;

use crossterm::event::KeyEvent;

use super::app::{App, Mode};

/// Route a key press to the active mode's handler
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Any key clears the previous transient message
    app.status = None;

    match app.mode {
        Mode::Navigate => navigate::handle_key(app, key),
        Mode::Prompt(_) => prompt::handle_key(app, key),
        Mode::Confirm(_) => confirm::handle_key(app, key),
    }
}
