use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::text::truncate_to_width;

const KEY_HINTS: &str =
    " a add  t tab  i import  space toggle  e details  d remove  D delete tab  q quit";

/// Render the bottom row: a transient status message, or key hints
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width as usize;

    let (content, style) = match &app.status {
        Some(message) if message.is_error => (
            format!(" {}", message.text),
            Style::default().fg(app.theme.red).bg(app.theme.background),
        ),
        Some(message) => (
            format!(" {}", message.text),
            Style::default().fg(app.theme.green).bg(app.theme.background),
        ),
        None if app.show_key_hints => (
            KEY_HINTS.to_string(),
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        ),
        None => (String::new(), Style::default().bg(app.theme.background)),
    };

    let row = Paragraph::new(truncate_to_width(&content, width)).style(style);
    frame.render_widget(row, area);
}
