use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::tui::app::{App, Confirm, Mode, Prompt};
use crate::util::text::next_grapheme_boundary;

/// Render the modal overlay for the open prompt or confirm question
pub fn render_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(frame.area());
    frame.render_widget(Clear, area);

    let (title, body) = match &app.mode {
        Mode::Prompt(prompt) => (prompt_title(prompt), input_line(app)),
        Mode::Confirm(confirm) => (" Confirm ", confirm_line(app, confirm)),
        Mode::Navigate => return,
    };

    let block = Block::bordered()
        .title(title)
        .style(Style::default().fg(app.theme.text).bg(app.theme.background))
        .border_style(Style::default().fg(app.theme.highlight).bg(app.theme.background));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(body).style(Style::default().bg(app.theme.background)),
        inner,
    );
}

fn prompt_title(prompt: &Prompt) -> &'static str {
    match prompt {
        Prompt::TaskText => " New task ",
        Prompt::TaskDescription { .. } => " Description (optional) ",
        Prompt::TabName => " New tab ",
        Prompt::ImportPath => " Import file ",
    }
}

/// The input buffer with a block cursor
fn input_line(app: &App) -> Line<'static> {
    let value = app.input.value();
    let cursor = app.input.cursor();
    let text = Style::default().fg(app.theme.text).bg(app.theme.background);
    let cursor_style = Style::default()
        .fg(app.theme.background)
        .bg(app.theme.text_bright);

    let before = value[..cursor].to_string();
    let (at, after) = match next_grapheme_boundary(value, cursor) {
        Some(next) => (value[cursor..next].to_string(), value[next..].to_string()),
        None => (" ".to_string(), String::new()),
    };

    Line::from(vec![
        Span::styled(" ", text),
        Span::styled(before, text),
        Span::styled(at, cursor_style),
        Span::styled(after, text),
    ])
}

fn confirm_line(app: &App, confirm: &Confirm) -> Line<'static> {
    let question = match confirm {
        Confirm::RemoveTask { text, .. } => format!("remove '{}'?", text),
        Confirm::DeleteTab { tab_id } => {
            format!("delete tab '{}' and all of its tasks?", tab_id)
        }
    };
    Line::from(vec![
        Span::styled(
            format!(" {} ", question),
            Style::default().fg(app.theme.text).bg(app.theme.background),
        ),
        Span::styled(
            "[y/n]",
            Style::default()
                .fg(app.theme.highlight)
                .bg(app.theme.background)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

/// A 3-row box centered in the frame
fn centered_rect(area: Rect) -> Rect {
    let width = area.width.saturating_sub(4).min(52).max(20).min(area.width);
    let height = 3.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
