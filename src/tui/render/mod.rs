pub mod header;
pub mod prompt;
pub mod status_row;
pub mod summary;
pub mod tab_bar;
pub mod task_list;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Mode};

/// Top-level layout: header, tab bar, summary, task list, status row
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title + clock
            Constraint::Length(2), // tabs + separator
            Constraint::Length(4), // greeting, counter, progress
            Constraint::Min(0),    // task list
            Constraint::Length(1), // status / key hints
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);
    tab_bar::render_tab_bar(frame, app, chunks[1]);
    summary::render_summary(frame, app, chunks[2]);
    task_list::render_task_list(frame, app, chunks[3]);
    status_row::render_status_row(frame, app, chunks[4]);

    match app.mode {
        Mode::Prompt(_) | Mode::Confirm(_) => prompt::render_overlay(frame, app),
        Mode::Navigate => {}
    }
}
