use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph};

use crate::tui::app::App;

/// Render the greeting, task counter, and progress gauge for the active tab
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // greeting
            Constraint::Length(1), // counter
            Constraint::Length(1), // "Your progress"
            Constraint::Length(1), // gauge
        ])
        .split(area);

    let bg = Style::default().bg(app.theme.background);
    let text = Style::default().fg(app.theme.text).bg(app.theme.background);

    let greeting = Line::from(vec![
        Span::styled(" Hi, ", text),
        Span::styled(
            app.greeting.clone(),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.background)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(greeting).style(bg), chunks[0]);

    let tab_id = &app.state.active_tab_id;
    let count = app.state.task_count(tab_id);
    let counter = Line::from(vec![
        Span::styled(" You have ", text),
        Span::styled(
            format_count(count),
            Style::default()
                .fg(app.theme.highlight)
                .bg(app.theme.background)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(counter).style(bg), chunks[1]);

    frame.render_widget(
        Paragraph::new(" Your progress").style(Style::default().fg(app.theme.dim).bg(app.theme.background)),
        chunks[2],
    );

    let progress = app.state.progress_percent(tab_id);
    let gauge_area = inset(chunks[3], 1);
    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme.yellow)
                .bg(app.theme.selection_bg),
        )
        .percent(u16::from(progress))
        .label(Span::styled(
            format!("{}%", progress),
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(gauge, gauge_area);
}

/// "1 task" / "N tasks", matching the counter wording everywhere else
fn format_count(count: usize) -> String {
    if count == 1 {
        "1 task".to_string()
    } else {
        format!("{} tasks", count)
    }
}

/// Shrink a one-row area horizontally by `margin` on each side
fn inset(area: Rect, margin: u16) -> Rect {
    let shrink = (margin * 2).min(area.width);
    Rect {
        x: area.x + margin.min(area.width),
        width: area.width - shrink,
        ..area
    }
}
