use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

/// Render the active tab's tasks: checkbox rows with strike-through for
/// completed tasks and indented description lines when expanded.
pub fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.active_tasks().is_empty() {
        let empty = Paragraph::new(" no tasks yet (press a to add one)")
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, area);
        return;
    }

    let (rows, task_rows) = build_rows(app);

    // Keep the cursor row visible
    let visible = area.height as usize;
    let cursor_row = task_rows.get(app.cursor).copied().unwrap_or(0);
    if cursor_row < app.scroll_offset {
        app.scroll_offset = cursor_row;
    } else if visible > 0 && cursor_row >= app.scroll_offset + visible {
        app.scroll_offset = cursor_row + 1 - visible;
    }

    let lines: Vec<Line> = rows
        .into_iter()
        .skip(app.scroll_offset)
        .take(visible)
        .collect();
    let list = Paragraph::new(Text::from(lines))
        .style(Style::default().bg(app.theme.background));
    frame.render_widget(list, area);
}

/// Build every display row plus the row index of each task's main line
fn build_rows(app: &App) -> (Vec<Line<'static>>, Vec<usize>) {
    let mut rows: Vec<Line<'static>> = Vec::new();
    let mut task_rows: Vec<usize> = Vec::new();

    for (index, task) in app.active_tasks().iter().enumerate() {
        let selected = index == app.cursor;
        let expanded = app.is_expanded(&task.id);
        let row_bg = if selected {
            app.theme.selection_bg
        } else {
            app.theme.background
        };

        let checkbox_style = if task.completed {
            Style::default().fg(app.theme.green).bg(row_bg)
        } else {
            Style::default().fg(app.theme.text).bg(row_bg)
        };
        let mut text_style = if task.completed {
            Style::default()
                .fg(app.theme.dim)
                .bg(row_bg)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().fg(app.theme.text).bg(row_bg)
        };
        if selected {
            text_style = text_style.add_modifier(Modifier::BOLD);
        }

        let mut spans = vec![
            Span::styled(
                format!(" [{}] ", task.checkbox_char()),
                checkbox_style,
            ),
            Span::styled(task.text.clone(), text_style),
        ];
        if !task.description.is_empty() {
            let marker = if expanded { " \u{25BE}" } else { " \u{25B8}" };
            spans.push(Span::styled(
                marker,
                Style::default().fg(app.theme.dim).bg(row_bg),
            ));
        }

        task_rows.push(rows.len());
        rows.push(Line::from(spans));

        if expanded {
            for line in task.description.lines() {
                rows.push(Line::from(Span::styled(
                    format!("     {}", line),
                    Style::default()
                        .fg(app.theme.dim)
                        .bg(app.theme.background)
                        .add_modifier(Modifier::ITALIC),
                )));
            }
        }
    }

    (rows, task_rows)
}
