use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Weekday};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::text::display_width;

/// Render the title row with the clock on the right, plus a separator line
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let now = Local::now();
    let clock = format!("{}  {} ", format_time(&now), format_date(&now));
    let title = " [#] TaskHive";

    let width = chunks[0].width as usize;
    let padding = width.saturating_sub(display_width(title) + display_width(&clock));

    let bg = Style::default().bg(app.theme.background);
    let line = Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(app.theme.highlight)
                .bg(app.theme.background)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ".repeat(padding), bg),
        Span::styled(clock, Style::default().fg(app.theme.text).bg(app.theme.background)),
    ]);
    frame.render_widget(Paragraph::new(line).style(bg), chunks[0]);

    let separator = "\u{2500}".repeat(chunks[1].width as usize);
    frame.render_widget(
        Paragraph::new(separator).style(Style::default().fg(app.theme.dim).bg(app.theme.background)),
        chunks[1],
    );
}

/// 12-hour clock: `H:MM AM/PM`, with midnight and noon shown as 12
pub fn format_time<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    let hour = now.hour();
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", hour12, now.minute(), meridiem)
}

/// `Weekday, M/D/YYYY`
pub fn format_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    format!(
        "{}, {}/{}/{}",
        weekday_name(now.weekday()),
        now.month(),
        now.day(),
        now.year()
    )
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 9, hour, minute, 0).unwrap()
    }

    #[test]
    fn morning_and_afternoon() {
        assert_eq!(format_time(&at(9, 5)), "9:05 AM");
        assert_eq!(format_time(&at(15, 30)), "3:30 PM");
    }

    #[test]
    fn midnight_and_noon_show_twelve() {
        assert_eq!(format_time(&at(0, 0)), "12:00 AM");
        assert_eq!(format_time(&at(12, 0)), "12:00 PM");
    }

    #[test]
    fn minutes_are_zero_padded() {
        assert_eq!(format_time(&at(23, 7)), "11:07 PM");
    }

    #[test]
    fn date_includes_the_weekday() {
        // 2025-03-09 is a Sunday
        assert_eq!(format_date(&at(9, 0)), "Sunday, 3/9/2025");
        let monday = Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap();
        assert_eq!(format_date(&monday), "Monday, 12/1/2025");
    }
}
