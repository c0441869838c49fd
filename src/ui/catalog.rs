use chrono::{TimeZone, Utc};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::{App, PASS_SCORE};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_title(frame, chunks[0]);
    render_search(frame, chunks[1], &app.search);
    render_items(frame, chunks[2], app);
    render_controls(frame, chunks[3]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("QUIZ CATALOG")
        .alignment(Alignment::Center)
        .fg(Color::Cyan)
        .bold();
    frame.render_widget(widget, area);
}

fn render_search(frame: &mut Frame, area: Rect, search: &str) {
    let text = if search.is_empty() {
        Line::from(Span::styled("type to search…", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(search)
    };
    let widget = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_items(frame: &mut Frame, area: Rect, app: &App) {
    if app.loading {
        let widget = Paragraph::new("Loading…")
            .alignment(Alignment::Center)
            .fg(Color::DarkGray);
        frame.render_widget(widget, area);
        return;
    }

    if let Some(error) = &app.error {
        let widget = Paragraph::new(error.as_str())
            .alignment(Alignment::Center)
            .fg(Color::Red);
        frame.render_widget(widget, area);
        return;
    }

    let items = app.filtered_catalog();
    if items.is_empty() {
        let widget = Paragraph::new("No quizzes found.")
            .alignment(Alignment::Center)
            .fg(Color::DarkGray);
        frame.render_widget(widget, area);
        return;
    }

    let now_ms = Utc::now().timestamp_millis();
    let mut lines: Vec<Line> = Vec::with_capacity(items.len() * 2);

    for (index, item) in items.iter().enumerate() {
        let is_selected = index == app.selected;
        let marker = if is_selected { ">" } else { " " };
        let name_style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };

        let mut spans = vec![
            Span::styled(format!(" {} ", marker), name_style),
            Span::styled(item.display_name().to_string(), name_style),
        ];

        match app.last_attempt(&item.id) {
            Some(record) => {
                let color = if record.score < PASS_SCORE {
                    Color::Red
                } else {
                    Color::Green
                };
                spans.push(Span::styled(
                    format!("  {:.1}/10", record.score),
                    Style::default().fg(color),
                ));
                if let Some(date) = Utc.timestamp_millis_opt(record.at_ms).single() {
                    spans.push(Span::styled(
                        format!("  last: {}", date.format("%Y-%m-%d")),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                if app.needs_revisit(&item.id, now_ms) {
                    spans.push(Span::styled(
                        "  over a week ago — time to revisit",
                        Style::default().fg(Color::Yellow),
                    ));
                }
            }
            None => spans.push(Span::styled(
                "  no score yet",
                Style::default().fg(Color::DarkGray),
            )),
        }

        lines.push(Line::from(spans));
        if let Some(updated) = &item.updated_at {
            lines.push(Line::from(Span::styled(
                format!("     updated {}", updated),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let scroll = app.selected.saturating_sub(area.height.saturating_sub(2) as usize);
    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget =
        Paragraph::new("↑/↓ navigate  ·  enter open  ·  F5 reload  ·  tab ranking  ·  esc quit")
            .alignment(Alignment::Center)
            .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
