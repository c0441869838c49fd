use std::time::Instant;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::Tier;

const OPTION_LABELS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let Some(question) = app.current_question() else {
        return;
    };

    render_header(frame, chunks[0], app);
    render_countdown(frame, chunks[1], app);
    render_question_text(frame, chunks[3], &question.prompt);
    render_options(frame, chunks[4], &question.options, app.selected_option);
    render_controls(frame, chunks[5]);
}

fn tier_color(tier: Option<Tier>) -> Color {
    match tier {
        Some(Tier::Easy) => Color::Green,
        Some(Tier::Medium) => Color::Yellow,
        Some(Tier::Hard) => Color::Red,
        None => Color::Cyan,
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let tier = app.current_question().and_then(|q| q.tier);
    let tier_text = tier.map(|t| t.label()).unwrap_or("");

    let left = Line::from(vec![
        Span::styled(
            format!("hits {}", app.hits),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(
            format!("misses {}", app.misses),
            Style::default().fg(Color::Red),
        ),
        Span::raw("  "),
        Span::styled(tier_text, Style::default().fg(tier_color(tier)).bold()),
    ]);
    frame.render_widget(Paragraph::new(left), area);

    let progress = format!("{}/{}", app.question_number(), app.total_questions());
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_countdown(frame: &mut Frame, area: Rect, app: &App) {
    let (secs, ratio) = app.countdown(Instant::now());
    let tier = app.current_question().and_then(|q| q.tier);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(tier_color(tier)))
        .ratio(ratio)
        .label(format!("{}s", secs));
    frame.render_widget(gauge, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold()
        .block(Block::default().padding(Padding::vertical(1)));
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, options: &[String], selected: usize) {
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let is_selected = index == selected;
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k navigate  ·  enter answer  ·  esc abandon")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
