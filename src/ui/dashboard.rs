use ratatui::{
    prelude::*,
    widgets::{Block, Padding, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let title = Paragraph::new("RANKING")
        .alignment(Alignment::Center)
        .fg(Color::Cyan)
        .bold();
    frame.render_widget(title, chunks[0]);

    render_entries(frame, chunks[2], app);

    let controls = Paragraph::new("esc back to catalog")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(controls, chunks[3]);
}

fn render_entries(frame: &mut Frame, area: Rect, app: &App) {
    if app.ranking_loading {
        let widget = Paragraph::new("Loading…")
            .alignment(Alignment::Center)
            .fg(Color::DarkGray);
        frame.render_widget(widget, area);
        return;
    }

    if let Some(error) = &app.ranking_error {
        let widget = Paragraph::new(error.as_str())
            .alignment(Alignment::Center)
            .fg(Color::Red);
        frame.render_widget(widget, area);
        return;
    }

    if app.ranking.is_empty() {
        let widget = Paragraph::new("No scores yet.")
            .alignment(Alignment::Center)
            .fg(Color::DarkGray);
        frame.render_widget(widget, area);
        return;
    }

    let lines: Vec<Line> = app
        .ranking
        .iter()
        .map(|entry| {
            let medal_color = match entry.position {
                1 => Color::Yellow,
                2 => Color::Gray,
                3 => Color::LightRed,
                _ => Color::DarkGray,
            };
            Line::from(vec![
                Span::styled(format!("{:>3}. ", entry.position), Style::default().fg(medal_color)),
                Span::styled(entry.name.clone(), Style::default().fg(Color::White)),
                Span::styled(
                    format!("  {} pts", entry.score),
                    Style::default().fg(Color::Cyan),
                ),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(Block::default().padding(Padding::horizontal(2)));
    frame.render_widget(widget, area);
}
