use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    let passed = app.passed();
    let (headline, color) = if passed {
        ("Congratulations!", Color::Green)
    } else {
        ("Keep trying", Color::Red)
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            headline,
            Style::default().fg(color).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("score {:.1} / 10", app.score()),
            Style::default().fg(color).bold(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("hits {}", app.hits), Style::default().fg(Color::Green)),
            Span::raw("   "),
            Span::styled(
                format!("misses {}", app.misses),
                Style::default().fg(Color::Red),
            ),
        ]),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_style(color),
    );
    frame.render_widget(widget, chunks[1]);

    let controls = Paragraph::new("r retry  ·  esc back to catalog  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(controls, chunks[3]);
}
