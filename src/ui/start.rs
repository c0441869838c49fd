use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    let count = app.question_count();
    let ready = count > 0;

    let mut content = vec![
        Line::from(Span::styled(
            app.quiz_name.clone(),
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} questions loaded", count),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];
    content.push(if ready {
        Line::from(Span::styled(
            "press enter to start",
            Style::default().fg(Color::Cyan).bold(),
        ))
    } else {
        Line::from(Span::styled(
            "this quiz has no questions",
            Style::default().fg(Color::Red),
        ))
    });

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);

    let controls = Paragraph::new("enter start  ·  esc back to catalog")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(controls, chunks[3]);
}
