mod catalog;
mod dashboard;
mod quiz;
mod result;
mod start;

use ratatui::{prelude::*, widgets::Block};

use crate::app::{App, Stage};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.stage {
        Stage::Catalog => catalog::render(frame, area, app),
        Stage::Start => start::render(frame, area, app),
        Stage::Quiz => quiz::render(frame, area, app),
        Stage::Result => result::render(frame, area, app),
        Stage::Dashboard => dashboard::render(frame, area, app),
    }
}
