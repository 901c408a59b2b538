// Rendering for the dashboard: one screen per chart plus shared widgets

pub mod screens;
pub mod widgets;

use crate::app::App;
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    screens::dashboard::render_dashboard(app, f);
}
