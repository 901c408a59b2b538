use crate::app::input::{wrap_decrement, wrap_increment};
use crate::app::state::{App, Tab};
use crossterm::event::KeyCode;

pub fn handle_chart_input(app: &mut App, key: KeyCode) {
    match app.tab {
        Tab::Scatter => handle_scatter_input(app, key),
        Tab::Animation => handle_animation_input(app, key),
        Tab::Bar | Tab::Map => {}
    }
}

fn handle_scatter_input(app: &mut App, key: KeyCode) {
    let len = app.scatter.series.labels.len();
    match key {
        KeyCode::Left => app.scatter.cursor = wrap_decrement(app.scatter.cursor, len),
        KeyCode::Right => app.scatter.cursor = wrap_increment(app.scatter.cursor, len),
        KeyCode::Enter => {
            app.scatter.details = app.scatter.cursor_label();
        }
        _ => {}
    }
}

fn handle_animation_input(app: &mut App, key: KeyCode) {
    let player = &mut app.animation.player;
    match key {
        KeyCode::Char(' ') | KeyCode::Char('p') => player.toggle(),
        KeyCode::Left => player.step_back(),
        KeyCode::Right => player.step_forward(),
        KeyCode::Home => player.seek(0),
        KeyCode::End => player.seek(usize::MAX),
        _ => {}
    }
}
