mod charts;
mod picker;

use crate::app::state::{App, Tab};
use crossterm::event::KeyCode;

pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    match (index, len) {
        (_, 0) => 0,
        (0, len) => len - 1,
        (index, _) => index - 1,
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (index + 1) % len
    }
}

pub fn handle_input(app: &mut App, key: KeyCode) {
    if app.show_help {
        if matches!(key, KeyCode::Char('?' | 'q') | KeyCode::Esc | KeyCode::Enter) {
            app.show_help = false;
        }
        return;
    }

    if app.picker.is_some() {
        picker::handle_picker_input(app, key);
        return;
    }

    if app.scatter.details.is_some() {
        if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            app.scatter.details = None;
        }
        return;
    }

    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('w') => app.open_picker(),
        KeyCode::Tab => switch_tab(app, wrap_increment(app.tab.index(), Tab::ALL.len())),
        KeyCode::BackTab => switch_tab(app, wrap_decrement(app.tab.index(), Tab::ALL.len())),
        KeyCode::Char(ch @ '1'..='4') => {
            let index = usize::from(ch as u8 - b'1');
            switch_tab(app, index);
        }
        _ => charts::handle_chart_input(app, key),
    }
}

fn switch_tab(app: &mut App, index: usize) {
    if let Some(tab) = Tab::from_index(index) {
        app.tab = tab;
        app.status_message.clear();
    }
}
