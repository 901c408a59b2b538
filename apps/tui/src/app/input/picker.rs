use crate::app::input::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_picker_input(app: &mut App, key: KeyCode) {
    let Some(picker) = app.picker.as_mut() else {
        return;
    };
    let len = picker.options.len();

    match key {
        KeyCode::Up => picker.cursor = wrap_decrement(picker.cursor, len),
        KeyCode::Down => picker.cursor = wrap_increment(picker.cursor, len),
        KeyCode::Char(' ') => {
            let tab = picker.tab;
            if let Some(option) = picker.options.get(picker.cursor) {
                let wave = option.value.clone();
                app.toggle_wave(tab, &wave);
            }
        }
        KeyCode::Char('c') => {
            let tab = picker.tab;
            app.clear_waves(tab);
        }
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('w') => app.picker = None,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::Tab;
    use elsa_dashboard::config::AggregatorConfig;

    #[test]
    fn space_toggles_the_highlighted_wave() {
        let mut app = App::new(AggregatorConfig::default(), Some(2));
        app.open_picker();
        handle_picker_input(&mut app, KeyCode::Down);
        handle_picker_input(&mut app, KeyCode::Char(' '));
        assert!(app.bar.selection.contains("Wave 4"));

        handle_picker_input(&mut app, KeyCode::Up);
        handle_picker_input(&mut app, KeyCode::Up);
        handle_picker_input(&mut app, KeyCode::Char(' '));
        assert!(app.bar.selection.contains("Wave 8"));

        handle_picker_input(&mut app, KeyCode::Char('c'));
        assert!(app.bar.selection.is_empty());

        handle_picker_input(&mut app, KeyCode::Enter);
        assert!(app.picker.is_none());
        assert!(app.selection(Tab::Scatter).unwrap().is_empty());
    }
}
