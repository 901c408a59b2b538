use crate::app::App;
use crate::ui::widgets::popup::{centered_rect, popup_block};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

pub fn render_wave_picker(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(picker) = &app.picker else {
        return;
    };
    let Some(selection) = app.selection(picker.tab) else {
        return;
    };

    let popup_area = centered_rect(50, 60, area);
    let inner = popup_block(f, popup_area, "Select Waves", Color::Yellow);
    let [list_area, hint_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

    let lines: Vec<TextLine<'_>> = picker
        .options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let checked = if selection.contains(&option.value) {
                "[x]"
            } else {
                "[ ]"
            };
            let style = if index == picker.cursor {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let pointer = if index == picker.cursor { "> " } else { "  " };
            TextLine::from(Span::styled(
                format!("{pointer}{checked} {}", option.caption),
                style,
            ))
        })
        .collect();

    f.render_widget(Paragraph::new(lines), list_area);
    f.render_widget(
        Paragraph::new(Span::styled(
            "Space: toggle | c: clear | Enter/Esc: done",
            Style::default().fg(Color::Gray),
        )),
        hint_area,
    );
}
