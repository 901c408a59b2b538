use crate::ui::widgets::popup::centered_rect;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

const SHORTCUTS: [(&str, &str); 12] = [
    ("?", "Toggle this help popup"),
    ("q", "Quit"),
    ("Tab / Shift+Tab", "Next / previous chart"),
    ("1-4", "Jump to a chart"),
    ("w", "Choose waves for the bar chart, scatter plot or map"),
    ("Space", "Toggle a wave in the picker, or play/pause the animation"),
    ("c", "Clear the picker's selection"),
    ("Enter / Esc", "Close a popup"),
    ("← / →", "Move the scatter cursor, or step the animation"),
    ("Enter", "Show every reading for the scatter cursor's month"),
    ("Home / End", "First / last animation wave"),
    ("p", "Play/pause the animation"),
];

pub fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(80, 80, area);
    f.render_widget(Clear, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(help_block)
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Center);
    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        TextLine::from(Span::styled(
            "ELSA Wave Dashboard",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(
            "Health metrics, blood pressure, hearing aid usage and regional wealth across the English Longitudinal Study of Ageing survey waves.",
        ),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Keyboard Shortcuts:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    lines.extend(SHORTCUTS.iter().map(|(key, action)| {
        TextLine::from(vec![
            Span::styled(format!("  {key}"), key_style),
            Span::raw(format!(" - {action}")),
        ])
    }));

    lines
}
