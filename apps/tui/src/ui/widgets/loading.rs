use crate::app::fetch::FetchMachine;
use crate::app::App;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, BRAILLE_SIX};

/// Spinner shown while a chart's data is missing. A failed download stays here
/// too, with the error underneath.
pub fn render_loading(app: &App, f: &mut Frame<'_>, area: Rect, title: &str, fetches: &[&FetchMachine]) {
    let throbber = Throbber::default()
        .label("Loading...")
        .style(Style::default().fg(Color::Cyan))
        .throbber_set(BRAILLE_SIX);

    let mut lines = vec![TextLine::from(""), throbber.to_line(&app.throbber)];
    for error in fetches.iter().filter_map(|fetch| fetch.error()) {
        lines.push(TextLine::from(""));
        lines.push(TextLine::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Centred notice inside a titled block, for charts with nothing to draw.
pub fn render_notice(f: &mut Frame<'_>, area: Rect, title: &str, message: &str) {
    let paragraph = Paragraph::new(message.to_string())
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}
