use crate::app::{App, Tab};
use crate::ui::screens::{animation, bar, help, map, scatter};
use crate::ui::widgets::wave_picker::render_wave_picker;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;

pub fn render_dashboard(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(8),    // Chart
            Constraint::Length(3), // Status
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_tabs(app, f, layout[0]);

    match app.tab {
        Tab::Bar => bar::render_bar_chart(app, f, layout[1]),
        Tab::Scatter => scatter::render_scatter_plot(app, f, layout[1]),
        Tab::Map => map::render_map(app, f, layout[1]),
        Tab::Animation => animation::render_animation(app, f, layout[1]),
    }

    render_status_section(app, f, layout[2]);
    render_shortcuts(app, f, layout[3]);

    if app.picker.is_some() {
        render_wave_picker(app, f, layout[1]);
    }
    if app.scatter.details.is_some() && app.tab == Tab::Scatter {
        scatter::render_details_popup(app, f, layout[1]);
    }
    if app.show_help {
        let area = f.area();
        help::render_help_popup(f, area);
    }
}

fn render_tabs(app: &App, f: &mut Frame<'_>, area: Rect) {
    let titles = Tab::ALL
        .iter()
        .enumerate()
        .map(|(index, tab)| TextLine::from(format!(" {} {} ", index + 1, tab.title())))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title("== ELSA Wave Dashboard ==")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .select(app.tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));

    f.render_widget(tabs, area);
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let status_text = if app.status_message.is_empty() {
        Text::from(Span::styled(
            selection_summary(app),
            Style::default().fg(Color::Gray),
        ))
    } else {
        let style = if app.status_message.starts_with("Error") {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        Text::from(Span::styled(&app.status_message, style))
    };

    let status_paragraph = Paragraph::new(status_text)
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn selection_summary(app: &App) -> String {
    let waves = match app.selection(app.tab) {
        Some(selection) if selection.is_empty() => "No waves selected".to_string(),
        Some(selection) => format!(
            "Waves: {}",
            selection.iter().collect::<Vec<_>>().join(", ")
        ),
        None => app.animation.caption(),
    };

    let fetch = match app.tab {
        Tab::Bar => &app.bar.fetch,
        Tab::Scatter => &app.scatter.fetch,
        Tab::Map => &app.map.fetch,
        Tab::Animation => &app.animation.fetch,
    };
    if fetch.is_ready() {
        format!("{waves} | {} records fetched", fetch.records())
    } else {
        waves
    }
}

fn render_shortcuts(app: &App, f: &mut Frame<'_>, area: Rect) {
    let key = Style::default().fg(Color::Yellow);
    let text = Style::default().fg(Color::Gray);

    let mut spans = vec![
        Span::styled("Tab/1-4", key),
        Span::styled(": charts | ", text),
    ];
    match app.tab {
        Tab::Bar | Tab::Map => {
            spans.push(Span::styled("w", key));
            spans.push(Span::styled(": waves | ", text));
        }
        Tab::Scatter => {
            spans.push(Span::styled("w", key));
            spans.push(Span::styled(": waves | ", text));
            spans.push(Span::styled("←/→ Enter", key));
            spans.push(Span::styled(": month details | ", text));
        }
        Tab::Animation => {
            spans.push(Span::styled("Space", key));
            spans.push(Span::styled(": play/pause | ", text));
            spans.push(Span::styled("←/→", key));
            spans.push(Span::styled(": step | ", text));
        }
    }
    spans.push(Span::styled("?", key));
    spans.push(Span::styled(": help | ", text));
    spans.push(Span::styled("q", key));
    spans.push(Span::styled(": quit", text));

    let shortcuts = Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center);
    f.render_widget(shortcuts, area);
}
