use crate::app::App;
use crate::ui::widgets::loading::{render_loading, render_notice};
use elsa_dashboard::aggregate::BarSeries;
use elsa_dashboard::Metric;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};
use ratatui::Frame;

const TITLE: &str = "Health Metrics by Visit Month";

pub const fn metric_color(metric: Metric) -> Color {
    match metric {
        Metric::Cholesterol => Color::Rgb(0x1f, 0x77, 0xb4),
        Metric::Hdl => Color::Rgb(0xff, 0x7f, 0x0e),
        Metric::Ldl => Color::Rgb(0x2c, 0xa0, 0x2c),
        Metric::Triglycerides => Color::Rgb(0xd6, 0x27, 0x28),
    }
}

pub fn render_bar_chart(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(series) = app.bar.series.as_ref().filter(|_| app.bar.fetch.is_ready()) else {
        render_loading(app, f, area, TITLE, &[&app.bar.fetch]);
        return;
    };

    if series.is_empty() {
        render_notice(f, area, TITLE, "No visits match the selected waves");
        return;
    }

    let [legend_area, chart_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(area);

    f.render_widget(Paragraph::new(legend()), legend_area);

    let groups = bar_groups(series);
    let mut chart = BarChart::default()
        .block(
            Block::default()
                .title(format!(" {TITLE} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .max(scaled(series.max_value()).max(1))
        .bar_width(5)
        .bar_gap(0)
        .group_gap(2);
    for group in groups {
        chart = chart.data(group);
    }

    f.render_widget(chart, chart_area);
}

fn legend() -> TextLine<'static> {
    let mut spans = Vec::new();
    for metric in Metric::ALL {
        spans.push(Span::styled("■ ", Style::default().fg(metric_color(metric))));
        spans.push(Span::styled(
            format!("{}  ", metric.label()),
            Style::default().fg(Color::Gray),
        ));
    }
    TextLine::from(spans)
}

/// One group per month label, one bar per metric.
fn bar_groups(series: &BarSeries) -> Vec<BarGroup<'static>> {
    series
        .labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let bars: Vec<Bar<'static>> = series
                .series
                .iter()
                .map(|metric_series| {
                    let value = metric_series.values.get(index).copied().unwrap_or(0.0);
                    Bar::default()
                        .value(scaled(value))
                        .text_value(format!("{value:.2}"))
                        .style(Style::default().fg(metric_color(metric_series.metric)))
                        .value_style(
                            Style::default()
                                .fg(Color::White)
                                .add_modifier(Modifier::BOLD),
                        )
                })
                .collect();
            BarGroup::default()
                .label(TextLine::from(label.to_string()))
                .bars(&bars)
        })
        .collect()
}

// Bars take integer heights; keep two decimals of resolution
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled(value: f64) -> u64 {
    (value.max(0.0) * 100.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_keep_two_decimals() {
        assert_eq!(scaled(1.234), 123);
        assert_eq!(scaled(-4.0), 0);
    }
}
