use crate::app::App;
use crate::ui::widgets::loading::{render_loading, render_notice};
use elsa_dashboard::gapminder::{frame, AnimationMode, AnimationPoint, Scales};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{
    Axis, Block, Borders, Cell, Chart, Dataset, GraphType, LineGauge, Row, Table,
};
use ratatui::Frame;

const TITLE: &str = "Wealth & Health of English Regions";
const PALETTE: [Color; 10] = [
    Color::Rgb(0x1f, 0x77, 0xb4),
    Color::Rgb(0xff, 0x7f, 0x0e),
    Color::Rgb(0x2c, 0xa0, 0x2c),
    Color::Rgb(0xd6, 0x27, 0x28),
    Color::Rgb(0x94, 0x67, 0xbd),
    Color::Rgb(0x8c, 0x56, 0x4b),
    Color::Rgb(0xe3, 0x77, 0xc2),
    Color::Rgb(0x7f, 0x7f, 0x7f),
    Color::Rgb(0xbc, 0xbd, 0x22),
    Color::Rgb(0x17, 0xbe, 0xcf),
];

pub fn render_animation(app: &App, f: &mut Frame<'_>, area: Rect) {
    let view = &app.animation;
    if !view.fetch.is_ready() {
        render_loading(app, f, area, TITLE, &[&view.fetch]);
        return;
    }
    let (Some(scales), Some(wave)) = (view.scales, view.current_wave()) else {
        render_notice(f, area, TITLE, "No regions to animate");
        return;
    };

    let current = frame(&view.points, wave);

    let [body, slider_area] =
        Layout::vertical([Constraint::Min(6), Constraint::Length(1)]).areas(area);
    let [chart_area, side_area] =
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).areas(body);

    render_bubbles(f, chart_area, &scales, &current, &view.caption());
    render_region_table(f, side_area, &scales, &current);

    let last = view.timeline.len().saturating_sub(1).max(1);
    let state = match view.player.mode() {
        AnimationMode::Running => "playing",
        AnimationMode::Paused => "paused",
    };
    let slider = LineGauge::default()
        .ratio(view.player.index() as f64 / last as f64)
        .label(format!("{} ({state})", view.caption()))
        .filled_style(Style::default().fg(Color::Yellow))
        .unfilled_style(Style::default().fg(Color::DarkGray));
    f.render_widget(slider, slider_area);
}

/// One dataset per region so each bubble keeps its colour between waves.
fn render_bubbles(
    f: &mut Frame<'_>,
    area: Rect,
    scales: &Scales,
    current: &[&AnimationPoint],
    caption: &str,
) {
    let positions: Vec<[(f64, f64); 1]> = current
        .iter()
        .map(|point| {
            [(
                scales.income.unit(point.avg_income),
                scales.illness.unit(point.illness),
            )]
        })
        .collect();

    let datasets = current
        .iter()
        .zip(&positions)
        .enumerate()
        .map(|(index, (point, position))| {
            Dataset::default()
                .marker(bubble_marker(scales.radius.scale(point.avg_income)))
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(PALETTE[index % PALETTE.len()]))
                .data(position)
        })
        .collect::<Vec<_>>();

    let (income_low, income_high) = scales.income.domain;
    let (_, illness_high) = scales.illness.domain;

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" {TITLE}: {caption} "))
                .title_style(Style::default().add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_axis(
            Axis::default()
                .title("Average income (log)")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 1.0])
                .labels(vec![
                    Span::raw(format!("{income_low:.0}")),
                    Span::raw(format!("{:.0}", (income_low * income_high).sqrt())),
                    Span::raw(format!("{income_high:.0}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Illness %")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 1.0])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.0}", illness_high / 2.0)),
                    Span::raw(format!("{illness_high:.0}")),
                ]),
        );

    f.render_widget(chart, area);
}

/// Larger incomes draw with heavier markers.
fn bubble_marker(radius: f64) -> Marker {
    if radius >= 15.0 {
        Marker::Block
    } else if radius >= 10.0 {
        Marker::HalfBlock
    } else {
        Marker::Dot
    }
}

fn render_region_table(
    f: &mut Frame<'_>,
    area: Rect,
    scales: &Scales,
    current: &[&AnimationPoint],
) {
    let header = Row::new(["Region", "Income", "Ill %", "Size"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    let rows = current.iter().enumerate().map(|(index, point)| {
        Row::new(vec![
            Cell::from(point.region.clone()),
            Cell::from(format!("{:.0}", point.avg_income)),
            Cell::from(format!("{:.1}", point.illness)),
            Cell::from(format!("{:.1}", scales.radius.scale(point.avg_income))),
        ])
        .style(Style::default().fg(PALETTE[index % PALETTE.len()]))
    });

    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(5),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(" Regions ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_grows_with_radius() {
        assert_eq!(bubble_marker(5.0), Marker::Dot);
        assert_eq!(bubble_marker(12.0), Marker::HalfBlock);
        assert_eq!(bubble_marker(20.0), Marker::Block);
    }
}
