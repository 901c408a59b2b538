use crate::app::App;
use crate::ui::widgets::loading::{render_loading, render_notice};
use crate::ui::widgets::popup::{centered_rect, popup_block};
use elsa_dashboard::aggregate::{ScatterPoint, ScatterSeries};
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{
    Axis, Block, Borders, Cell, Chart, Dataset, GraphType, LegendPosition, Row, Table,
};
use ratatui::Frame;

const TITLE: &str = "Blood Pressure by Visit Month";
const MALE: Color = Color::Rgb(0x1f, 0x77, 0xb4);
const FEMALE: Color = Color::Rgb(0xe3, 0x77, 0xc2);

pub fn render_scatter_plot(app: &App, f: &mut Frame<'_>, area: Rect) {
    if !app.scatter.fetch.is_ready() {
        render_loading(app, f, area, TITLE, &[&app.scatter.fetch]);
        return;
    }

    let series = &app.scatter.series;
    if series.is_empty() {
        render_notice(f, area, TITLE, "No readings match the selected waves");
        return;
    }

    let male = plot_points(series, &series.male);
    let female = plot_points(series, &series.female);
    let (low, high) = series.systolic_bounds().unwrap_or((0.0, 200.0));
    let (y_min, y_max) = ((low - 10.0).max(0.0), high + 10.0);

    let cursor_x = app.scatter.cursor as f64;
    let cursor = [(cursor_x, y_min), (cursor_x, y_max)];

    let datasets = vec![
        Dataset::default()
            .name("Male")
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(MALE))
            .data(&male),
        Dataset::default()
            .name("Female")
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(FEMALE))
            .data(&female),
        Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&cursor),
    ];

    let last = series.labels.len().saturating_sub(1);
    let cursor_label = app
        .scatter
        .cursor_label()
        .map(|key| key.to_string())
        .unwrap_or_default();
    let x_labels = vec![
        Span::raw(series.labels.first().map(ToString::to_string).unwrap_or_default()),
        Span::styled(
            cursor_label,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(series.labels.last().map(ToString::to_string).unwrap_or_default()),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" {TITLE} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_axis(
            Axis::default()
                .title("Visit month")
                .style(Style::default().fg(Color::Gray))
                .bounds([-0.5, last as f64 + 0.5])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Systolic BP")
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{y_min:.0}")),
                    Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
                    Span::raw(format!("{y_max:.0}")),
                ]),
        )
        .legend_position(Some(LegendPosition::TopRight));

    f.render_widget(chart, area);
}

/// Readings placed on the categorical month axis.
fn plot_points(series: &ScatterSeries, points: &[ScatterPoint]) -> Vec<(f64, f64)> {
    points
        .iter()
        .filter_map(|point| {
            series
                .label_index(point.x())
                .map(|index| (index as f64, point.y()))
        })
        .collect()
}

/// Every sampled reading for the chosen month, ignoring the wave filter.
pub fn render_details_popup(app: &App, f: &mut Frame<'_>, area: Rect) {
    let Some(key) = app.scatter.details else {
        return;
    };
    let readings = app.scatter.pool.details_for(key);

    let popup_area = centered_rect(70, 70, area);
    let inner = popup_block(f, popup_area, &format!("Readings for {key}"), Color::Yellow);

    if readings.is_empty() {
        render_notice(f, inner, "Readings", "No readings for this month");
        return;
    }

    let header = Row::new(["Systolic", "Diastolic", "Gender", "Wave"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let rows = readings.iter().map(|point| {
        let color = match point.gender.label() {
            "Male" => MALE,
            "Female" => FEMALE,
            _ => Color::Gray,
        };
        Row::new(vec![
            Cell::from(format!("{:.0}", point.systolic)),
            Cell::from(format!("{:.0}", point.diastolic)),
            Cell::from(point.gender.label().to_string()),
            Cell::from(point.wave.clone().unwrap_or_else(|| "-".to_string())),
        ])
        .style(Style::default().fg(color))
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Min(8),
        ],
    )
    .header(header);
    f.render_widget(table, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use elsa_dashboard::{Gender, TimeKey};

    fn reading(month: u8, systolic: f64) -> ScatterPoint {
        ScatterPoint {
            time_key: TimeKey::new(month, 2012).unwrap(),
            systolic,
            diastolic: 80.0,
            gender: Gender::Male,
            wave: Some("Wave 6".to_string()),
        }
    }

    #[test]
    fn points_use_the_label_position_as_x() {
        let points = vec![reading(9, 150.0), reading(3, 120.0)];
        let series = ScatterSeries {
            labels: vec![TimeKey::new(3, 2012).unwrap(), TimeKey::new(9, 2012).unwrap()],
            male: points.clone(),
            female: Vec::new(),
        };
        assert_eq!(plot_points(&series, &points), vec![(1.0, 150.0), (0.0, 120.0)]);
    }
}
