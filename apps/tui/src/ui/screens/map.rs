use crate::app::App;
use crate::ui::widgets::loading::{render_loading, render_notice};
use elsa_dashboard::map::{RegionRow, UsageBand};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

const TITLE: &str = "Hearing Aid Usage by Region";
const BANDS: [UsageBand; 6] = [
    UsageBand::VeryHigh,
    UsageBand::High,
    UsageBand::Moderate,
    UsageBand::Low,
    UsageBand::VeryLow,
    UsageBand::NoData,
];

pub fn render_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    if !app.map.is_ready() {
        render_loading(app, f, area, TITLE, &[&app.map.fetch, &app.map.geo_fetch]);
        return;
    }

    if app.map.selection.is_empty() {
        render_notice(f, area, TITLE, "Press w to choose the waves to average");
        return;
    }

    let [legend_area, table_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(area);
    f.render_widget(Paragraph::new(legend()), legend_area);

    let waves: Vec<&str> = app.map.selection.iter().collect();
    let mut header_cells = vec![Cell::from("Region")];
    header_cells.extend(waves.iter().map(|wave| Cell::from((*wave).to_string())));
    header_cells.push(Cell::from("Average"));
    header_cells.push(Cell::from("Usage"));
    let header = Row::new(header_cells).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows = app.map.rows.iter().map(region_row);

    let mut widths = vec![Constraint::Min(24)];
    widths.extend(waves.iter().map(|_| Constraint::Length(8)));
    widths.push(Constraint::Length(9));
    widths.push(Constraint::Length(10));

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" {TITLE} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(table, table_area);
}

fn region_row(row: &RegionRow) -> Row<'static> {
    let mut cells = vec![Cell::from(row.region.clone())];
    cells.extend(
        row.per_wave
            .iter()
            .map(|(_, percentage)| Cell::from(format_percentage(*percentage))),
    );
    cells.push(Cell::from(format_percentage(row.average)));
    cells.push(Cell::from(row.band.label()));

    let style = match row.average {
        None => Style::default().fg(Color::DarkGray),
        Some(_) => Style::default().fg(band_color(row.band)),
    };
    Row::new(cells).style(style)
}

fn band_color(band: UsageBand) -> Color {
    let (r, g, b) = band.rgb();
    Color::Rgb(r, g, b)
}

fn format_percentage(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |percentage| format!("{percentage:.1}%"))
}

fn legend() -> TextLine<'static> {
    let mut spans = Vec::new();
    for band in BANDS {
        spans.push(Span::styled("■ ", Style::default().fg(band_color(band))));
        spans.push(Span::styled(
            format!("{}  ", band.label()),
            Style::default().fg(Color::Gray),
        ));
    }
    TextLine::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_percentages_render_as_dash() {
        assert_eq!(format_percentage(None), "-");
        assert_eq!(format_percentage(Some(66.666)), "66.7%");
    }
}
