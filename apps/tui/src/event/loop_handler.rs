use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::app::actions::{AppActions, Datasets};
use crate::app::{handle_input, App};
use crate::ui;
use elsa_dashboard::aggregate::{
    aggregate_bars, partition_scatter, BarPoint, BarSeries, SampledPool, ScatterPoint,
    WaveSelection,
};
use elsa_dashboard::config::AggregatorConfig;
use elsa_dashboard::domain::wave_years;
use elsa_dashboard::gapminder::{frame, timeline, AnimationPoint};
use elsa_dashboard::map::{region_rows, RegionRow, RegionUsage};
use elsa_dashboard::Result as DataResult;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Options for a headless run.
pub struct HeadlessOptions {
    pub json: bool,
    pub seed: Option<u64>,
    pub waves: WaveSelection,
    pub map_waves: WaveSelection,
}

/// Run the application in headless mode (no UI)
pub async fn run_headless(
    actions: &AppActions,
    config: &AggregatorConfig,
    options: HeadlessOptions,
) -> Result<()> {
    let datasets = actions.fetch_all().await;
    let report = build_headless_report(datasets, config, &options);

    if options.json {
        let json = serde_json::to_string_pretty(&report)?;
        println!("{json}");
    } else {
        render_headless_report(&report);
    }

    Ok(())
}

fn render_headless_report(report: &HeadlessReport) {
    println!("\nELSA Wave Dashboard");
    println!("===================");
    println!("Generated: {}", report.generated_at);

    println!("\nHealth Metrics (bar chart):");
    match &report.bar {
        Some(bars) if !bars.series.is_empty() => {
            for (index, label) in bars.series.labels.iter().enumerate() {
                let values = bars
                    .series
                    .series
                    .iter()
                    .map(|series| format!("{} {:.2}", series.metric.as_str(), series.values[index]))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("- {label}: {values}");
            }
        }
        Some(_) => println!("- (no months match the selected waves)"),
        None => println!("- (unavailable)"),
    }

    println!("\nBlood Pressure (scatter plot):");
    match &report.scatter {
        Some(scatter) => {
            println!("- months: {}", scatter.months);
            println!("- male readings: {}", scatter.male);
            println!("- female readings: {}", scatter.female);
        }
        None => println!("- (unavailable)"),
    }

    println!("\nHearing Aid Usage (map):");
    match &report.map {
        Some(rows) if !rows.is_empty() => {
            for row in rows {
                let average = row
                    .average
                    .map_or_else(|| "no data".to_string(), |avg| format!("{avg:.1}%"));
                println!("- {}: {average} ({})", row.region, row.band.label());
            }
        }
        Some(_) => println!("- (select waves with --map-wave)"),
        None => println!("- (unavailable)"),
    }

    println!("\nWealth & Health (animation):");
    match &report.animation {
        Some(frames) => {
            for frame in frames {
                println!("- {}: {} regions", frame.caption, frame.regions);
            }
        }
        None => println!("- (unavailable)"),
    }

    if !report.errors.is_empty() {
        println!("\nErrors:");
        for error in &report.errors {
            println!("- {error}");
        }
    }
}

fn build_headless_report(
    datasets: Datasets,
    config: &AggregatorConfig,
    options: &HeadlessOptions,
) -> HeadlessReport {
    let mut rng = options
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let mut errors = Vec::new();

    let bar = ok_or_log(datasets.bar, &mut errors).map(|records| {
        let pool: SampledPool<BarPoint> = SampledPool::build(
            records,
            BarPoint::from_record,
            config.sample_size,
            &mut rng,
        );
        HeadlessBars {
            sampled: pool.len(),
            dropped: pool.dropped_count(),
            series: aggregate_bars(&pool, &options.waves, config),
        }
    });

    let scatter = ok_or_log(datasets.scatter, &mut errors).map(|records| {
        let pool: SampledPool<ScatterPoint> = SampledPool::build(
            records,
            ScatterPoint::from_record,
            config.sample_size,
            &mut rng,
        );
        let series = partition_scatter(&pool, &options.waves, config.empty_selection);
        HeadlessScatter {
            months: series.labels.len(),
            male: series.male.len(),
            female: series.female.len(),
        }
    });

    let map_records = ok_or_log(datasets.map, &mut errors);
    let geo = ok_or_log(datasets.geo, &mut errors);
    let map = match (map_records, geo) {
        (Some(records), Some(geo)) => {
            let usage = RegionUsage::from_records(&records);
            Some(region_rows(&usage, &geo.region_names(), &options.map_waves))
        }
        _ => None,
    };

    let animation = ok_or_log(datasets.animation, &mut errors).map(|records| {
        let points: Vec<AnimationPoint> = records
            .iter()
            .filter_map(AnimationPoint::from_record)
            .collect();
        timeline(&points)
            .into_iter()
            .map(|wave| HeadlessFrame {
                wave,
                caption: wave_years(wave)
                    .map_or_else(|| format!("Wave {wave}"), ToString::to_string),
                regions: frame(&points, wave).len(),
            })
            .collect()
    });

    HeadlessReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        bar,
        scatter,
        map,
        animation,
        errors,
    }
}

fn ok_or_log<T>(result: DataResult<T>, errors: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "dataset unavailable");
            errors.push(e.to_string());
            None
        }
    }
}

#[derive(serde::Serialize)]
struct HeadlessReport {
    generated_at: String,
    bar: Option<HeadlessBars>,
    scatter: Option<HeadlessScatter>,
    map: Option<Vec<RegionRow>>,
    animation: Option<Vec<HeadlessFrame>>,
    errors: Vec<String>,
}

#[derive(serde::Serialize)]
struct HeadlessBars {
    sampled: usize,
    dropped: usize,
    series: BarSeries,
}

#[derive(serde::Serialize)]
struct HeadlessScatter {
    months: usize,
    male: usize,
    female: usize,
}

#[derive(serde::Serialize)]
struct HeadlessFrame {
    wave: u32,
    caption: String,
    regions: usize,
}

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    actions: &AppActions,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let (tx, mut rx) = mpsc::unbounded_channel();
    actions.spawn_fetches(&tx);
    drop(tx);

    loop {
        // Apply any finished downloads
        while let Ok(outcome) = rx.try_recv() {
            app.apply_fetch(outcome);
        }

        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        // Keep the worker free for fetch tasks while waiting on the terminal
        let ready = tokio::task::block_in_place(|| {
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT))
        });

        if matches!(ready, Ok(true)) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(_) | Err(_) => {
                    // Ignore everything else
                }
            }
        }
    }

    info!("dashboard closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use elsa_dashboard::api::{decode, Endpoint, GeoFeatureCollection};
    use elsa_dashboard::DashboardError;

    fn datasets() -> Datasets {
        Datasets {
            bar: decode(
                Endpoint::BarChart,
                br#"[{"VisitMonth":4,"VisitYear":2008,"Cholesterol":100,"HDL":50,"LDL":30,
                      "Triglycerides":20,"Sex":"Male","Wave":"Wave 4"},
                     {"VisitMonth":4,"VisitYear":2008,"Cholesterol":null,"HDL":50,"LDL":30,
                      "Triglycerides":20,"Sex":"Male","Wave":"Wave 4"}]"#,
            ),
            scatter: Err(DashboardError::Config("offline".to_string())),
            map: decode(
                Endpoint::MapChart,
                br#"[{"gor":"London","wave":"Wave 2","hehear":1},
                     {"gor":"London","wave":"Wave 2","hehear":0}]"#,
            ),
            geo: Ok(serde_json::from_str::<GeoFeatureCollection>(
                r#"{"features":[{"properties":{"rgn_name":"London"}}]}"#,
            )
            .unwrap()),
            animation: decode(
                Endpoint::Animation,
                br#"[{"region":"London","Wave":"Wave 2","Average_Income":420,"IllnessPercentage":30},
                     {"region":"Wales","Wave":"Wave 1","Average_Income":"300","IllnessPercentage":"35"}]"#,
            ),
        }
    }

    #[test]
    fn report_aggregates_each_dataset_and_collects_errors() {
        let options = HeadlessOptions {
            json: true,
            seed: Some(1),
            waves: WaveSelection::new(["Wave 4"]),
            map_waves: WaveSelection::new(["Wave 2"]),
        };
        let report = build_headless_report(datasets(), &AggregatorConfig::default(), &options);

        let bar = report.bar.unwrap();
        assert_eq!(bar.sampled, 1);
        assert_eq!(bar.dropped, 1);
        assert_eq!(bar.series.series[0].values, vec![100.0]);

        assert!(report.scatter.is_none());
        assert_eq!(report.errors.len(), 1);

        let map = report.map.unwrap();
        assert_eq!(map[0].average, Some(50.0));

        let frames = report.animation.unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].caption, "2002–2003");
    }
}
