use crate::app::actions::FetchOutcome;
use crate::app::fetch::{FetchEvent, FetchMachine};
use elsa_dashboard::aggregate::{
    aggregate_bars, partition_scatter, BarPoint, BarSeries, SampledPool, ScatterPoint,
    ScatterSeries, WaveSelection,
};
use elsa_dashboard::config::AggregatorConfig;
use elsa_dashboard::domain::{full_wave_options, limited_wave_options, wave_years, WaveOption};
use elsa_dashboard::gapminder::{timeline, AnimationPoint, Scales, WavePlayer};
use elsa_dashboard::map::{region_rows, RegionRow, RegionUsage};
use elsa_dashboard::{DashboardError, TimeKey};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use throbber_widgets_tui::ThrobberState;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Bar,
    Scatter,
    Map,
    Animation,
}

impl Tab {
    pub const ALL: [Self; 4] = [Self::Bar, Self::Scatter, Self::Map, Self::Animation];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Bar => "Health Metrics",
            Self::Scatter => "Blood Pressure",
            Self::Map => "Hearing Aids",
            Self::Animation => "Wealth & Health",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Bar => 0,
            Self::Scatter => 1,
            Self::Map => 2,
            Self::Animation => 3,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Bar),
            1 => Some(Self::Scatter),
            2 => Some(Self::Map),
            3 => Some(Self::Animation),
            _ => None,
        }
    }

    /// Waves the tab's picker offers; the animation runs over all of them.
    pub fn wave_options(self) -> Vec<WaveOption> {
        match self {
            Self::Bar | Self::Scatter => limited_wave_options(),
            Self::Map => full_wave_options(),
            Self::Animation => Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct BarView {
    pub fetch: FetchMachine,
    pub pool: SampledPool<BarPoint>,
    pub selection: WaveSelection,
    pub series: Option<BarSeries>,
}

#[derive(Debug, Default)]
pub struct ScatterView {
    pub fetch: FetchMachine,
    pub pool: SampledPool<ScatterPoint>,
    pub selection: WaveSelection,
    pub series: ScatterSeries,
    pub cursor: usize,
    pub details: Option<TimeKey>,
}

impl ScatterView {
    pub fn cursor_label(&self) -> Option<TimeKey> {
        self.series.labels.get(self.cursor).copied()
    }
}

#[derive(Debug, Default)]
pub struct MapView {
    pub fetch: FetchMachine,
    pub geo_fetch: FetchMachine,
    pub usage: RegionUsage,
    pub regions: Vec<String>,
    pub selection: WaveSelection,
    pub rows: Vec<RegionRow>,
}

impl MapView {
    pub fn is_ready(&self) -> bool {
        self.fetch.is_ready() && self.geo_fetch.is_ready()
    }
}

#[derive(Debug)]
pub struct AnimationView {
    pub fetch: FetchMachine,
    pub points: Vec<AnimationPoint>,
    pub timeline: Vec<u32>,
    pub scales: Option<Scales>,
    pub player: WavePlayer,
}

impl AnimationView {
    pub fn current_wave(&self) -> Option<u32> {
        self.timeline.get(self.player.index()).copied()
    }

    pub fn caption(&self) -> String {
        self.current_wave().map_or_else(String::new, |wave| {
            wave_years(wave).map_or_else(|| format!("Wave {wave}"), ToString::to_string)
        })
    }
}

impl Default for AnimationView {
    fn default() -> Self {
        Self {
            fetch: FetchMachine::new(),
            points: Vec::new(),
            timeline: Vec::new(),
            scales: None,
            player: WavePlayer::new(0),
        }
    }
}

/// Multi-select popup over the current tab's wave options.
#[derive(Debug, Clone)]
pub struct WavePicker {
    pub tab: Tab,
    pub options: Vec<WaveOption>,
    pub cursor: usize,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub tab: Tab,
    pub show_help: bool,
    pub status_message: String,
    pub config: AggregatorConfig,
    pub bar: BarView,
    pub scatter: ScatterView,
    pub map: MapView,
    pub animation: AnimationView,
    pub picker: Option<WavePicker>,
    pub throbber: ThrobberState,
    rng: StdRng,
    started: Instant,
}

impl App {
    pub fn new(config: AggregatorConfig, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self {
            running: true,
            tab: Tab::Bar,
            show_help: false,
            status_message: String::new(),
            config,
            bar: BarView::default(),
            scatter: ScatterView::default(),
            map: MapView::default(),
            animation: AnimationView::default(),
            picker: None,
            throbber: ThrobberState::default(),
            rng,
            started: Instant::now(),
        }
    }

    /// Advances the spinner and the wave player.
    pub fn update(&mut self) {
        self.throbber.calc_next();
        let now = self.started.elapsed().as_secs_f64();
        self.animation.player.tick(now);
    }

    pub fn apply_fetch(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Bar(result) => match result {
                Ok(records) => {
                    let count = records.len();
                    self.bar.pool = SampledPool::build(
                        records,
                        BarPoint::from_record,
                        self.config.sample_size,
                        &mut self.rng,
                    );
                    record_event(&mut self.bar.fetch, FetchEvent::Received(count), "bar chart");
                    self.refresh_bar();
                }
                Err(e) => self.fetch_failed(|app| &mut app.bar.fetch, "bar chart", &e),
            },
            FetchOutcome::Scatter(result) => match result {
                Ok(records) => {
                    let count = records.len();
                    self.scatter.pool = SampledPool::build(
                        records,
                        ScatterPoint::from_record,
                        self.config.sample_size,
                        &mut self.rng,
                    );
                    record_event(&mut self.scatter.fetch, FetchEvent::Received(count), "scatter");
                    self.refresh_scatter();
                }
                Err(e) => self.fetch_failed(|app| &mut app.scatter.fetch, "scatter", &e),
            },
            FetchOutcome::Map(result) => match result {
                Ok(records) => {
                    self.map.usage = RegionUsage::from_records(&records);
                    record_event(&mut self.map.fetch, FetchEvent::Received(records.len()), "map");
                    self.refresh_map();
                }
                Err(e) => self.fetch_failed(|app| &mut app.map.fetch, "map", &e),
            },
            FetchOutcome::Geo(result) => match result {
                Ok(geo) => {
                    self.map.regions = geo.region_names();
                    let count = geo.features.len();
                    record_event(&mut self.map.geo_fetch, FetchEvent::Received(count), "geo");
                    self.refresh_map();
                }
                Err(e) => self.fetch_failed(|app| &mut app.map.geo_fetch, "geo", &e),
            },
            FetchOutcome::Animation(result) => match result {
                Ok(records) => {
                    let count = records.len();
                    let points: Vec<AnimationPoint> = records
                        .iter()
                        .filter_map(AnimationPoint::from_record)
                        .collect();
                    self.animation.timeline = timeline(&points);
                    self.animation.scales = Scales::from_points(&points);
                    self.animation.player.set_len(self.animation.timeline.len());
                    self.animation.points = points;
                    record_event(
                        &mut self.animation.fetch,
                        FetchEvent::Received(count),
                        "animation",
                    );
                }
                Err(e) => self.fetch_failed(|app| &mut app.animation.fetch, "animation", &e),
            },
        }
    }

    fn fetch_failed(
        &mut self,
        machine: impl FnOnce(&mut Self) -> &mut FetchMachine,
        dataset: &str,
        e: &DashboardError,
    ) {
        error!(dataset, error = %e, "fetch failed");
        self.status_message = format!("Error fetching {dataset} data: {e}");
        record_event(machine(self), FetchEvent::Error(e.to_string()), dataset);
    }

    pub fn refresh_bar(&mut self) {
        if self.bar.fetch.is_ready() {
            self.bar.series = Some(aggregate_bars(
                &self.bar.pool,
                &self.bar.selection,
                &self.config,
            ));
        }
    }

    pub fn refresh_scatter(&mut self) {
        self.scatter.series = partition_scatter(
            &self.scatter.pool,
            &self.scatter.selection,
            self.config.empty_selection,
        );
        let len = self.scatter.series.labels.len();
        self.scatter.cursor = self.scatter.cursor.min(len.saturating_sub(1));
    }

    pub fn refresh_map(&mut self) {
        self.map.rows = region_rows(&self.map.usage, &self.map.regions, &self.map.selection);
    }

    pub fn selection(&self, tab: Tab) -> Option<&WaveSelection> {
        match tab {
            Tab::Bar => Some(&self.bar.selection),
            Tab::Scatter => Some(&self.scatter.selection),
            Tab::Map => Some(&self.map.selection),
            Tab::Animation => None,
        }
    }

    /// Flips one wave in a tab's selection and recomputes that tab.
    pub fn toggle_wave(&mut self, tab: Tab, wave: &str) {
        match tab {
            Tab::Bar => {
                self.bar.selection.toggle(wave);
                self.refresh_bar();
            }
            Tab::Scatter => {
                self.scatter.selection.toggle(wave);
                self.refresh_scatter();
            }
            Tab::Map => {
                self.map.selection.toggle(wave);
                self.refresh_map();
            }
            Tab::Animation => {}
        }
    }

    pub fn clear_waves(&mut self, tab: Tab) {
        match tab {
            Tab::Bar => {
                self.bar.selection.clear();
                self.refresh_bar();
            }
            Tab::Scatter => {
                self.scatter.selection.clear();
                self.refresh_scatter();
            }
            Tab::Map => {
                self.map.selection.clear();
                self.refresh_map();
            }
            Tab::Animation => {}
        }
    }

    pub fn open_picker(&mut self) {
        let options = self.tab.wave_options();
        if options.is_empty() {
            self.status_message = "This chart runs across every wave".to_string();
            return;
        }
        self.picker = Some(WavePicker {
            tab: self.tab,
            options,
            cursor: 0,
        });
    }
}

fn record_event(machine: &mut FetchMachine, event: FetchEvent, dataset: &str) {
    match machine.process_event(&event) {
        Ok(()) => info!(dataset, state = %machine.state(), "fetch state changed"),
        Err(e) => warn!(dataset, error = %e, "ignored fetch event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::fetch::FetchState;
    use elsa_dashboard::api::RawBarRecord;

    fn bar_record(wave: &str, cholesterol: f64) -> RawBarRecord {
        RawBarRecord {
            visit_month: Some(4.0),
            visit_year: Some(2008.0),
            cholesterol: Some(cholesterol),
            hdl: Some(50.0),
            ldl: Some(30.0),
            triglycerides: Some(20.0),
            sex: Some("Male".to_string()),
            wave: Some(wave.to_string()),
        }
    }

    #[test]
    fn selection_changes_recompute_the_bar_series() {
        let mut app = App::new(AggregatorConfig::default(), Some(5));
        app.apply_fetch(FetchOutcome::Bar(Ok(vec![
            bar_record("Wave 4", 100.0),
            bar_record("Wave 2", 60.0),
        ])));
        assert_eq!(app.bar.fetch.state(), FetchState::Ready);
        assert_eq!(app.bar.series.as_ref().unwrap().labels.len(), 1);

        app.toggle_wave(Tab::Bar, "Wave 4");
        let series = app.bar.series.as_ref().unwrap();
        assert_eq!(series.series[0].values, vec![100.0]);

        app.toggle_wave(Tab::Bar, "Wave 4");
        app.toggle_wave(Tab::Bar, "Wave 8");
        assert!(app.bar.series.as_ref().unwrap().is_empty());
    }

    #[test]
    fn failed_fetch_keeps_the_view_empty() {
        let mut app = App::new(AggregatorConfig::default(), Some(5));
        app.apply_fetch(FetchOutcome::Scatter(Err(DashboardError::Config(
            "offline".to_string(),
        ))));
        assert_eq!(app.scatter.fetch.state(), FetchState::Failed);
        assert!(app.scatter.series.is_empty());
        assert!(app.status_message.contains("scatter"));
    }

    #[test]
    fn animation_picker_is_not_offered() {
        let mut app = App::new(AggregatorConfig::default(), None);
        app.tab = Tab::Animation;
        app.open_picker();
        assert!(app.picker.is_none());

        app.tab = Tab::Map;
        app.open_picker();
        assert_eq!(app.picker.as_ref().unwrap().options.len(), 10);
    }
}
