use crate::aggregate::{labels, SampledPool, WavePoint, WaveSelection};
use crate::api::RawBarRecord;
use crate::config::{AggregatorConfig, NullPolicy};
use crate::domain::{Metric, TimeKey};
use serde::Serialize;

/// A sampled lipid panel for one visit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub time_key: TimeKey,
    pub values: [Option<f64>; 4],
    pub sex: Option<String>,
    pub wave: Option<String>,
}

impl BarPoint {
    /// Builds a point when the visit date and all four lipid readings are
    /// present.
    pub fn from_record(record: &RawBarRecord) -> Option<Self> {
        let time_key = TimeKey::from_visit(record.visit_month?, record.visit_year?)?;
        let values = [
            Some(record.cholesterol?),
            Some(record.hdl?),
            Some(record.ldl?),
            Some(record.triglycerides?),
        ];

        Some(Self {
            time_key,
            values,
            sex: record.sex.clone(),
            wave: record.wave.clone(),
        })
    }

    pub const fn value(&self, metric: Metric) -> Option<f64> {
        self.values[metric.index()]
    }
}

impl WavePoint for BarPoint {
    fn time_key(&self) -> TimeKey {
        self.time_key
    }

    fn wave(&self) -> Option<&str> {
        self.wave.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    pub metric: Metric,
    pub label: &'static str,
    pub values: Vec<f64>,
}

/// Per-month averages for each metric, aligned with `labels`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub labels: Vec<TimeKey>,
    pub series: Vec<MetricSeries>,
}

impl BarSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn metric(&self, metric: Metric) -> Option<&MetricSeries> {
        self.series.iter().find(|series| series.metric == metric)
    }

    /// Largest averaged value across all series, used for the chart ceiling.
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|series| series.values.iter().copied())
            .fold(0.0, f64::max)
    }
}

/// Mean of `metric` over `points`. An empty slice averages to 0.
pub fn average(points: &[&BarPoint], metric: Metric, policy: NullPolicy) -> f64 {
    let (sum, count) = match policy {
        NullPolicy::AsZero => (
            points
                .iter()
                .map(|point| point.value(metric).unwrap_or(0.0))
                .sum::<f64>(),
            points.len(),
        ),
        NullPolicy::Skip => points
            .iter()
            .filter_map(|point| point.value(metric))
            .fold((0.0, 0), |(sum, count), value| (sum + value, count + 1)),
    };

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Filters the pool by `selection` and averages every metric per month.
pub fn aggregate_bars(
    pool: &SampledPool<BarPoint>,
    selection: &WaveSelection,
    config: &AggregatorConfig,
) -> BarSeries {
    let filtered = pool.filtered(selection, config.empty_selection);
    let labels = labels(&filtered);

    let series = Metric::ALL
        .iter()
        .map(|&metric| {
            let values = labels
                .iter()
                .map(|label| {
                    let month: Vec<&BarPoint> = filtered
                        .iter()
                        .copied()
                        .filter(|point| point.time_key == *label)
                        .collect();
                    average(&month, metric, config.null_policy)
                })
                .collect();
            MetricSeries {
                metric,
                label: metric.label(),
                values,
            }
        })
        .collect();

    BarSeries { labels, series }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cholesterol_point(value: Option<f64>) -> BarPoint {
        BarPoint {
            time_key: TimeKey::new(4, 2008).unwrap(),
            values: [value, Some(1.0), Some(1.0), Some(1.0)],
            sex: None,
            wave: Some("Wave 4".to_string()),
        }
    }

    fn wave_four_record() -> RawBarRecord {
        serde_json::from_str(
            r#"{"VisitMonth":4,"VisitYear":2008,"Cholesterol":100,"HDL":50,"LDL":30,
                "Triglycerides":20,"Sex":"Male","Wave":"Wave 4"}"#,
        )
        .unwrap()
    }

    fn pool_of(records: Vec<RawBarRecord>) -> SampledPool<BarPoint> {
        SampledPool::build(
            records,
            BarPoint::from_record,
            5,
            &mut StdRng::seed_from_u64(3),
        )
    }

    #[test]
    fn missing_values_count_as_zero_by_default() {
        let with_value = cholesterol_point(Some(10.0));
        let without = cholesterol_point(None);
        let points = [&with_value, &without];

        assert!((average(&points, Metric::Cholesterol, NullPolicy::AsZero) - 5.0).abs() < 1e-9);
        assert!((average(&points, Metric::Cholesterol, NullPolicy::Skip) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn empty_groups_average_to_zero() {
        assert!(average(&[], Metric::Ldl, NullPolicy::AsZero).abs() < f64::EPSILON);
        let without = cholesterol_point(None);
        assert!(average(&[&without], Metric::Cholesterol, NullPolicy::Skip).abs() < f64::EPSILON);
    }

    #[test]
    fn single_matching_record_yields_its_values() {
        let pool = pool_of(vec![wave_four_record()]);
        let bars = aggregate_bars(
            &pool,
            &WaveSelection::new(["Wave 4"]),
            &AggregatorConfig::default(),
        );

        let labels: Vec<String> = bars.labels.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["04-2008"]);
        assert_eq!(bars.metric(Metric::Cholesterol).unwrap().values, vec![100.0]);
        assert_eq!(bars.metric(Metric::Hdl).unwrap().values, vec![50.0]);
        assert!((bars.max_value() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unmatched_wave_yields_empty_series() {
        let pool = pool_of(vec![wave_four_record()]);
        let bars = aggregate_bars(
            &pool,
            &WaveSelection::new(["Wave 2"]),
            &AggregatorConfig::default(),
        );

        assert!(bars.is_empty());
        assert_eq!(bars.series.len(), 4);
        assert!(bars.series.iter().all(|series| series.values.is_empty()));
    }

    #[test]
    fn records_missing_a_metric_are_not_eligible() {
        let mut record = wave_four_record();
        record.triglycerides = None;
        assert!(BarPoint::from_record(&record).is_none());

        let mut record = wave_four_record();
        record.sex = None;
        record.wave = None;
        assert!(BarPoint::from_record(&record).is_some());
    }

    #[test]
    fn months_are_averaged_separately_in_order() {
        let mut later = wave_four_record();
        later.visit_month = Some(1.0);
        later.visit_year = Some(2009.0);
        later.cholesterol = Some(50.0);
        let mut second = wave_four_record();
        second.cholesterol = Some(200.0);

        let pool = pool_of(vec![later, wave_four_record(), second]);
        let bars = aggregate_bars(
            &pool,
            &WaveSelection::new(["Wave 4"]),
            &AggregatorConfig::default(),
        );

        let labels: Vec<String> = bars.labels.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["04-2008", "01-2009"]);
        assert_eq!(
            bars.metric(Metric::Cholesterol).unwrap().values,
            vec![150.0, 50.0]
        );
    }
}
