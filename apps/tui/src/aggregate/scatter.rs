use crate::aggregate::{labels, SampledPool, WavePoint, WaveSelection};
use crate::api::RawScatterRecord;
use crate::config::EmptySelection;
use crate::domain::{Gender, TimeKey};
use serde::Serialize;

/// A sampled blood pressure reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub time_key: TimeKey,
    pub systolic: f64,
    pub diastolic: f64,
    pub gender: Gender,
    pub wave: Option<String>,
}

impl ScatterPoint {
    pub fn from_record(record: &RawScatterRecord) -> Option<Self> {
        let time_key = TimeKey::from_visit(record.visit_month?, record.visit_year?)?;
        let gender = Gender::parse(record.sex.as_deref()?)?;

        Some(Self {
            time_key,
            systolic: record.systolic_bp?,
            diastolic: record.diastolic_bp?,
            gender,
            wave: record.wave.clone(),
        })
    }

    pub const fn x(&self) -> TimeKey {
        self.time_key
    }

    pub const fn y(&self) -> f64 {
        self.systolic
    }
}

impl WavePoint for ScatterPoint {
    fn time_key(&self) -> TimeKey {
        self.time_key
    }

    fn wave(&self) -> Option<&str> {
        self.wave.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub labels: Vec<TimeKey>,
    pub male: Vec<ScatterPoint>,
    pub female: Vec<ScatterPoint>,
}

impl ScatterSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of `key` on the categorical x axis.
    pub fn label_index(&self, key: TimeKey) -> Option<usize> {
        self.labels.binary_search(&key).ok()
    }

    /// Lowest and highest systolic reading over both series.
    pub fn systolic_bounds(&self) -> Option<(f64, f64)> {
        self.male
            .iter()
            .chain(&self.female)
            .map(ScatterPoint::y)
            .fold(None, |bounds, y| match bounds {
                None => Some((y, y)),
                Some((low, high)) => Some((f64::min(low, y), f64::max(high, y))),
            })
    }
}

/// Filters the pool by `selection` and splits the readings by gender.
pub fn partition_scatter(
    pool: &SampledPool<ScatterPoint>,
    selection: &WaveSelection,
    empty: EmptySelection,
) -> ScatterSeries {
    let filtered = pool.filtered(selection, empty);
    let labels = labels(&filtered);

    let of_gender = |gender: &Gender| -> Vec<ScatterPoint> {
        filtered
            .iter()
            .filter(|point| point.gender == *gender)
            .map(|point| (*point).clone())
            .collect()
    };

    ScatterSeries {
        male: of_gender(&Gender::Male),
        female: of_gender(&Gender::Female),
        labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(month: u8, systolic: f64, sex: &str, wave: &str) -> ScatterPoint {
        ScatterPoint {
            time_key: TimeKey::new(month, 2012).unwrap(),
            systolic,
            diastolic: 80.0,
            gender: Gender::parse(sex).unwrap(),
            wave: Some(wave.to_string()),
        }
    }

    #[test]
    fn readings_split_by_gender_with_shared_labels() {
        let pool = SampledPool::from_points(vec![
            reading(3, 120.0, "Male", "Wave 6"),
            reading(1, 135.0, "Female", "Wave 6"),
            reading(2, 140.0, "Unknown", "Wave 6"),
            reading(5, 150.0, "Male", "Wave 8"),
        ]);

        let series = partition_scatter(
            &pool,
            &WaveSelection::new(["Wave 6"]),
            EmptySelection::ShowAll,
        );

        let labels: Vec<String> = series.labels.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["01-2012", "02-2012", "03-2012"]);
        assert_eq!(series.male.len(), 1);
        assert_eq!(series.female.len(), 1);
        assert!((series.male[0].y() - 120.0).abs() < f64::EPSILON);
        assert_eq!(series.label_index(series.male[0].x()), Some(2));
        assert_eq!(series.systolic_bounds(), Some((120.0, 135.0)));
    }

    #[test]
    fn scatter_records_need_sex_and_both_readings() {
        let json = r#"[
            {"VisitMonth":6,"VisitYear":2016,"SystolicBP":128,"DiastolicBP":82,"Sex":"Female","Wave":"Wave 8"},
            {"VisitMonth":6,"VisitYear":2016,"SystolicBP":128,"DiastolicBP":82,"Wave":"Wave 8"},
            {"VisitMonth":6,"VisitYear":2016,"SystolicBP":128,"Sex":"Male","Wave":"Wave 8"}
        ]"#;
        let records: Vec<RawScatterRecord> = serde_json::from_str(json).unwrap();
        let points: Vec<_> = records.iter().filter_map(ScatterPoint::from_record).collect();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].gender, Gender::Female);
        assert_eq!(points[0].time_key.to_string(), "06-2016");
    }

    #[test]
    fn empty_pool_gives_empty_series() {
        let series = partition_scatter(
            &SampledPool::default(),
            &WaveSelection::default(),
            EmptySelection::ShowAll,
        );
        assert!(series.is_empty());
        assert_eq!(series.systolic_bounds(), None);
    }
}
