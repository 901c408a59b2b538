//! Hearing-aid usage per region and wave, and the colour bands the map
//! view draws them with.

use crate::aggregate::WaveSelection;
use crate::api::RawMapRecord;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageStats {
    pub using_aid: u32,
    pub total: u32,
}

impl UsageStats {
    pub fn percentage(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.using_aid) / f64::from(self.total) * 100.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionWaveKey {
    pub region: String,
    pub wave: String,
}

/// Usage counts keyed by region and wave.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionUsage {
    stats: BTreeMap<RegionWaveKey, UsageStats>,
}

impl RegionUsage {
    /// Tallies answers; rows missing a region, a wave or an answer are
    /// skipped, and only an answer of exactly 1 counts as using an aid.
    pub fn from_records(records: &[RawMapRecord]) -> Self {
        let mut stats: BTreeMap<RegionWaveKey, UsageStats> = BTreeMap::new();
        for record in records {
            let (Some(region), Some(wave), Some(answer)) =
                (&record.gor, &record.wave, record.hehear)
            else {
                continue;
            };

            let entry = stats
                .entry(RegionWaveKey {
                    region: region.clone(),
                    wave: wave.clone(),
                })
                .or_default();
            entry.total += 1;
            if (answer - 1.0).abs() < f64::EPSILON {
                entry.using_aid += 1;
            }
        }
        Self { stats }
    }

    pub fn stats(&self, region: &str, wave: &str) -> Option<UsageStats> {
        self.stats
            .get(&RegionWaveKey {
                region: region.to_string(),
                wave: wave.to_string(),
            })
            .copied()
    }

    pub fn percentage(&self, region: &str, wave: &str) -> Option<f64> {
        self.stats(region, wave).map(UsageStats::percentage)
    }

    /// Mean percentage over the selected waves that have data for `region`.
    pub fn average_for(&self, region: &str, selection: &WaveSelection) -> Option<f64> {
        let percentages: Vec<f64> = selection
            .iter()
            .filter_map(|wave| self.percentage(region, wave))
            .collect();

        if percentages.is_empty() {
            None
        } else {
            Some(percentages.iter().sum::<f64>() / percentages.len() as f64)
        }
    }

    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = self.stats.keys().map(|key| key.region.as_str()).collect();
        regions.dedup();
        regions
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

/// Usage band a region falls into by average percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageBand {
    VeryHigh,
    High,
    Moderate,
    Low,
    VeryLow,
    NoData,
}

impl UsageBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 60.0 {
            Self::VeryHigh
        } else if percentage >= 40.0 {
            Self::High
        } else if percentage >= 30.0 {
            Self::Moderate
        } else if percentage >= 20.0 {
            Self::Low
        } else if percentage >= 10.0 {
            Self::VeryLow
        } else {
            Self::NoData
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryHigh => "Very high",
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
            Self::VeryLow => "Very low",
            Self::NoData => "None",
        }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::VeryHigh => (0xb3, 0x00, 0x00),
            Self::High => (0xe3, 0x4a, 0x33),
            Self::Moderate => (0xfd, 0x8d, 0x3c),
            Self::Low => (0xfd, 0xbb, 0x84),
            Self::VeryLow => (0xfe, 0xf0, 0xd9),
            Self::NoData => (0xf0, 0xf0, 0xf0),
        }
    }
}

/// One row of the map view: a region with its per-wave and averaged usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRow {
    pub region: String,
    pub per_wave: Vec<(String, Option<f64>)>,
    pub average: Option<f64>,
    pub band: UsageBand,
}

/// Rows for every region in `regions`, in the given order.
pub fn region_rows(
    usage: &RegionUsage,
    regions: &[String],
    selection: &WaveSelection,
) -> Vec<RegionRow> {
    regions
        .iter()
        .map(|region| {
            let per_wave = selection
                .iter()
                .map(|wave| (wave.to_string(), usage.percentage(region, wave)))
                .collect();
            let average = usage.average_for(region, selection);
            RegionRow {
                region: region.clone(),
                per_wave,
                average,
                band: UsageBand::from_percentage(average.unwrap_or(0.0)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(region: &str, wave: &str, hehear: Option<f64>) -> RawMapRecord {
        RawMapRecord {
            gor: Some(region.to_string()),
            wave: Some(wave.to_string()),
            hehear,
        }
    }

    #[test]
    fn null_answers_are_left_out_of_the_total() {
        let usage = RegionUsage::from_records(&[
            answer("London", "Wave 2", Some(1.0)),
            answer("London", "Wave 2", Some(1.0)),
            answer("London", "Wave 2", Some(0.0)),
            answer("London", "Wave 2", None),
        ]);

        let stats = usage.stats("London", "Wave 2").unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.using_aid, 2);
        assert!((stats.percentage() - 66.666_666).abs() < 1e-3);
    }

    #[test]
    fn zero_total_is_zero_percent() {
        assert!(UsageStats::default().percentage().abs() < f64::EPSILON);
    }

    #[test]
    fn average_only_counts_waves_with_data() {
        let usage = RegionUsage::from_records(&[
            answer("Wales", "Wave 1", Some(1.0)),
            answer("Wales", "Wave 3", Some(0.0)),
        ]);

        let selection = WaveSelection::new(["Wave 1", "Wave 3", "Wave 9"]);
        assert_eq!(usage.average_for("Wales", &selection), Some(50.0));
        assert_eq!(
            usage.average_for("Wales", &WaveSelection::new(["Wave 9"])),
            None
        );
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(UsageBand::from_percentage(60.0), UsageBand::VeryHigh);
        assert_eq!(UsageBand::from_percentage(45.0), UsageBand::High);
        assert_eq!(UsageBand::from_percentage(30.0), UsageBand::Moderate);
        assert_eq!(UsageBand::from_percentage(20.5), UsageBand::Low);
        assert_eq!(UsageBand::from_percentage(10.0), UsageBand::VeryLow);
        assert_eq!(UsageBand::from_percentage(9.9), UsageBand::NoData);
    }

    #[test]
    fn rows_keep_geo_order_and_mark_missing_regions() {
        let usage = RegionUsage::from_records(&[answer("London", "Wave 2", Some(1.0))]);
        let regions = vec!["Wales".to_string(), "London".to_string()];
        let rows = region_rows(&usage, &regions, &WaveSelection::new(["Wave 2"]));

        assert_eq!(rows[0].region, "Wales");
        assert_eq!(rows[0].average, None);
        assert_eq!(rows[0].band, UsageBand::NoData);
        assert_eq!(rows[1].average, Some(100.0));
        assert_eq!(rows[1].band, UsageBand::VeryHigh);
        assert_eq!(usage.regions(), vec!["London"]);
    }
}
