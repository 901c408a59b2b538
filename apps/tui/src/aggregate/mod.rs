//! Wave data aggregation shared by the bar chart and the scatter plot.
//!
//! Records are validated and turned into points, grouped by [`TimeKey`],
//! sampled once into a [`SampledPool`], and then filtered by the selected
//! waves every time the selection changes.

pub mod bar;
pub mod sampling;
pub mod scatter;

pub use bar::{aggregate_bars, average, BarPoint, BarSeries, MetricSeries};
pub use sampling::{group_by_time_key, sample_groups};
pub use scatter::{partition_scatter, ScatterPoint, ScatterSeries};

use crate::config::EmptySelection;
use crate::domain::TimeKey;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

/// A sampled observation that can be bucketed by visit month and wave.
pub trait WavePoint {
    fn time_key(&self) -> TimeKey;
    fn wave(&self) -> Option<&str>;
}

/// The set of wave identifiers a chart is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaveSelection {
    waves: BTreeSet<String>,
}

impl WaveSelection {
    pub fn new<I, S>(waves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            waves: waves.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn contains(&self, wave: &str) -> bool {
        self.waves.contains(wave)
    }

    /// Adds the wave if absent, removes it otherwise.
    pub fn toggle(&mut self, wave: &str) {
        if !self.waves.remove(wave) {
            self.waves.insert(wave.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.waves.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.waves.iter().map(String::as_str)
    }

    pub fn admits(&self, wave: Option<&str>, empty: EmptySelection) -> bool {
        if self.waves.is_empty() {
            return empty == EmptySelection::ShowAll;
        }
        wave.is_some_and(|wave| self.waves.contains(wave))
    }
}

/// Keeps the points whose wave the selection admits.
pub fn filter_by_waves<'a, P, I>(
    points: I,
    selection: &WaveSelection,
    empty: EmptySelection,
) -> Vec<&'a P>
where
    P: WavePoint + 'a,
    I: IntoIterator<Item = &'a P>,
{
    points
        .into_iter()
        .filter(|point| selection.admits(point.wave(), empty))
        .collect()
}

/// Distinct time keys of `points`, oldest first.
pub fn labels<P: WavePoint>(points: &[&P]) -> Vec<TimeKey> {
    points
        .iter()
        .map(|point| point.time_key())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Eligible points after per-month sampling. Built once per fetch; only the
/// wave filter runs again when the selection changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledPool<P> {
    points: Vec<P>,
    eligible: usize,
    dropped: usize,
}

impl<P> Default for SampledPool<P> {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            eligible: 0,
            dropped: 0,
        }
    }
}

impl<P: WavePoint> SampledPool<P> {
    /// Validates `records` with `eligible`, groups the survivors by time key,
    /// and samples at most `sample_size` per group using `rng`.
    pub fn build<T, I, F, R>(records: I, eligible: F, sample_size: usize, rng: &mut R) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Option<P>,
        R: Rng + ?Sized,
    {
        let mut dropped = 0;
        let mut points = Vec::new();
        for record in records {
            match eligible(&record) {
                Some(point) => points.push(point),
                None => dropped += 1,
            }
        }

        let eligible_count = points.len();
        let sampled = sample_groups(group_by_time_key(points), sample_size, rng);
        debug!(
            eligible = eligible_count,
            dropped,
            sampled = sampled.len(),
            "sampled pool built"
        );

        Self {
            points: sampled,
            eligible: eligible_count,
            dropped,
        }
    }

    pub fn from_points(points: Vec<P>) -> Self {
        let eligible = points.len();
        Self {
            points,
            eligible,
            dropped: 0,
        }
    }

    pub fn points(&self) -> &[P] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub const fn eligible_count(&self) -> usize {
        self.eligible
    }

    pub const fn dropped_count(&self) -> usize {
        self.dropped
    }

    pub fn filtered(&self, selection: &WaveSelection, empty: EmptySelection) -> Vec<&P> {
        filter_by_waves(&self.points, selection, empty)
    }

    /// Every sampled point for `key`, regardless of the wave selection.
    pub fn details_for(&self, key: TimeKey) -> Vec<&P> {
        self.points
            .iter()
            .filter(|point| point.time_key() == key)
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{point, TaggedPoint};
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn months_of(points: &[&TaggedPoint]) -> Vec<String> {
        labels(points).iter().map(ToString::to_string).collect()
    }

    #[test]
    fn labels_are_unique_and_chronological() {
        let points = [
            point(2, 2004, "Wave 2"),
            point(11, 2003, "Wave 2"),
            point(2, 2004, "Wave 2"),
            point(1, 2003, "Wave 1"),
        ];
        let refs: Vec<_> = points.iter().collect();
        assert_eq!(months_of(&refs), vec!["01-2003", "11-2003", "02-2004"]);
    }

    #[test]
    fn empty_selection_follows_policy() {
        let points = [point(4, 2008, "Wave 4"), point(5, 2008, "Wave 2")];
        let selection = WaveSelection::default();

        assert_eq!(
            filter_by_waves(&points, &selection, EmptySelection::ShowAll).len(),
            2
        );
        assert!(filter_by_waves(&points, &selection, EmptySelection::ShowNone).is_empty());
    }

    #[test]
    fn points_without_a_wave_never_match_a_selection() {
        let mut orphan = point(4, 2008, "Wave 4");
        orphan.wave = None;
        let points = [orphan, point(4, 2008, "Wave 4")];
        let selection = WaveSelection::new(["Wave 4"]);
        assert_eq!(
            filter_by_waves(&points, &selection, EmptySelection::ShowAll).len(),
            1
        );
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = WaveSelection::default();
        selection.toggle("Wave 6");
        assert!(selection.contains("Wave 6"));
        selection.toggle("Wave 6");
        assert!(selection.is_empty());
    }

    #[test]
    fn pool_counts_dropped_records_and_keeps_details_unfiltered() {
        let records = vec![Some((4, "Wave 4")), None, Some((4, "Wave 2")), None];
        let pool = SampledPool::build(
            records,
            |record| record.map(|(month, wave)| point(month, 2008, wave)),
            5,
            &mut StdRng::seed_from_u64(1),
        );

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.eligible_count(), 2);
        assert_eq!(pool.dropped_count(), 2);

        let key = TimeKey::new(4, 2008).unwrap();
        let selection = WaveSelection::new(["Wave 4"]);
        assert_eq!(pool.filtered(&selection, EmptySelection::ShowAll).len(), 1);
        assert_eq!(pool.details_for(key).len(), 2);
    }

    proptest! {
        #[test]
        fn wave_filter_is_idempotent(
            waves in prop::collection::vec(1u32..=8, 0..60),
            picked in prop::collection::btree_set(1u32..=8, 0..4),
        ) {
            let points: Vec<_> = waves
                .iter()
                .enumerate()
                .map(|(i, w)| point(u8::try_from(i % 12).unwrap() + 1, 2010, &format!("Wave {w}")))
                .collect();
            let selection = WaveSelection::new(picked.iter().map(|w| format!("Wave {w}")));

            let once = filter_by_waves(&points, &selection, EmptySelection::ShowAll);
            let twice = filter_by_waves(once.iter().copied(), &selection, EmptySelection::ShowAll);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn every_label_comes_from_an_input_point(
            months in prop::collection::vec((1u8..=12, 2002i32..2022), 1..80),
        ) {
            let points: Vec<_> = months.iter().map(|(m, y)| point(*m, *y, "Wave 1")).collect();
            let pool = SampledPool::build(
                points.clone(),
                |p| Some(p.clone()),
                5,
                &mut StdRng::seed_from_u64(9),
            );
            let kept = pool.filtered(&WaveSelection::default(), EmptySelection::ShowAll);
            for key in labels(&kept) {
                prop_assert!(points.iter().any(|p| p.key == key));
            }
        }
    }
}
