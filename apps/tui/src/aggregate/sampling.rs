use crate::aggregate::WavePoint;
use crate::domain::TimeKey;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

pub fn group_by_time_key<P, I>(points: I) -> BTreeMap<TimeKey, Vec<P>>
where
    P: WavePoint,
    I: IntoIterator<Item = P>,
{
    let mut groups: BTreeMap<TimeKey, Vec<P>> = BTreeMap::new();
    for point in points {
        groups.entry(point.time_key()).or_default().push(point);
    }
    groups
}

/// Keeps at most `sample_size` points per group, chosen uniformly without
/// replacement by shuffling the group and taking its head.
///
/// Groups are visited in key order so a seeded `rng` always yields the same
/// sample for the same input.
pub fn sample_groups<P, R>(
    groups: BTreeMap<TimeKey, Vec<P>>,
    sample_size: usize,
    rng: &mut R,
) -> Vec<P>
where
    R: Rng + ?Sized,
{
    let mut sampled = Vec::new();
    for (_, mut group) in groups {
        if group.len() > sample_size {
            group.shuffle(rng);
            group.truncate(sample_size);
        }
        sampled.append(&mut group);
    }
    sampled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::test_support::point;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn small_groups_are_kept_whole() {
        let groups = group_by_time_key(vec![
            point(4, 2008, "Wave 4"),
            point(4, 2008, "Wave 4"),
            point(5, 2008, "Wave 4"),
        ]);
        let mut rng = StdRng::seed_from_u64(7);
        let sampled = sample_groups(groups, 5, &mut rng);
        assert_eq!(sampled.len(), 3);
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let points: Vec<_> = (0..40u8)
            .map(|i| point(1 + i % 3, 2010, &format!("Wave {}", i % 7)))
            .collect();

        let first = sample_groups(
            group_by_time_key(points.clone()),
            5,
            &mut StdRng::seed_from_u64(42),
        );
        let second = sample_groups(group_by_time_key(points), 5, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
        assert_eq!(first.len(), 15);
    }

    proptest! {
        #[test]
        fn sample_is_min_of_cap_and_group_size(
            months in prop::collection::vec(1u8..=12, 0..120),
            cap in 1usize..8,
            seed in any::<u64>(),
        ) {
            let points: Vec<_> = months.iter().map(|m| point(*m, 2006, "Wave 3")).collect();
            let expected: BTreeMap<TimeKey, usize> = group_by_time_key(points.clone())
                .into_iter()
                .map(|(key, group)| (key, group.len().min(cap)))
                .collect();

            let sampled = sample_groups(
                group_by_time_key(points),
                cap,
                &mut StdRng::seed_from_u64(seed),
            );
            let counts: BTreeMap<TimeKey, usize> = group_by_time_key(sampled)
                .into_iter()
                .map(|(key, group)| (key, group.len()))
                .collect();

            prop_assert_eq!(counts, expected);
        }
    }
}
