use std::num::NonZeroUsize;

use airwave_core::{
    aggregate, partition_by_group, select_top_n, sort_by_date, RawEvent, Timestamp,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};

const CATEGORIES: [&str; 6] = ["Ava", "Bo", "Cy", "Dee", "Eli", "Fay"];
const GROUPS: [&str; 3] = ["m1", "m2", ""];

fn sample_events(seed: u64, len: usize) -> Vec<RawEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let timestamp = if rng.random_bool(0.1) {
                Timestamp::text("not-a-date")
            } else {
                Timestamp::text(format!(
                    "2024-06-{:02}T{:02}:00:00Z",
                    rng.random_range(1..=20),
                    rng.random_range(0..24)
                ))
            };
            let k = rng.random_range(1..=3);
            let categories = (0..k)
                .map(|_| CATEGORIES.choose(&mut rng).unwrap_or(&"Ava").to_string())
                .collect();
            RawEvent {
                timestamp,
                categories,
                group_key: GROUPS.choose(&mut rng).unwrap_or(&"").to_string(),
            }
        })
        .collect()
}

fn valid_pairs(events: &[RawEvent]) -> u64 {
    events
        .iter()
        .filter(|e| e.timestamp.date().is_some())
        .map(|e| e.categories.len() as u64)
        .sum()
}

fn n(v: usize) -> NonZeroUsize {
    NonZeroUsize::new(v).unwrap()
}

#[test]
fn aggregate_conserves_event_category_pairs() {
    for seed in 1..20 {
        let events = sample_events(seed, 200);
        let total: u64 = aggregate(&events).iter().map(|r| r.total()).sum();
        assert_eq!(total, valid_pairs(&events), "seed {seed}");
    }
}

#[test]
fn aggregate_is_order_independent() {
    for seed in 1..10 {
        let events = sample_events(seed, 120);
        let mut shuffled = events.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed + 100));
        assert_eq!(aggregate(&events), aggregate(&shuffled), "seed {seed}");
    }
}

#[test]
fn top_n_bounds_and_uniform_keys() {
    for seed in 1..10 {
        let rows = aggregate(&sample_events(seed, 150));
        for top in 1..=8 {
            let ranked = select_top_n(&rows, n(top));
            assert_eq!(ranked.len(), rows.len());
            let first: Vec<&str> = ranked[0].categories().collect();
            assert!(first.len() <= top);
            for r in &ranked {
                assert_eq!(r.categories().collect::<Vec<_>>(), first);
            }
        }
    }
}

#[test]
fn top_one_of_x3_y5_is_y() {
    let mut events = Vec::new();
    for _ in 0..3 {
        events.push(RawEvent::new("2024-01-01", ["X"], "g"));
    }
    for _ in 0..5 {
        events.push(RawEvent::new("2024-01-02", ["Y"], "g"));
    }
    let ranked = select_top_n(&aggregate(&events), n(1));
    for r in &ranked {
        assert_eq!(r.categories().collect::<Vec<_>>(), vec!["Y"]);
    }
}

#[test]
fn partitions_do_not_double_count() {
    for seed in 1..10 {
        let events = sample_events(seed, 200);
        // Large N keeps every category so totals are comparable.
        let groups = partition_by_group(&events, n(CATEGORIES.len()));
        let grouped_total: u64 = groups
            .iter()
            .flat_map(|g| g.rows.iter())
            .flat_map(|r| r.counts.values())
            .sum();
        assert_eq!(grouped_total, valid_pairs(&events), "seed {seed}");

        let mut ids: Vec<&str> = groups.iter().map(|g| g.group_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), groups.len());
    }
}

#[test]
fn sort_by_date_is_idempotent_on_ranked_rows() {
    let mut rows = select_top_n(&aggregate(&sample_events(3, 80)), n(3));
    rows.reverse();
    let once = sort_by_date(rows);
    let twice = sort_by_date(once.clone());
    assert_eq!(once, twice);
    assert!(once.windows(2).all(|w| w[0].date <= w[1].date));
}

#[test]
fn single_event_scenario() {
    let rows = aggregate(&[RawEvent::new("2024-01-01T00:00:00Z", ["X", "Y"], "g1")]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(
        rows[0].counts.iter().map(|(k, v)| (k.as_str(), *v)).collect::<Vec<_>>(),
        vec![("X", 1), ("Y", 1)]
    );
}
