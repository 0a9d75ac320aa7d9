//! Top-N category selection.

use std::num::NonZeroUsize;

use indexmap::IndexMap;

use crate::rows::{DayBucketRow, RankedRow};

/// Categories with their all-time totals, ranked by total descending.
///
/// Totals are accumulated in first-seen order (row order, then key order
/// within a row) and sorted stably, so equal totals keep first-seen order.
pub fn category_totals(rows: &[DayBucketRow]) -> Vec<(String, u64)> {
    let mut totals: IndexMap<&str, u64> = IndexMap::new();
    for row in rows {
        for (category, &n) in &row.counts {
            *totals.entry(category.as_str()).or_insert(0) += n;
        }
    }

    let mut ranked: Vec<(String, u64)> = totals
        .into_iter()
        .map(|(category, total)| (category.to_string(), total))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// The first `n` categories of [`category_totals`].
pub fn ranked_categories(rows: &[DayBucketRow], n: NonZeroUsize) -> Vec<String> {
    category_totals(rows)
        .into_iter()
        .take(n.get())
        .map(|(category, _)| category)
        .collect()
}

/// Restrict every row to the top `n` categories.
///
/// Each output row carries exactly the selected keys, in rank order, with
/// zeros where a category is absent that day. Row order is preserved.
pub fn select_top_n(rows: &[DayBucketRow], n: NonZeroUsize) -> Vec<RankedRow> {
    let selected = ranked_categories(rows, n);
    tracing::debug!(requested = n.get(), selected = selected.len(), "selected top categories");

    rows.iter()
        .map(|row| RankedRow {
            date: row.date,
            counts: selected
                .iter()
                .map(|category| (category.clone(), row.count(category)))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn n(v: usize) -> NonZeroUsize {
        NonZeroUsize::new(v).unwrap()
    }

    fn row(day: u32, counts: &[(&str, u64)]) -> DayBucketRow {
        DayBucketRow {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            counts: counts.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn top_one_picks_highest_total() {
        let rows = vec![row(1, &[("X", 2), ("Y", 1)]), row(2, &[("X", 1), ("Y", 4)])];
        let out = select_top_n(&rows, n(1));
        assert!(out.iter().all(|r| r.categories().collect::<Vec<_>>() == vec!["Y"]));
        assert_eq!(out[0].count("Y"), 1);
        assert_eq!(out[1].count("Y"), 4);
    }

    #[test]
    fn missing_categories_are_zero_filled() {
        let rows = vec![row(1, &[("X", 3)]), row(2, &[("Y", 2)])];
        let out = select_top_n(&rows, n(5));
        assert_eq!(out.len(), 2);
        for r in &out {
            assert_eq!(r.counts.len(), 2);
        }
        assert_eq!(out[0].count("Y"), 0);
        assert_eq!(out[1].count("X"), 0);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        // B is seen before A; both total 2.
        let rows = vec![row(1, &[("B", 1), ("A", 1)]), row(2, &[("A", 1), ("B", 1)])];
        assert_eq!(ranked_categories(&rows, n(1)), vec!["B"]);
        assert_eq!(ranked_categories(&rows, n(2)), vec!["B", "A"]);
    }

    #[test]
    fn row_order_is_preserved() {
        let rows = vec![row(3, &[("X", 1)]), row(1, &[("X", 1)])];
        let out = select_top_n(&rows, n(1));
        assert_eq!(out[0].date.to_string(), "2024-01-03");
        assert_eq!(out[1].date.to_string(), "2024-01-01");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(select_top_n(&[], n(3)).is_empty());
    }
}
