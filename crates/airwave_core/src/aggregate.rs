//! Day bucketing of raw events.
//!
//! The pipeline is three explicit stages so each can be tested alone:
//! 1. [`valid_dates`]: drop events whose timestamp does not parse
//! 2. [`explode`]: one `(date, category)` pair per category of an event
//! 3. [`aggregate`]: group pairs by date, then category, and count

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::event::RawEvent;
use crate::rows::DayBucketRow;

/// Events paired with their UTC date; invalid timestamps are skipped.
pub fn valid_dates<'a, I>(events: I) -> impl Iterator<Item = (NaiveDate, &'a RawEvent)>
where
    I: IntoIterator<Item = &'a RawEvent>,
{
    events.into_iter().filter_map(|ev| match ev.timestamp.date() {
        Some(date) => Some((date, ev)),
        None => {
            tracing::trace!(timestamp = ?ev.timestamp, "dropping event with invalid timestamp");
            None
        }
    })
}

/// Fan each event out into one `(date, category)` pair per category.
pub fn explode<'a, I>(events: I) -> impl Iterator<Item = (NaiveDate, &'a str)>
where
    I: IntoIterator<Item = &'a RawEvent>,
{
    valid_dates(events).flat_map(|(date, ev)| ev.categories.iter().map(move |c| (date, c.as_str())))
}

/// Count events per day and category.
///
/// The result has one row per distinct valid date, ascending, with sparse
/// counts keyed in ascending category order. Input order does not affect
/// the output.
pub fn aggregate<'a, I>(events: I) -> Vec<DayBucketRow>
where
    I: IntoIterator<Item = &'a RawEvent>,
{
    let mut grouped: BTreeMap<NaiveDate, BTreeMap<&'a str, u64>> = BTreeMap::new();
    let mut pairs = 0usize;
    for (date, category) in explode(events) {
        *grouped.entry(date).or_default().entry(category).or_insert(0) += 1;
        pairs += 1;
    }

    tracing::debug!(pairs, days = grouped.len(), "aggregated events into day buckets");

    grouped
        .into_iter()
        .map(|(date, counts)| DayBucketRow {
            date,
            counts: counts
                .into_iter()
                .map(|(category, n)| (category.to_string(), n))
                .collect(),
        })
        .collect()
}
