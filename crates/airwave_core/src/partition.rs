//! Per-group series (one streamgraph per market).

use std::num::NonZeroUsize;

use indexmap::IndexMap;

use crate::aggregate::aggregate;
use crate::event::RawEvent;
use crate::order::sort_by_date;
use crate::rank::select_top_n;
use crate::rows::{heatmap_cells, AirplaySummary, RankedRow, SeriesGroup};

/// Aggregate, rank, and date-sort one slice of events.
pub fn ranked_series<'a, I>(events: I, top_n: NonZeroUsize) -> Vec<RankedRow>
where
    I: IntoIterator<Item = &'a RawEvent>,
{
    let buckets = aggregate(events);
    sort_by_date(select_top_n(&buckets, top_n))
}

/// Split events by `group_key` and build an independent ranked series for
/// each group.
///
/// Every distinct key yields exactly one [`SeriesGroup`], including the
/// empty key and groups whose events all have invalid timestamps (those get
/// `rows = []`). Group order is first-seen but callers should not rely on it.
pub fn partition_by_group(events: &[RawEvent], top_n: NonZeroUsize) -> Vec<SeriesGroup> {
    let mut partitions: IndexMap<&str, Vec<&RawEvent>> = IndexMap::new();
    for ev in events {
        partitions.entry(ev.group_key.as_str()).or_default().push(ev);
    }

    tracing::debug!(groups = partitions.len(), events = events.len(), "partitioned events by group");

    partitions
        .into_iter()
        .map(|(group_id, members)| SeriesGroup {
            group_id: group_id.to_string(),
            rows: ranked_series(members, top_n),
        })
        .collect()
}

/// Build both airplay views from one fetched event set: a global top-N
/// heatmap and a per-group streamgraph.
pub fn summarize_airplay(events: &[RawEvent], top_n: NonZeroUsize) -> AirplaySummary {
    let heatmap = heatmap_cells(&ranked_series(events, top_n));
    let streamgraph = partition_by_group(events, top_n);
    AirplaySummary {
        heatmap,
        streamgraph,
    }
}
