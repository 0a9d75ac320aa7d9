//! Derived, chart-shaped tables.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::event::Record;

/// Per-category counts for one calendar day.
///
/// Sparse: a category absent on this date has no entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucketRow {
    pub date: NaiveDate,
    pub counts: IndexMap<String, u64>,
}

impl DayBucketRow {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            counts: IndexMap::new(),
        }
    }

    /// Count for `category`; missing means zero.
    pub fn count(&self, category: &str) -> u64 {
        self.counts.get(category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// A day row restricted to a ranked category set.
///
/// Every row of one table carries the same keys, in rank order, with zeros
/// filled in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedRow {
    pub date: NaiveDate,
    pub counts: IndexMap<String, u64>,
}

impl RankedRow {
    pub fn count(&self, category: &str) -> u64 {
        self.counts.get(category).copied().unwrap_or(0)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Wide record form (`{"date": "...", "<category>": n, ...}`) consumed by
    /// the streamgraph chart.
    pub fn to_record(&self) -> Record {
        let mut out = Record::new();
        out.insert("date".into(), self.date.to_string().into());
        for (k, v) in &self.counts {
            out.insert(k.clone(), (*v).into());
        }
        out
    }
}

/// One ranked series per group key (e.g. per market).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesGroup {
    #[serde(rename = "id")]
    pub group_id: String,
    #[serde(rename = "data")]
    pub rows: Vec<RankedRow>,
}

/// Long-form cell for heatmap rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    #[serde(rename = "artist")]
    pub category: String,
    pub count: u64,
}

impl HeatmapCell {
    /// Stable id `"<date>|<category>"`, used as the chart join key.
    pub fn id(&self) -> String {
        format!("{}|{}", self.date, self.category)
    }

    pub fn to_record(&self) -> Record {
        let mut out = Record::new();
        out.insert("id".into(), self.id().into());
        out.insert("date".into(), self.date.to_string().into());
        out.insert("artist".into(), self.category.clone().into());
        out.insert("count".into(), self.count.into());
        out
    }
}

/// Flatten ranked rows into heatmap cells, row by row in rank order.
pub fn heatmap_cells(rows: &[RankedRow]) -> Vec<HeatmapCell> {
    rows.iter()
        .flat_map(|row| {
            row.counts.iter().map(move |(category, &count)| HeatmapCell {
                date: row.date,
                category: category.clone(),
                count,
            })
        })
        .collect()
}

/// Heatmap plus per-group streamgraph series for one airplay fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirplaySummary {
    pub heatmap: Vec<HeatmapCell>,
    pub streamgraph: Vec<SeriesGroup>,
}

/// Rows that carry a calendar date.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for DayBucketRow {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for RankedRow {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for HeatmapCell {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
