use airwave_core::Record;
use rustc_hash::FxHashSet;

use crate::error::{ChartError, Result};
use crate::geometry::{Color, Rect, Size};
use crate::mark::record_id;

/// Plot margins in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margin {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Plot area left inside `size`. May be empty for tiny containers.
    pub fn plot_rect(&self, size: Size) -> Rect {
        Rect::new(
            self.left,
            self.top,
            (size.width - self.left - self.right).max(0.0),
            (size.height - self.top - self.bottom).max(0.0),
        )
    }
}

const PALETTE: [(f32, f32, f32); 6] = [
    (0.35, 0.65, 1.0),
    (0.95, 0.55, 0.35),
    (0.40, 0.85, 0.55),
    (0.90, 0.75, 0.25),
    (0.75, 0.55, 0.95),
    (0.25, 0.80, 0.85),
];

/// Deterministic categorical color for series `i`.
pub fn series_color(i: usize, alpha: f32) -> Color {
    let (r, g, b) = PALETTE[i % PALETTE.len()];
    Color::rgba(r, g, b, alpha)
}

pub(crate) fn require_attr(chart: &str, name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ChartError::InvalidConfig(format!(
            "{chart}: `{name}` attribute must not be empty"
        )));
    }
    Ok(())
}

/// Records paired with their join key.
///
/// Records without a usable id are skipped; a repeated id keeps its first
/// record.
pub fn keyed_records<'a>(chart: &str, data: &'a [Record], id_attr: &str) -> Vec<(String, &'a Record)> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::with_capacity(data.len());
    for (idx, record) in data.iter().enumerate() {
        let Some(id) = record_id(record, id_attr) else {
            tracing::warn!(chart, index = idx, id_attr, "record without id skipped");
            continue;
        };
        if !seen.insert(id.clone()) {
            tracing::warn!(chart, %id, "duplicate id; keeping first record");
            continue;
        }
        out.push((id, record));
    }
    out
}

/// Distinct values of `attr`, in first-seen order.
pub(crate) fn distinct_values(records: &[(String, &Record)], attr: &str) -> Vec<String> {
    let mut seen = FxHashSet::default();
    records
        .iter()
        .filter_map(|(_, r)| record_id(r, attr))
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(v: serde_json::Value) -> Vec<Record> {
        v.as_array()
            .unwrap()
            .iter()
            .map(|r| r.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn keyed_records_skip_missing_and_duplicate_ids() {
        let data = records(json!([
            {"id": "a", "v": 1},
            {"v": 2},
            {"id": "a", "v": 3},
            {"id": 4, "v": 4}
        ]));
        let keyed = keyed_records("test", &data, "id");
        let ids: Vec<&str> = keyed.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "4"]);
        assert_eq!(keyed[0].1["v"], json!(1));
    }

    #[test]
    fn plot_rect_never_negative() {
        let m = Margin::new(10.0, 10.0, 10.0, 38.0);
        let r = m.plot_rect(Size::new(20.0, 5.0));
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 0.0);
    }

    #[test]
    fn empty_attr_is_rejected() {
        assert!(require_attr("bar", "id", " ").is_err());
        assert!(require_attr("bar", "id", "id").is_ok());
    }
}
