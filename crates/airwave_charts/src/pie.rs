use std::f32::consts::TAU;

use airwave_core::Record;
use rustc_hash::FxHashMap;

use crate::common::{keyed_records, require_attr, series_color};
use crate::error::Result;
use crate::geometry::{Color, Geometry, Point, Size};
use crate::mark::{record_number, record_text, Mark};
use crate::runtime::ReconcilableChart;

#[derive(Clone, Debug, PartialEq)]
pub struct PieChartStyle {
    /// Outer radius; `None` fills the smaller container side.
    pub radius: Option<f32>,
    pub inner_radius: f32,
    pub fill_alpha: f32,
    /// Prefix stripped from keys for slice labels
    pub label_prefix: String,
}

impl Default for PieChartStyle {
    fn default() -> Self {
        Self {
            radius: None,
            inner_radius: 0.0,
            fill_alpha: 0.7,
            label_prefix: "population_".into(),
        }
    }
}

/// Pie of percentage entries (`{"key": ..., "value": ...}` by default).
///
/// Slices are sized by value and laid out clockwise from 12 o'clock in
/// descending value order; marks keep the input order.
#[derive(Clone, Debug)]
pub struct PieChart {
    id_attr: String,
    value_attr: String,
    colors: FxHashMap<String, Color>,
    pub style: PieChartStyle,
}

impl Default for PieChart {
    fn default() -> Self {
        Self {
            id_attr: "key".into(),
            value_attr: "value".into(),
            colors: FxHashMap::default(),
            style: PieChartStyle::default(),
        }
    }
}

impl PieChart {
    pub fn new(id_attr: impl Into<String>, value_attr: impl Into<String>) -> Result<Self> {
        let (id_attr, value_attr) = (id_attr.into(), value_attr.into());
        require_attr("pie", "id", &id_attr)?;
        require_attr("pie", "value", &value_attr)?;
        Ok(Self {
            id_attr,
            value_attr,
            ..Self::default()
        })
    }

    /// Fixed color per key. Keys without an entry use the series palette.
    pub fn with_colors<I, K>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = (K, Color)>,
        K: Into<String>,
    {
        self.colors = colors.into_iter().map(|(k, c)| (k.into(), c)).collect();
        self
    }

    pub fn with_style(mut self, style: PieChartStyle) -> Self {
        self.style = style;
        self
    }

    fn slice_label(&self, key: &str) -> String {
        key.strip_prefix(self.style.label_prefix.as_str())
            .unwrap_or(key)
            .to_string()
    }
}

impl ReconcilableChart for PieChart {
    fn name(&self) -> &'static str {
        "pie"
    }

    fn layout(&self, data: &[Record], size: Size) -> Vec<Mark> {
        let records = keyed_records(self.name(), data, &self.id_attr);
        let values: Vec<f32> = records
            .iter()
            .map(|(_, r)| record_number(r, &self.value_attr).unwrap_or(0.0).max(0.0))
            .collect();
        let total: f32 = values.iter().sum();

        // Stable sort keeps input order among equal values.
        let mut order: Vec<usize> = (0..records.len()).collect();
        order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

        let mut angles = vec![(0.0_f32, 0.0_f32); records.len()];
        let mut cursor = 0.0_f32;
        for idx in order {
            let sweep = if total > 0.0 { values[idx] / total * TAU } else { 0.0 };
            angles[idx] = (cursor, cursor + sweep);
            cursor += sweep;
        }

        let center = Point::new(size.width * 0.5, size.height * 0.5);
        let radius = self
            .style
            .radius
            .unwrap_or(size.width.min(size.height) * 0.5)
            .max(0.0);

        records
            .into_iter()
            .enumerate()
            .map(|(i, (id, record))| {
                let (start_angle, end_angle) = angles[i];
                let fill = self
                    .colors
                    .get(&id)
                    .copied()
                    .unwrap_or_else(|| series_color(i, 1.0))
                    .with_alpha(self.style.fill_alpha);
                let value = record_text(record, &self.value_attr).unwrap_or_else(|| "0".into());
                let label = format!("{} {}%", self.slice_label(&id), value);
                let geometry = Geometry::Arc {
                    center,
                    inner_radius: self.style.inner_radius,
                    outer_radius: radius,
                    start_angle,
                    end_angle,
                };
                Mark::new(id, geometry, fill, record.clone()).with_label(label)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn data(v: serde_json::Value) -> Vec<Record> {
        v.as_array()
            .unwrap()
            .iter()
            .map(|r| r.as_object().unwrap().clone())
            .collect()
    }

    fn angles(m: &Mark) -> (f32, f32) {
        match m.geometry {
            Geometry::Arc {
                start_angle,
                end_angle,
                ..
            } => (start_angle, end_angle),
            ref other => panic!("expected arc, got {other:?}"),
        }
    }

    #[test]
    fn largest_slice_starts_at_twelve_oclock() {
        let chart = PieChart::default();
        let marks = chart.layout(
            &data(json!([
                {"key": "population_male", "value": 25},
                {"key": "population_female", "value": 75}
            ])),
            Size::new(200.0, 200.0),
        );
        let (s0, e0) = angles(&marks[0]);
        let (s1, e1) = angles(&marks[1]);
        assert_eq!(s1, 0.0);
        assert!((e1 - 0.75 * TAU).abs() < 1e-5);
        assert!((s0 - e1).abs() < 1e-5);
        assert!((e0 - TAU).abs() < 1e-5);
    }

    #[test]
    fn labels_strip_the_prefix() {
        let chart = PieChart::default();
        let marks = chart.layout(
            &data(json!([{"key": "population_male", "value": 50}])),
            Size::new(100.0, 100.0),
        );
        assert_eq!(marks[0].label.as_deref(), Some("male 50%"));
    }

    #[test]
    fn zero_total_gives_empty_slices() {
        let chart = PieChart::default();
        let marks = chart.layout(
            &data(json!([{"key": "a", "value": 0}, {"key": "b", "value": 0}])),
            Size::new(100.0, 100.0),
        );
        assert!(marks.iter().all(|m| {
            let (s, e) = angles(m);
            s == e
        }));
    }

    #[test]
    fn configured_colors_win_over_palette() {
        let red = Color::hex("#ff0000");
        let chart = PieChart::default().with_colors([("a", red)]);
        let marks = chart.layout(&data(json!([{"key": "a", "value": 1}])), Size::new(10.0, 10.0));
        assert_eq!(marks[0].fill, red.with_alpha(0.7));
    }
}
