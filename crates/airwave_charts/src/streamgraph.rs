use airwave_core::{Record, Timestamp};
use chrono::NaiveDate;
use indexmap::IndexSet;
use serde_json::Value;

use crate::common::{series_color, Margin};
use crate::geometry::{Geometry, Point, Size};
use crate::mark::{record_number, record_text, Mark};
use crate::runtime::ReconcilableChart;
use crate::scale::{LinearScale, TimeScale};

#[derive(Clone, Debug, PartialEq)]
pub struct StreamgraphStyle {
    pub margin: Margin,
    pub fill_alpha: f32,
    /// Half height of the value axis; `None` fits the widest day.
    pub y_extent: Option<f32>,
}

impl Default for StreamgraphStyle {
    fn default() -> Self {
        Self {
            margin: Margin::new(10.0, 25.0, 15.0, 25.0),
            fill_alpha: 0.9,
            y_extent: None,
        }
    }
}

/// Silhouette-stacked areas over wide day rows
/// (`{"date": "...", "<category>": n, ...}`).
///
/// Each category becomes one layer keyed by its name. Layers are stacked
/// around a baseline of `-sum / 2`, so the stream is centered on zero.
#[derive(Clone, Debug)]
pub struct StreamgraphChart {
    date_attr: String,
    pub style: StreamgraphStyle,
}

impl Default for StreamgraphChart {
    fn default() -> Self {
        Self {
            date_attr: "date".into(),
            style: StreamgraphStyle::default(),
        }
    }
}

/// Stacked layer bounds: `layers[k][i] = (y0, y1)` for category `k` on day `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct Stack {
    pub dates: Vec<NaiveDate>,
    pub keys: Vec<String>,
    pub layers: Vec<Vec<(f32, f32)>>,
    /// Largest per-day total
    pub max_sum: f32,
}

impl StreamgraphChart {
    pub fn new(date_attr: impl Into<String>) -> Self {
        Self {
            date_attr: date_attr.into(),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: StreamgraphStyle) -> Self {
        self.style = style;
        self
    }

    /// Date-sorted silhouette stack of `data`.
    ///
    /// Rows without a valid date are dropped; a category missing from a row
    /// counts as zero on that day. Only numeric columns become layers.
    pub fn stack(&self, data: &[Record]) -> Stack {
        let mut rows: Vec<(NaiveDate, &Record)> = data
            .iter()
            .filter_map(|r| {
                let date = Timestamp::text(record_text(r, &self.date_attr)?).date();
                if date.is_none() {
                    tracing::warn!(chart = "streamgraph", "row without a valid date skipped");
                }
                Some((date?, r))
            })
            .collect();
        rows.sort_by_key(|(d, _)| *d);

        let keys: IndexSet<&str> = rows
            .iter()
            .flat_map(|(_, r)| r.iter())
            .filter(|(k, v)| *k != &self.date_attr && matches!(v, Value::Number(_)))
            .map(|(k, _)| k.as_str())
            .collect();

        let mut layers = vec![Vec::with_capacity(rows.len()); keys.len()];
        let mut max_sum = 0.0_f32;
        for (_, row) in &rows {
            let values: Vec<f32> = keys
                .iter()
                .map(|k| record_number(row, k).unwrap_or(0.0).max(0.0))
                .collect();
            let sum: f32 = values.iter().sum();
            max_sum = max_sum.max(sum);

            let mut cur = -0.5 * sum;
            for (layer, v) in layers.iter_mut().zip(values) {
                layer.push((cur, cur + v));
                cur += v;
            }
        }

        Stack {
            dates: rows.iter().map(|(d, _)| *d).collect(),
            keys: keys.into_iter().map(str::to_string).collect(),
            layers,
            max_sum,
        }
    }
}

impl ReconcilableChart for StreamgraphChart {
    fn name(&self) -> &'static str {
        "streamgraph"
    }

    fn layout(&self, data: &[Record], size: Size) -> Vec<Mark> {
        let stack = self.stack(data);
        let (Some(&first), Some(&last)) = (stack.dates.first(), stack.dates.last()) else {
            return Vec::new();
        };

        let plot = self.style.margin.plot_rect(size);
        let x = TimeScale::new(first, last, plot.x, plot.x + plot.width);
        let extent = self
            .style
            .y_extent
            .unwrap_or(stack.max_sum * 0.55)
            .max(1.0);
        let y = LinearScale::new(-extent, extent, plot.y + plot.height, plot.y);

        stack
            .keys
            .iter()
            .zip(&stack.layers)
            .enumerate()
            .map(|(i, (key, layer))| {
                let upper = stack
                    .dates
                    .iter()
                    .zip(layer)
                    .map(|(d, (_, y1))| Point::new(x.map(*d), y.map(*y1)));
                let lower = stack
                    .dates
                    .iter()
                    .zip(layer)
                    .rev()
                    .map(|(d, (y0, _))| Point::new(x.map(*d), y.map(*y0)));
                let points: Vec<Point> = upper.chain(lower).collect();

                let total: f32 = layer.iter().map(|(y0, y1)| y1 - y0).sum();
                let mut datum = Record::new();
                datum.insert("key".into(), key.clone().into());
                datum.insert("total".into(), Value::from(total as f64));

                Mark::new(
                    key.clone(),
                    Geometry::Area { points },
                    series_color(i, self.style.fill_alpha),
                    datum,
                )
                .with_label(key.clone())
            })
            .collect()
    }
}
