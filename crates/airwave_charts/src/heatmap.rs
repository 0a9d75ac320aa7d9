use airwave_core::{Record, Timestamp};
use chrono::NaiveDate;

use crate::common::{distinct_values, keyed_records, require_attr, Margin};
use crate::error::Result;
use crate::geometry::{Color, Geometry, Rect, Size};
use crate::mark::{record_id, record_number, record_text, Mark};
use crate::runtime::ReconcilableChart;
use crate::scale::{BandScale, LinearScale, TimeScale};

#[derive(Clone, Debug, PartialEq)]
pub struct HeatmapStyle {
    pub margin: Margin,
    pub padding: f32,
    /// Width of one day column
    pub cell_width: f32,
    pub low: Color,
    pub high: Color,
    /// Counts mapped onto `low..=high`
    pub color_domain: (f32, f32),
    /// Visible date range; `None` uses the data extent.
    pub date_domain: Option<(NaiveDate, NaiveDate)>,
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        Self {
            margin: Margin::new(20.0, 20.0, 20.0, 100.0),
            padding: 0.15,
            cell_width: 2.5,
            low: Color::hex("#fce7f3"),
            high: Color::hex("#db2777"),
            color_domain: (1.0, 6.0),
            date_domain: None,
        }
    }
}

/// Day-by-category heatmap over [`airwave_core::HeatmapCell`] records.
///
/// Rows are categories (first seen at the top), columns are days. A zero
/// count is drawn fully transparent.
#[derive(Clone, Debug)]
pub struct HeatmapChart {
    id_attr: String,
    date_attr: String,
    row_attr: String,
    value_attr: String,
    pub style: HeatmapStyle,
}

impl Default for HeatmapChart {
    fn default() -> Self {
        Self {
            id_attr: "id".into(),
            date_attr: "date".into(),
            row_attr: "artist".into(),
            value_attr: "count".into(),
            style: HeatmapStyle::default(),
        }
    }
}

impl HeatmapChart {
    pub fn new(
        id_attr: impl Into<String>,
        date_attr: impl Into<String>,
        row_attr: impl Into<String>,
        value_attr: impl Into<String>,
    ) -> Result<Self> {
        let chart = Self {
            id_attr: id_attr.into(),
            date_attr: date_attr.into(),
            row_attr: row_attr.into(),
            value_attr: value_attr.into(),
            style: HeatmapStyle::default(),
        };
        require_attr("heatmap", "id", &chart.id_attr)?;
        require_attr("heatmap", "date", &chart.date_attr)?;
        require_attr("heatmap", "row", &chart.row_attr)?;
        require_attr("heatmap", "value", &chart.value_attr)?;
        Ok(chart)
    }

    pub fn with_style(mut self, style: HeatmapStyle) -> Self {
        self.style = style;
        self
    }

    fn cell_color(&self, count: f32) -> Color {
        if count <= 0.0 {
            return Color::TRANSPARENT;
        }
        let (lo, hi) = self.style.color_domain;
        let t = LinearScale::new(lo, hi, 0.0, 1.0).unit(count);
        self.style.low.lerp(self.style.high, t)
    }

    fn record_date(&self, record: &Record) -> Option<NaiveDate> {
        Timestamp::text(record_text(record, &self.date_attr)?).date()
    }
}

impl ReconcilableChart for HeatmapChart {
    fn name(&self) -> &'static str {
        "heatmap"
    }

    fn layout(&self, data: &[Record], size: Size) -> Vec<Mark> {
        let records: Vec<_> = keyed_records(self.name(), data, &self.id_attr)
            .into_iter()
            .filter_map(|(id, record)| match self.record_date(record) {
                Some(date) => Some((id, record, date)),
                None => {
                    tracing::warn!(chart = "heatmap", %id, "cell without a valid date skipped");
                    None
                }
            })
            .collect();

        let (first, last) = match self.style.date_domain {
            Some(domain) => domain,
            None => {
                let mut dates = records.iter().map(|(_, _, d)| *d);
                let Some(first) = dates.next() else {
                    return Vec::new();
                };
                dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)))
            }
        };

        let plot = self.style.margin.plot_rect(size);
        let x = TimeScale::new(first, last, plot.x, plot.x + plot.width);
        let keyed: Vec<(String, &Record)> = records.iter().map(|(id, r, _)| (id.clone(), *r)).collect();
        let rows = distinct_values(&keyed, &self.row_attr);
        let y = BandScale::new(
            rows.len(),
            plot.y,
            plot.y + plot.height,
            self.style.padding,
            self.style.padding,
        );

        records
            .into_iter()
            .filter_map(|(id, record, date)| {
                let row = record_id(record, &self.row_attr)?;
                let top = y.band_start(rows.iter().position(|r| *r == row)?)?;
                let count = record_number(record, &self.value_attr).unwrap_or(0.0);
                let geometry = Geometry::Rect {
                    rect: Rect::new(x.map(date), top, self.style.cell_width, y.band_width()),
                    corner_radius: 0.0,
                };
                Some(Mark::new(id, geometry, self.cell_color(count), record.clone()))
            })
            .collect()
    }
}
