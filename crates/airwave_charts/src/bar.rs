use airwave_core::Record;

use crate::common::{distinct_values, keyed_records, require_attr, Margin};
use crate::error::Result;
use crate::geometry::{Color, Geometry, Rect, Size};
use crate::mark::{record_id, record_number, record_text, Mark};
use crate::runtime::ReconcilableChart;
use crate::scale::{BandScale, LinearScale};

#[derive(Clone, Debug, PartialEq)]
pub struct BarChartStyle {
    pub margin: Margin,
    /// Band padding (inner and outer)
    pub padding: f32,
    pub corner_radius: f32,
    pub fill: Color,
    /// Upper end of the value axis; `None` uses the largest value.
    pub x_max: Option<f32>,
}

impl Default for BarChartStyle {
    fn default() -> Self {
        Self {
            margin: Margin::new(10.0, 10.0, 10.0, 38.0),
            padding: 0.2,
            corner_radius: 5.0,
            fill: Color::hex("#2563eb"),
            x_max: None,
        }
    }
}

/// Horizontal bars: one band per distinct `y_attr` value, bar length from
/// `x_attr`. The first band sits at the bottom.
#[derive(Clone, Debug)]
pub struct BarChart {
    id_attr: String,
    x_attr: String,
    y_attr: String,
    pub style: BarChartStyle,
}

impl BarChart {
    pub fn new(
        id_attr: impl Into<String>,
        x_attr: impl Into<String>,
        y_attr: impl Into<String>,
    ) -> Result<Self> {
        let (id_attr, x_attr, y_attr) = (id_attr.into(), x_attr.into(), y_attr.into());
        require_attr("bar", "id", &id_attr)?;
        require_attr("bar", "x", &x_attr)?;
        require_attr("bar", "y", &y_attr)?;
        Ok(Self {
            id_attr,
            x_attr,
            y_attr,
            style: BarChartStyle::default(),
        })
    }

    pub fn with_style(mut self, style: BarChartStyle) -> Self {
        self.style = style;
        self
    }
}

impl ReconcilableChart for BarChart {
    fn name(&self) -> &'static str {
        "bar"
    }

    fn layout(&self, data: &[Record], size: Size) -> Vec<Mark> {
        let records = keyed_records(self.name(), data, &self.id_attr);
        let bands = distinct_values(&records, &self.y_attr);
        let plot = self.style.margin.plot_rect(size);

        let x_max = self.style.x_max.unwrap_or_else(|| {
            records
                .iter()
                .filter_map(|(_, r)| record_number(r, &self.x_attr))
                .fold(0.0_f32, f32::max)
        });
        let x = LinearScale::new(0.0, x_max.max(1.0), plot.x, plot.x + plot.width);
        let y = BandScale::new(
            bands.len(),
            plot.y,
            plot.y + plot.height,
            self.style.padding,
            self.style.padding,
        );

        records
            .into_iter()
            .filter_map(|(id, record)| {
                let band = record_id(record, &self.y_attr)?;
                let idx = bands.iter().position(|b| *b == band)?;
                let top = y.band_start_reversed(idx)?;
                let value = record_number(record, &self.x_attr).unwrap_or(0.0).max(0.0);
                let width = (x.map(value) - x.map(0.0)).max(0.0);
                let label = format!(
                    "{}%",
                    record_text(record, &self.x_attr).unwrap_or_else(|| "0".into())
                );
                let geometry = Geometry::Rect {
                    rect: Rect::new(x.map(0.0), top, width, y.band_width()),
                    corner_radius: self.style.corner_radius,
                };
                Some(Mark::new(id, geometry, self.style.fill, record.clone()).with_label(label))
            })
            .collect()
    }
}
