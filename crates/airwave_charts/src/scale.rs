use chrono::NaiveDate;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    pub fn new(domain_min: f32, domain_max: f32, range_min: f32, range_max: f32) -> Self {
        Self {
            domain_min,
            domain_max,
            range_min,
            range_max,
        }
    }

    pub fn map(&self, value: f32) -> f32 {
        let d = self.domain_max - self.domain_min;
        if d.abs() < 1e-12 {
            return self.range_min;
        }
        let t = (value - self.domain_min) / d;
        self.range_min + t * (self.range_max - self.range_min)
    }

    /// Normalized position of `value` in the domain, clamped to 0..=1.
    pub fn unit(&self, value: f32) -> f32 {
        let d = self.domain_max - self.domain_min;
        if d.abs() < 1e-12 {
            return 0.0;
        }
        ((value - self.domain_min) / d).clamp(0.0, 1.0)
    }
}

/// Evenly spaced bands, as used for categorical axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandScale {
    count: usize,
    start: f32,
    step: f32,
    band_width: f32,
}

impl BandScale {
    pub fn new(
        count: usize,
        range_min: f32,
        range_max: f32,
        padding_inner: f32,
        padding_outer: f32,
    ) -> Self {
        if count == 0 {
            return Self {
                count: 0,
                start: range_min,
                step: 0.0,
                band_width: 0.0,
            };
        }
        let count_f = count as f32;
        let span = (range_max - range_min).max(0.0);
        let denom = (count_f - padding_inner + 2.0 * padding_outer).max(1e-6);
        let step = span / denom;
        let band_width = step * (1.0 - padding_inner).max(0.0);
        let start = range_min + step * padding_outer;
        Self {
            count,
            start,
            step,
            band_width,
        }
    }

    pub fn band_width(&self) -> f32 {
        self.band_width
    }

    pub fn band_start(&self, idx: usize) -> Option<f32> {
        if idx >= self.count {
            return None;
        }
        Some(self.start + self.step * idx as f32)
    }

    /// Band start counting from the far end of the range, so index 0 sits at
    /// the bottom of a vertical axis.
    pub fn band_start_reversed(&self, idx: usize) -> Option<f32> {
        if idx >= self.count {
            return None;
        }
        self.band_start(self.count - 1 - idx)
    }
}

/// Calendar-day time axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    linear: LinearScale,
    origin: NaiveDate,
}

impl TimeScale {
    pub fn new(first: NaiveDate, last: NaiveDate, range_min: f32, range_max: f32) -> Self {
        let span = (last - first).num_days().max(0) as f32;
        Self {
            linear: LinearScale::new(0.0, span, range_min, range_max),
            origin: first,
        }
    }

    pub fn map(&self, date: NaiveDate) -> f32 {
        self.linear.map((date - self.origin).num_days() as f32)
    }
}
