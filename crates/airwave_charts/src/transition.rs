use std::time::Duration;

use crate::geometry::Geometry;
use crate::interpolate::lerp_f32;

/// Fixed duration of update transitions.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueTransition {
    start: f32,
    end: f32,
    duration: f32,
    elapsed: f32,
    value: f32,
}

impl ValueTransition {
    pub fn new(start: f32, end: f32, duration_seconds: f32) -> Self {
        let duration = duration_seconds.max(1e-6);
        Self {
            start,
            end,
            duration,
            elapsed: 0.0,
            value: start,
        }
    }

    /// 0 -> 1 progress over `duration`.
    pub fn progress(duration: Duration) -> Self {
        Self::new(0.0, 1.0, duration.as_secs_f32())
    }

    pub fn step(&mut self, dt_seconds: f32) {
        if self.is_finished() {
            self.value = self.end;
            return;
        }
        self.elapsed = (self.elapsed + dt_seconds.max(0.0)).min(self.duration);
        let t = self.elapsed / self.duration;
        self.value = lerp_f32(self.start, self.end, t);
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// A drawn element moving from one geometry to another.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryTransition {
    from: Geometry,
    to: Geometry,
    progress: ValueTransition,
}

impl GeometryTransition {
    pub fn new(from: Geometry, to: Geometry, duration: Duration) -> Self {
        Self {
            from,
            to,
            progress: ValueTransition::progress(duration),
        }
    }

    pub fn step(&mut self, dt: Duration) -> Geometry {
        self.progress.step(dt.as_secs_f32());
        self.current()
    }

    pub fn current(&self) -> Geometry {
        if self.is_finished() {
            return self.to.clone();
        }
        self.from.lerp(&self.to, self.progress.value())
    }

    pub fn target(&self) -> &Geometry {
        &self.to
    }

    pub fn is_finished(&self) -> bool {
        self.progress.is_finished()
    }
}
