//! Value-to-angle mapping and tick geometry.
//!
//! Everything here is a pure function of a single value and the configured
//! range, so the render pipeline can recompute it every frame.
//!
//! Angles are in degrees, measured clockwise from the positive x axis in
//! screen space (y grows downward).

use crate::config::GaugeConfig;
use crate::error::Result;

/// Where the scale begins, in degrees.
pub const START_ANGLE: f32 = 140.0;
/// Angular extent of the full scale, in degrees.
pub const FULL_SWEEP: f32 = 260.0;
/// Tick lines drawn across the full sweep.
pub const TICK_COUNT: usize = 46;
/// Gaps between consecutive ticks.
pub const TICK_INTERVALS: i64 = TICK_COUNT as i64 - 1;
/// Every n-th tick, starting at index 0, is a major tick.
pub const MAJOR_TICK_EVERY: usize = 5;
/// Upper bound on numeric labels drawn around the scale.
pub const MAX_SCALE_LABELS: usize = 100;

/// Per-frame geometry derived from the displayed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedGeometry {
    pub progress_sweep_angle: f32,
    pub active_tick_count: usize,
    pub tick_sweep_angle: f32,
}

/// Range-dependent geometry of a gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeModel {
    min_value: i64,
    max_value: i64,
    tick_interval: i64,
}

impl GaugeModel {
    /// Fails unless `min < max` and `tick_interval > 0`.
    pub fn new(config: &GaugeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            min_value: config.min_value,
            max_value: config.max_value,
            tick_interval: config.tick_interval,
        })
    }

    fn span(&self) -> i64 {
        self.max_value - self.min_value
    }

    /// Distance from the range start, saturated to the range.
    fn offset(&self, value: i64) -> i64 {
        value.clamp(self.min_value, self.max_value) - self.min_value
    }

    /// Position of `value` on the scale, in `[0, 1]`.
    pub fn fraction(&self, value: i64) -> f32 {
        (self.offset(value) as f64 / self.span() as f64) as f32
    }

    /// Value covered by one gap between ticks.
    pub fn line_value_difference(&self) -> f64 {
        self.span() as f64 / TICK_INTERVALS as f64
    }

    /// Index of the last tick at or below `value`.
    ///
    /// Integer form of `floor(offset / line_value_difference)`; exact on tick
    /// boundaries regardless of the span.
    fn tick_index(&self, value: i64) -> i64 {
        let scaled = self.offset(value) as i128 * TICK_INTERVALS as i128;
        (scaled / self.span() as i128) as i64
    }

    pub fn sweep_angle_for_arc(&self, value: i64) -> f32 {
        (self.fraction(value) * FULL_SWEEP).min(FULL_SWEEP)
    }

    pub fn number_of_active_ticks(&self, value: i64) -> usize {
        ((self.tick_index(value) + 1) as usize).min(TICK_COUNT)
    }

    /// Sweep of the active ticks, snapped down to the last tick boundary.
    pub fn tick_sweep_angle(&self, value: i64) -> f32 {
        let index = self.tick_index(value).min(TICK_INTERVALS);
        ((index as f64 / TICK_INTERVALS as f64) * FULL_SWEEP as f64) as f32
    }

    pub fn derive(&self, value: i64) -> DerivedGeometry {
        DerivedGeometry {
            progress_sweep_angle: self.sweep_angle_for_arc(value),
            active_tick_count: self.number_of_active_ticks(value),
            tick_sweep_angle: self.tick_sweep_angle(value),
        }
    }

    /// Values that get a numeric label: `min, min + interval, ...` up to `max`,
    /// at most [`MAX_SCALE_LABELS`] of them.
    pub fn label_values(&self) -> impl Iterator<Item = i64> {
        let step = usize::try_from(self.tick_interval).unwrap_or(usize::MAX);
        (self.min_value..=self.max_value)
            .step_by(step)
            .take(MAX_SCALE_LABELS)
    }

    pub fn label_angle(&self, value: i64) -> f32 {
        START_ANGLE + self.sweep_angle_for_arc(value)
    }
}

/// Angle of tick `index` when `count` ticks are spread over `sweep` degrees.
pub fn tick_angle(index: usize, count: usize, sweep: f32) -> f32 {
    if count <= 1 {
        return START_ANGLE;
    }
    START_ANGLE + index as f32 / (count - 1) as f32 * sweep
}

pub fn is_major_tick(index: usize) -> bool {
    index % MAJOR_TICK_EVERY == 0
}

/// Point at `radius` from `(cx, cy)` in direction `degrees`.
pub fn polar(cx: f32, cy: f32, radius: f32, degrees: f32) -> (f32, f32) {
    let theta = degrees.to_radians();
    (cx + radius * theta.cos(), cy + radius * theta.sin())
}
