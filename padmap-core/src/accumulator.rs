//! Continuous-to-discrete stepping with remainder carry-over
//!
//! An [`AngularAccumulator`] turns a stream of angles (or linear positions)
//! into signed integer step counts. Fractional motion that does not complete a
//! step is kept as the remainder and counted toward the next update, so no
//! motion is lost to quantization.

use crate::math;

/// How consecutive samples are differenced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    /// Degrees; differences fold into `[-180, 180]`
    Angular,
    /// Plain subtraction
    Linear,
}

#[derive(Debug, Clone)]
pub struct AngularAccumulator {
    step_size: f64,
    wrap: Wrap,
    remainder: f64,
    last_angle: Option<f64>,
}

impl AngularAccumulator {
    /// `step_size` must be positive; it is taken by absolute value.
    pub fn new(step_size: f64, wrap: Wrap) -> Self {
        Self {
            step_size: step_size.abs(),
            wrap,
            remainder: 0.0,
            last_angle: None,
        }
    }

    pub fn angular(step_size: f64) -> Self {
        Self::new(step_size, Wrap::Angular)
    }

    pub fn linear(step_size: f64) -> Self {
        Self::new(step_size, Wrap::Linear)
    }

    /// Feed a new sample and return the completed steps
    ///
    /// The first sample after construction or [`release`](Self::release)
    /// only records the baseline and returns 0.
    pub fn update(&mut self, value: f64) -> i32 {
        if !value.is_finite() {
            return 0;
        }
        let Some(last) = self.last_angle.replace(value) else {
            self.remainder = 0.0;
            return 0;
        };
        let delta = match self.wrap {
            Wrap::Angular => math::shortest_angle_diff_deg(value, last),
            Wrap::Linear => value - last,
        };
        self.accumulate(delta)
    }

    /// Add a raw delta to the remainder and extract whole steps
    ///
    /// Truncates toward zero, so positive and negative motion quantize
    /// symmetrically. A single call reports at most `i32::MAX` steps either
    /// way; motion beyond that stays in the remainder and is reported by later
    /// calls. Otherwise `|remainder| < step_size` afterwards.
    pub fn accumulate(&mut self, delta: f64) -> i32 {
        if !delta.is_finite() || self.step_size == 0.0 {
            return 0;
        }
        let total = delta + self.remainder;
        let limit = f64::from(i32::MAX);
        let steps = ((total.abs() / self.step_size).trunc() * total.signum()).clamp(-limit, limit);
        self.remainder = total - steps * self.step_size;
        steps as i32
    }

    /// Disengage; the next [`update`](Self::update) re-baselines
    pub fn release(&mut self) {
        self.last_angle = None;
    }

    pub fn is_engaged(&self) -> bool {
        self.last_angle.is_some()
    }

    pub fn remainder(&self) -> f64 {
        self.remainder
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }
}

/// Circular scrolling on a touch surface
///
/// Moving a finger around the pad center produces one step per `step`
/// degrees of travel; counter-clockwise (toward +y) is positive.
#[derive(Debug, Clone)]
pub struct ScrollWheel {
    accumulator: AngularAccumulator,
}

impl ScrollWheel {
    pub const DEFAULT_STEP_DEG: f64 = 30.0;

    pub fn new(step_deg: f64) -> Self {
        Self {
            accumulator: AngularAccumulator::angular(step_deg),
        }
    }

    /// Feed the current touch position, returns scroll ticks
    pub fn update_position(&mut self, x: f64, y: f64) -> i32 {
        self.accumulator.update(math::angle_deg([x, y]))
    }

    pub fn release(&mut self) {
        self.accumulator.release();
    }

    pub fn is_engaged(&self) -> bool {
        self.accumulator.is_engaged()
    }
}

impl Default for ScrollWheel {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP_DEG)
    }
}
