//! Orientation-to-pointer integration (gyro mouse)
//!
//! Each orientation sample is turned into the direction the controller points
//! at. The change in heading (horizontal) and elevation (vertical) since the
//! previous sample is accumulated per axis and reported as whole pointer steps.

use crate::accumulator::AngularAccumulator;
use crate::math::{self, Vec3};
use tracing::trace;

/// Direction that counts as "forward" in the controller frame
const FORWARD: Vec3 = [0.0, 1.0, 0.0];

/// Step counts produced by one sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GyroSteps {
    /// Heading change; positive when turning toward +x → +y (counter-clockwise
    /// seen from above)
    pub horizontal: i32,
    /// Elevation change; positive when pointing further down
    pub vertical: i32,
}

impl GyroSteps {
    pub fn is_zero(&self) -> bool {
        self.horizontal == 0 && self.vertical == 0
    }
}

#[derive(Debug, Clone)]
pub struct GyroMouse {
    last_direction: Option<Vec3>,
    axes: [AngularAccumulator; 2],
}

impl GyroMouse {
    /// Default sensitivity in degrees of rotation per pointer step
    pub const DEFAULT_STEP_DEG: f64 = 0.05;

    pub fn new(step_deg: f64) -> Self {
        Self {
            last_direction: None,
            axes: [
                AngularAccumulator::linear(step_deg),
                AngularAccumulator::linear(step_deg),
            ],
        }
    }

    /// Feed one raw (possibly unnormalized) orientation sample
    ///
    /// Samples that do not normalize to finite components are dropped without
    /// touching any state. The first accepted sample after construction or
    /// [`release`](Self::release) only sets the baseline.
    pub fn update(&mut self, w: f64, x: f64, y: f64, z: f64) -> GyroSteps {
        let q = math::normalize([w, x, y, z]);
        if q.iter().any(|c| !c.is_finite()) {
            trace!("Dropping malformed orientation sample");
            return GyroSteps::default();
        }

        let direction = math::rotate(q, FORWARD);
        let Some(last) = self.last_direction.replace(direction) else {
            return GyroSteps::default();
        };

        let horizontal = math::shortest_angle_diff_deg(heading(direction), heading(last));
        let vertical = math::shortest_angle_diff_deg(elevation(direction), elevation(last));

        GyroSteps {
            horizontal: self.axes[0].accumulate(horizontal),
            vertical: self.axes[1].accumulate(vertical),
        }
    }

    /// Forget the baseline; the next sample re-anchors
    pub fn release(&mut self) {
        self.last_direction = None;
    }

    pub fn is_engaged(&self) -> bool {
        self.last_direction.is_some()
    }
}

impl Default for GyroMouse {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP_DEG)
    }
}

fn heading(d: Vec3) -> f64 {
    math::angle_deg([d[0], d[1]])
}

fn elevation(d: Vec3) -> f64 {
    math::angle_deg([d[2], math::length(&d[..2])])
}
