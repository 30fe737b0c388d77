//! Region hit-testing on a 2D analog surface
//!
//! A [`RegionMap`] holds an ordered list of regions, each remembering whether
//! the last position was inside it. Every position update re-tests all regions
//! and reports each enter/exit transition through a callback, in construction
//! order. Overlapping regions are allowed and fire independently.
//!
//! Angles follow the math convention: 0° along +x, positive toward +y.
//!
//! Degenerate bounds are not rejected: a polar angle span of 360° or more
//! contains every angle, and a linear bound pair with `min > max` contains
//! nothing.

use crate::math;
use serde::{Deserialize, Serialize};

/// Inclusive angle interval in degrees, interpreted on the circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    pub min: f64,
    pub max: f64,
}

impl AngleRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Test `angle` (degrees, any turn) against the interval
    pub fn contains(&self, angle: f64) -> bool {
        if !(angle.is_finite() && self.min.is_finite() && self.max.is_finite()) {
            return false;
        }
        // the turn of `angle` that lies in (max - 360, max]
        let a = self.max - (self.max - angle).rem_euclid(360.0);
        a >= self.min
    }
}

/// Region geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    /// Axis-aligned box; absent bounds are open
    Rect {
        #[serde(default)]
        min_x: Option<f64>,
        #[serde(default)]
        max_x: Option<f64>,
        #[serde(default)]
        min_y: Option<f64>,
        #[serde(default)]
        max_y: Option<f64>,
    },
    /// Open disk (the boundary is outside)
    Circle {
        center_x: f64,
        center_y: f64,
        radius: f64,
    },
    /// Ring sector around the origin
    Polar {
        #[serde(default)]
        min_r: Option<f64>,
        #[serde(default)]
        max_r: Option<f64>,
        #[serde(default)]
        angle: Option<AngleRange>,
    },
}

impl Shape {
    pub fn rect(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Shape::Rect {
            min_x: Some(min_x),
            max_x: Some(max_x),
            min_y: Some(min_y),
            max_y: Some(max_y),
        }
    }

    pub fn circle(center_x: f64, center_y: f64, radius: f64) -> Self {
        Shape::Circle {
            center_x,
            center_y,
            radius,
        }
    }

    /// Sector with a minimum radius, the usual touch-pad d-pad slice
    pub fn sector(min_r: f64, min_angle: f64, max_angle: f64) -> Self {
        Shape::Polar {
            min_r: Some(min_r),
            max_r: None,
            angle: Some(AngleRange::new(min_angle, max_angle)),
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        match self {
            Shape::Rect {
                min_x,
                max_x,
                min_y,
                max_y,
            } => {
                min_x.map_or(true, |b| x >= b)
                    && max_x.map_or(true, |b| x <= b)
                    && min_y.map_or(true, |b| y >= b)
                    && max_y.map_or(true, |b| y <= b)
            }
            Shape::Circle {
                center_x,
                center_y,
                radius,
            } => math::length(&[x - center_x, y - center_y]) < *radius,
            Shape::Polar {
                min_r,
                max_r,
                angle,
            } => {
                let r = math::length(&[x, y]);
                min_r.map_or(true, |b| r >= b)
                    && max_r.map_or(true, |b| r <= b)
                    && angle.map_or(true, |range| range.contains(math::angle_deg([x, y])))
            }
        }
    }
}

/// A shape, its last containment state and the caller's action payload
#[derive(Debug, Clone)]
pub struct Region<A> {
    pub shape: Shape,
    pub action: A,
    state: bool,
}

impl<A> Region<A> {
    pub fn new(shape: Shape, action: A) -> Self {
        Self {
            shape,
            action,
            state: false,
        }
    }

    pub fn state(&self) -> bool {
        self.state
    }
}

/// Ordered set of regions over one surface
#[derive(Debug, Clone)]
pub struct RegionMap<A> {
    regions: Vec<Region<A>>,
}

impl<A> RegionMap<A> {
    pub fn new(regions: Vec<Region<A>>) -> Self {
        Self { regions }
    }

    /// Re-test every region at `(x, y)`
    ///
    /// `on_change(action, inside)` is called for each region whose containment
    /// differs from the previous call, before its stored state is updated.
    pub fn update_position(&mut self, x: f64, y: f64, on_change: impl FnMut(&A, bool)) {
        self.update_each(|_| Some((x, y)), on_change);
    }

    /// Re-test every region at a point chosen per region
    ///
    /// `locate(action)` gives the point to test, or `None` to count the region
    /// as exited. Regions are visited in order, so one map can span several
    /// surfaces and still report changes in registration order.
    pub fn update_each(
        &mut self,
        mut locate: impl FnMut(&A) -> Option<(f64, f64)>,
        mut on_change: impl FnMut(&A, bool),
    ) {
        for region in &mut self.regions {
            let inside =
                locate(&region.action).map_or(false, |(x, y)| region.shape.contains(x, y));
            if inside != region.state {
                on_change(&region.action, inside);
                region.state = inside;
            }
        }
    }

    /// Report every held region as exited, e.g. when the finger lifts
    pub fn release(&mut self, mut on_change: impl FnMut(&A, bool)) {
        for region in &mut self.regions {
            if region.state {
                on_change(&region.action, false);
                region.state = false;
            }
        }
    }

    pub fn states(&self) -> Vec<bool> {
        self.regions.iter().map(|r| r.state).collect()
    }

    pub fn regions(&self) -> &[Region<A>] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl<A> FromIterator<Region<A>> for RegionMap<A> {
    fn from_iter<I: IntoIterator<Item = Region<A>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
