//! Vector and quaternion helpers
//!
//! Quaternions are stored `[w, x, y, z]`. Angles are radians unless a
//! function name says `_deg`.

use std::f64::consts::{PI, TAU};

pub type Vec2 = [f64; 2];
pub type Vec3 = [f64; 3];
pub type Quat = [f64; 4];

/// Euclidean length of any vector
pub fn length(v: &[f64]) -> f64 {
    v.iter().map(|c| c * c).sum::<f64>().sqrt()
}

/// Angle of a 2D vector, 0 along +x, increasing toward +y
///
/// Range is `(-π/2, 3π/2)`; callers that compare angles go through
/// [`shortest_angle_diff`], so the branch cut does not matter. The zero vector
/// maps to 0.
pub fn angle(v: Vec2) -> f64 {
    let [x, y] = v;
    if x != 0.0 {
        (y / x).atan() + PI * (1.0 - x.signum()) / 2.0
    } else if y != 0.0 {
        PI / 2.0 * y.signum()
    } else {
        0.0
    }
}

/// [`angle`] in degrees
pub fn angle_deg(v: Vec2) -> f64 {
    angle(v).to_degrees()
}

/// Signed difference `a1 - a2` folded into `[-period/2, period/2]`
pub fn wrap_diff(a1: f64, a2: f64, period: f64) -> f64 {
    let mut d = a1 - a2;
    if !d.is_finite() {
        return d;
    }
    d -= period * (d / period).round();
    // `round` leaves exactly +-period/2 alone, keep the original sign there
    if d.abs() == period / 2.0 && (a1 - a2).signum() != d.signum() {
        d = -d;
    }
    d
}

/// Shortest signed angle from `a2` to `a1`, radians
pub fn shortest_angle_diff(a1: f64, a2: f64) -> f64 {
    wrap_diff(a1, a2, TAU)
}

/// Shortest signed angle from `a2` to `a1`, degrees
pub fn shortest_angle_diff_deg(a1: f64, a2: f64) -> f64 {
    wrap_diff(a1, a2, 360.0)
}

/// Scale to unit length. A zero quaternion yields NaN components.
pub fn normalize(q: Quat) -> Quat {
    let l = length(&q);
    [q[0] / l, q[1] / l, q[2] / l, q[3] / l]
}

pub fn conjugate(q: Quat) -> Quat {
    [q[0], -q[1], -q[2], -q[3]]
}

/// Hamilton product `q1 * q2`
pub fn multiply(q1: Quat, q2: Quat) -> Quat {
    let [w1, x1, y1, z1] = q1;
    let [w2, x2, y2, z2] = q2;
    [
        w1 * w2 - x1 * x2 - y1 * y2 - z1 * z2,
        w1 * x2 + x1 * w2 + y1 * z2 - z1 * y2,
        w1 * y2 - x1 * z2 + y1 * w2 + z1 * x2,
        w1 * z2 + x1 * y2 - y1 * x2 + z1 * w2,
    ]
}

/// Rotate `v` by the unit quaternion `q` (`q * v * q⁻¹`)
pub fn rotate(q: Quat, v: Vec3) -> Vec3 {
    let [w, x, y, z] = q;
    let [vx, vy, vz] = v;
    [
        vx * (w * w + x * x - y * y - z * z)
            + 2.0 * vy * (x * y - w * z)
            + 2.0 * vz * (w * y + x * z),
        vy * (w * w - x * x + y * y - z * z)
            + 2.0 * vz * (y * z - w * x)
            + 2.0 * vx * (w * z + x * y),
        vz * (w * w - x * x - y * y + z * z)
            + 2.0 * vx * (x * z - w * y)
            + 2.0 * vy * (w * x + y * z),
    ]
}
