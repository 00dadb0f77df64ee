//! Angle and easing helpers shared by strategies and locomotion

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Vectors shorter than this are treated as zero before normalizing
pub const MIN_DISTANCE: f32 = 1e-4;

/// Wrap an angle into `(-PI, PI]`
pub fn normalize_angle(angle: f32) -> f32 {
    let mut wrapped = angle % TAU;
    if wrapped <= -PI {
        wrapped += TAU;
    } else if wrapped > PI {
        wrapped -= TAU;
    }
    wrapped
}

/// Signed shortest rotation from `from` to `to`
pub fn angle_difference(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Rotate `current` toward `target` by at most `max_step` radians.
///
/// Always takes the shorter way round and never overshoots.
pub fn rotate_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = angle_difference(current, target);
    let step = max_step.max(0.0);
    if delta.abs() <= step {
        normalize_angle(target)
    } else {
        normalize_angle(current + step.copysign(delta))
    }
}

/// Move `current` toward `target` by at most `max_delta`
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(delta)
    }
}

/// Frame-rate independent exponential easing factor for a rate in 1/s
pub fn ease_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate.max(0.0) * dt.max(0.0)).exp()
}

/// Exponentially ease a scalar toward a target
pub fn ease(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * ease_factor(rate, dt)
}

/// Exponentially ease a vector toward a target
pub fn ease_vec(current: Vec2, target: Vec2, rate: f32, dt: f32) -> Vec2 {
    current + (target - current) * ease_factor(rate, dt)
}

/// Unit vector for a heading
pub fn forward(angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(cos, sin)
}

/// Heading of a vector (`atan2`, defined for zero as well)
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Vector rotated 90 degrees counter-clockwise
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Normalize, or `None` for (near) zero-length input
pub fn try_normalize(v: Vec2) -> Option<Vec2> {
    let length = v.length();
    if length > MIN_DISTANCE {
        Some(v / length)
    } else {
        None
    }
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse linear interpolation, clamped to `[0, 1]`
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        return 1.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}
