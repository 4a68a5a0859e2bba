//! Small helpers layered over [`glam::Vec2`].
//!
//! `Vec2` is a `Copy` value type, so every helper returns a fresh vector and
//! callers never observe aliasing between inputs and outputs.

use glam::Vec2;
use rand::Rng;

/// Vectors shorter than this are treated as zero when used as directions.
pub const DIRECTION_EPSILON: f32 = 0.001;

/// Builds a vector pointing along `angle` (radians) with the given length.
#[must_use]
pub fn from_angle(angle: f32, magnitude: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * magnitude
}

/// Angle of the vector in radians, measured from the positive x axis.
#[must_use]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Rotates the vector by `angle` radians.
#[must_use]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Z component of the 3D cross product of two planar vectors.
///
/// Positive when `b` lies counter-clockwise from `a` in a y-up frame.
#[must_use]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Unit vector for use as a direction, collapsing near-zero input to zero.
#[must_use]
pub fn direction(v: Vec2) -> Vec2 {
    if v.length() <= DIRECTION_EPSILON {
        Vec2::ZERO
    } else {
        v.normalize_or_zero()
    }
}

/// Uniformly distributed unit vector.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    from_angle(rng.gen::<f32>() * std::f32::consts::TAU, 1.0)
}
