//! Vector helpers on top of `glam::Vec3`.
//!
//! Steering math is single precision throughout, matching the agent records.

pub use glam::Vec3;

/// Distances at or below this are treated as zero: an agent this close to
/// its seek target has arrived, and a neighbor this close is skipped by
/// separation instead of producing a near-infinite push.
pub const EPSILON: f32 = 0.1;

/// Scale `v` down so its length does not exceed `max`.
///
/// Vectors already shorter than `max` are returned unchanged.  A
/// non-positive `max` yields the zero vector.
#[inline]
pub fn clamp_length_to(v: Vec3, max: f32) -> Vec3 {
    if max <= 0.0 {
        return Vec3::ZERO;
    }
    let len_sq = v.length_squared();
    if len_sq <= max * max {
        return v;
    }
    v * (max / len_sq.sqrt())
}

