//! Software denormal suppression.
//!
//! A filter ringing down toward silence leaves subnormal values in its state
//! words, and arithmetic on those is dramatically slower on most CPUs. State is
//! flushed to zero once the magnitude drops below [`DENORMAL_THRESHOLD`], well
//! above the subnormal range and far below audibility.

pub const DENORMAL_THRESHOLD: f32 = 1.0e-24;

/// Zero values that are tiny or non-finite; pass everything else through.
#[inline]
pub fn flush(value: f32) -> f32 {
    if !value.is_finite() || value.abs() < DENORMAL_THRESHOLD {
        0.0
    } else {
        value
    }
}
