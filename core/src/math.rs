//! Easing and progress helpers shared by the state machine and renderer

/// Overshoot constant of the back easing curve
const BACK_C1: f32 = 1.70158;
const BACK_C3: f32 = BACK_C1 + 1.0;

/// Cubic ease-out with overshoot.
///
/// Rises past 1.0 shortly before the end and settles back to exactly 1.0,
/// anchored at `f(0) = 0` and `f(1) = 1`.
#[inline]
pub fn ease_out_back(t: f32) -> f32 {
    let t1 = t - 1.0;
    1.0 + BACK_C3 * t1 * t1 * t1 + BACK_C1 * t1 * t1
}

/// Normalized progress of `frame` out of `total`, clamped to [0, 1]
#[inline]
pub fn progress(frame: u32, total: u32) -> f32 {
    if total == 0 {
        return 1.0;
    }
    (frame as f32 / total as f32).clamp(0.0, 1.0)
}

/// Convert a 0..1 opacity factor to an 8-bit alpha
#[inline]
pub fn alpha_from_factor(factor: f32) -> u8 {
    (255.0 * factor).round().clamp(0.0, 255.0) as u8
}
