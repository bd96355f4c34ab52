//! Easing curves and interpolation used by the indicator animations.

use std::f32::consts::PI;

/// Easing curve applied to a phase's linear time fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    /// Fast start, slow finish.
    Decelerate,
    /// Slow start and finish with a fast middle (ease-in-out).
    AccelerateDecelerate,
}

impl Curve {
    /// Maps linear progress in [0.0, 1.0] to eased progress in [0.0, 1.0].
    ///
    /// Input outside the range is clamped, so a frame that overshoots a
    /// duration never bends the curve backwards.
    pub fn ease(self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            Curve::Decelerate => 1.0 - (1.0 - t) * (1.0 - t),
            Curve::AccelerateDecelerate => (((t + 1.0) * PI).cos() / 2.0) + 0.5,
        }
    }
}

/// Linear time fraction of `elapsed_ms` within `duration_ms`.
///
/// Not clamped: callers use values `>= 1.0` to detect phase completion.
#[inline]
pub(crate) fn fraction(elapsed_ms: f32, duration_ms: f32) -> f32 {
    debug_assert!(duration_ms > 0.0);
    elapsed_ms / duration_ms
}

/// Interpolates between `from` and `to` along `curve`.
#[inline]
pub(crate) fn lerp_eased(from: f32, to: f32, fraction: f32, curve: Curve) -> f32 {
    from + (to - from) * curve.ease(fraction)
}
