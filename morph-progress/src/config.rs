//! Construction-time configuration.
//!
//! ## Usage
//!
//! ```
//! use morph_progress::{Color, ProgressIndicatorArgs};
//!
//! let args = ProgressIndicatorArgs::default()
//!     .stroke_width(8.0)
//!     .first_phase_color(Color::from_argb(0xFF3366FF));
//! assert_eq!(args.stroke_width, 8.0);
//! ```

use derive_setters::Setters;

use crate::{color::Color, render::ArcCap};

/// Default values for [`ProgressIndicatorArgs`].
pub struct ProgressIndicatorDefaults;

impl ProgressIndicatorDefaults {
    /// Fill of the indeterminate pulse.
    pub const INDETERMINATE_COLOR: u32 = 0xFF00FF00;
    /// Dim arc ahead of the solid progress.
    pub const PENDING_COLOR: u32 = 0x6000FF00;
    /// Solid arc during the first lap.
    pub const FIRST_PHASE_COLOR: u32 = 0xFF0000FF;
    /// Solid arc during the second lap.
    pub const SECOND_PHASE_COLOR: u32 = 0xFFFF0000;
    /// Progress value before any call to `set_progress`.
    pub const PROGRESS: f32 = 0.0;
    /// Arc stroke width in pixels.
    pub const STROKE_WIDTH: f32 = 16.0;
    /// Cap of every arc end.
    pub const STROKE_CAP: ArcCap = ArcCap::Round;
}

/// Arguments for building a [`ProgressAnimator`](crate::ProgressAnimator).
#[derive(PartialEq, Clone, Copy, Debug, Setters)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressIndicatorArgs {
    /// Fill color of the indeterminate pulse.
    #[setters(into)]
    pub indeterminate_color: Color,
    /// Color of the pending arc.
    #[setters(into)]
    pub pending_color: Color,
    /// Color of the solid arc while progress is below one lap.
    #[setters(into)]
    pub first_phase_color: Color,
    /// Color of the solid arc for progress past one lap.
    #[setters(into)]
    pub second_phase_color: Color,
    /// Initial progress value, clamped like `set_progress`.
    pub progress: f32,
    /// Arc stroke width in pixels.
    pub stroke_width: f32,
    /// Cap of every arc end.
    pub stroke_cap: ArcCap,
}

impl Default for ProgressIndicatorArgs {
    fn default() -> Self {
        Self {
            indeterminate_color: Color::from_argb(ProgressIndicatorDefaults::INDETERMINATE_COLOR),
            pending_color: Color::from_argb(ProgressIndicatorDefaults::PENDING_COLOR),
            first_phase_color: Color::from_argb(ProgressIndicatorDefaults::FIRST_PHASE_COLOR),
            second_phase_color: Color::from_argb(ProgressIndicatorDefaults::SECOND_PHASE_COLOR),
            progress: ProgressIndicatorDefaults::PROGRESS,
            stroke_width: ProgressIndicatorDefaults::STROKE_WIDTH,
            stroke_cap: ProgressIndicatorDefaults::STROKE_CAP,
        }
    }
}

impl ProgressIndicatorArgs {
    /// Stroke width with negative and non-finite values replaced by zero.
    pub(crate) fn sanitized_stroke_width(&self) -> f32 {
        if self.stroke_width.is_finite() {
            self.stroke_width.max(0.0)
        } else {
            0.0
        }
    }
}
