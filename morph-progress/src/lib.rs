//! A circular progress indicator that morphs between an indeterminate pulse
//! and a determinate progress arc.
//!
//! The crate holds the animation model only. The host supplies three things:
//!
//! - a [`FrameClock`] that tells the time and schedules redraws,
//! - a [`Surface`] that can fill circles and stroke arcs,
//! - size changes, forwarded through [`FrameDriver::on_size_changed`].
//!
//! # Example
//!
//! ```
//! use morph_progress::{
//!     ArcCommand, CircleCommand, FrameDriver, ProgressAnimator, ProgressIndicatorArgs,
//!     Surface, SystemClock,
//! };
//!
//! struct Canvas;
//!
//! impl Surface for Canvas {
//!     fn draw_circle(&mut self, circle: &CircleCommand) {
//!         // fill `circle.radius` around `circle.center`
//!     }
//!
//!     fn draw_arc(&mut self, arc: &ArcCommand) {
//!         // stroke `arc.sweep_angle_degrees` from `arc.start_angle_degrees`
//!     }
//! }
//!
//! let animator = ProgressAnimator::new(ProgressIndicatorArgs::default());
//! let mut driver = FrameDriver::new(animator, SystemClock::new(|| { /* request redraw */ }));
//! driver.on_size_changed(48.0, 48.0);
//! driver.set_progress(0.4);
//! driver.tick(&mut Canvas);
//! ```
//!
//! # Progress values
//!
//! Progress runs from `0.0` to `2.0`. The first lap fills the ring with the
//! first-phase color; the second lap paints over it with the second-phase
//! color.
#![deny(missing_docs, clippy::unwrap_used)]

mod animation;

pub mod animator;
pub mod color;
pub mod config;
pub mod frame;
pub mod geometry;
pub mod listener;
pub mod render;
pub mod saved_state;
pub mod state;

pub use crate::{
    animator::{
        IndeterminateCircle, MAX_PROGRESS, MIN_PROGRESS, PendingArc, ProgressAnimator,
        ProgressArc,
    },
    color::Color,
    config::{ProgressIndicatorArgs, ProgressIndicatorDefaults},
    frame::{FrameClock, FrameDriver, SystemClock},
    geometry::{ArcBounds, ViewMetrics},
    listener::AnimationListener,
    render::{ArcCap, ArcCommand, ArcLayer, CircleCommand, RenderGeometry, Surface},
    saved_state::{RestoreError, SavedState},
    state::{AnimationStateKind, Phase, Transition, TransitionDirection},
};
