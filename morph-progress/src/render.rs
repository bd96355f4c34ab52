//! Draw commands derived from the animation model.
//!
//! ## Usage
//!
//! Implement [`Surface`] on top of the host's canvas and hand it to
//! [`ProgressAnimator::render`](crate::ProgressAnimator::render), or inspect
//! [`RenderGeometry`] directly.

use glam::Vec2;

use crate::{
    animator::IndeterminateCircle,
    color::Color,
    config::ProgressIndicatorArgs,
    geometry::{ArcBounds, ViewMetrics},
};

/// Angle of the 12 o'clock position, where every lap starts.
pub const ARC_OFFSET_DEGREES: f32 = -90.0;
/// Smallest solid sweep drawn while progress is shown.
pub const MIN_VISIBLE_SWEEP_DEGREES: f32 = 0.1;

const DEGREES_PER_LAP: f32 = 360.0;

/// Receives the primitives of one frame.
///
/// Arcs are stroked with [`ArcCommand::cap`]; the circle is filled.
pub trait Surface {
    /// Draws a filled circle.
    fn draw_circle(&mut self, circle: &CircleCommand);

    /// Strokes an arc.
    fn draw_arc(&mut self, arc: &ArcCommand);
}

/// A filled circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleCommand {
    /// Circle center in view coordinates.
    pub center: Vec2,
    /// Circle radius, always positive.
    pub radius: f32,
    /// Fill color.
    pub color: Color,
}

/// Stroke cap used for arc ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArcCap {
    /// Rounded stroke ends.
    #[default]
    Round,
    /// Flat stroke ends.
    Butt,
}

/// Which part of the ring an arc draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcLayer {
    /// The dim arc ahead of the progress.
    Pending,
    /// Solid progress during the first lap.
    FirstPhase,
    /// Solid progress past the first lap.
    SecondPhase,
}

/// A stroked arc inscribed in [`ArcBounds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcCommand {
    /// Part of the ring this arc draws.
    pub layer: ArcLayer,
    /// Rectangle the arc is inscribed in.
    pub bounds: ArcBounds,
    /// Start angle in degrees, where 0° is at 3 o'clock.
    pub start_angle_degrees: f32,
    /// Sweep angle in degrees, in the clockwise direction.
    pub sweep_angle_degrees: f32,
    /// Stroke width in pixels.
    pub stroke_width: f32,
    /// Stroke cap applied to arc ends.
    pub cap: ArcCap,
    /// Stroke color.
    pub color: Color,
}

/// Everything drawn in one frame, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderGeometry {
    /// The indeterminate circle, absent while hidden.
    pub dot: Option<CircleCommand>,
    /// The pending arc.
    pub pending: Option<ArcCommand>,
    /// The first-lap solid arc.
    pub first_phase: Option<ArcCommand>,
    /// The second-lap solid arc.
    pub second_phase: Option<ArcCommand>,
}

impl RenderGeometry {
    /// Arcs present this frame, in draw order.
    pub fn arcs(&self) -> impl Iterator<Item = &ArcCommand> {
        [&self.pending, &self.first_phase, &self.second_phase]
            .into_iter()
            .flatten()
    }

    /// Issues the frame's draw calls.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        if let Some(dot) = &self.dot {
            surface.draw_circle(dot);
        }
        for arc in self.arcs() {
            surface.draw_arc(arc);
        }
    }
}

pub(crate) struct RenderInput<'a> {
    pub(crate) args: &'a ProgressIndicatorArgs,
    pub(crate) metrics: &'a ViewMetrics,
    pub(crate) circle: &'a IndeterminateCircle,
    pub(crate) arc_angle: f32,
    pub(crate) pending_sweep: f32,
    pub(crate) enforce_min_sweep: bool,
}

/// Splits an arc angle in laps into `(first_phase, second_phase)` sweeps.
///
/// Past one lap the first phase shrinks while the second grows, so together
/// they always cover at most one ring.
pub fn split_laps(angle: f32) -> (f32, f32) {
    if angle >= 1.0 {
        (2.0 - angle, angle - 1.0)
    } else {
        (angle, 0.0)
    }
}

pub(crate) fn derive(input: &RenderInput<'_>) -> RenderGeometry {
    let RenderInput {
        args,
        metrics,
        circle,
        arc_angle,
        pending_sweep,
        enforce_min_sweep,
    } = *input;

    let dot = (circle.radius > 0.0).then(|| CircleCommand {
        center: Vec2::new(metrics.center.x, circle.center_y),
        radius: circle.radius,
        color: args.indeterminate_color,
    });

    let (first_phase, second_phase) = split_laps(arc_angle);
    let arc = |layer, start_angle_degrees, sweep_angle_degrees: f32, color| {
        (sweep_angle_degrees > 0.0).then_some(ArcCommand {
            layer,
            bounds: metrics.arc_bounds,
            start_angle_degrees,
            sweep_angle_degrees,
            stroke_width: args.stroke_width,
            cap: args.stroke_cap,
            color,
        })
    };
    let solid_sweep = |laps: f32| {
        let sweep = laps * DEGREES_PER_LAP;
        if enforce_min_sweep && sweep < MIN_VISIBLE_SWEEP_DEGREES {
            MIN_VISIBLE_SWEEP_DEGREES
        } else {
            sweep
        }
    };

    let pending = if first_phase < 1.0 {
        arc(
            ArcLayer::Pending,
            ARC_OFFSET_DEGREES + first_phase * DEGREES_PER_LAP,
            pending_sweep,
            args.pending_color,
        )
    } else {
        None
    };
    let first = if first_phase >= 0.0 && second_phase < 1.0 {
        arc(
            ArcLayer::FirstPhase,
            ARC_OFFSET_DEGREES + second_phase * DEGREES_PER_LAP,
            solid_sweep(first_phase),
            args.first_phase_color,
        )
    } else {
        None
    };
    let second = if second_phase > 0.0 {
        arc(
            ArcLayer::SecondPhase,
            ARC_OFFSET_DEGREES,
            solid_sweep(second_phase),
            args.second_phase_color,
        )
    } else {
        None
    };

    RenderGeometry {
        dot,
        pending,
        first_phase: first,
        second_phase: second,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn input_for<'a>(
        args: &'a ProgressIndicatorArgs,
        metrics: &'a ViewMetrics,
        circle: &'a IndeterminateCircle,
        arc_angle: f32,
        enforce_min_sweep: bool,
    ) -> RenderInput<'a> {
        RenderInput {
            args,
            metrics,
            circle,
            arc_angle,
            pending_sweep: 360.0,
            enforce_min_sweep,
        }
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl Surface for Recorder {
        fn draw_circle(&mut self, _circle: &CircleCommand) {
            self.calls.push("circle");
        }

        fn draw_arc(&mut self, arc: &ArcCommand) {
            self.calls.push(match arc.layer {
                ArcLayer::Pending => "pending",
                ArcLayer::FirstPhase => "first",
                ArcLayer::SecondPhase => "second",
            });
        }
    }

    #[test]
    fn test_split_laps() {
        assert_eq!(split_laps(0.25), (0.25, 0.0));
        assert_eq!(split_laps(1.0), (1.0, 0.0));
        let (first, second) = split_laps(1.4);
        assert!((first - 0.6).abs() < EPS);
        assert!((second - 0.4).abs() < EPS);
        assert_eq!(split_laps(2.0), (0.0, 1.0));
    }

    #[test]
    fn test_second_lap_arcs_share_the_ring() {
        let args = ProgressIndicatorArgs::default();
        let metrics = ViewMetrics::new(200.0, 200.0, args.stroke_width);
        let circle = IndeterminateCircle {
            radius: -1.0,
            ..IndeterminateCircle::default()
        };
        let geometry = derive(&input_for(&args, &metrics, &circle, 1.4, true));

        assert!(geometry.dot.is_none());
        let second = geometry.second_phase.expect("second lap arc");
        assert_eq!(second.start_angle_degrees, ARC_OFFSET_DEGREES);
        assert!((second.sweep_angle_degrees - 144.0).abs() < EPS);
        assert_eq!(second.color, args.second_phase_color);

        let first = geometry.first_phase.expect("first lap arc");
        assert!((first.start_angle_degrees - (ARC_OFFSET_DEGREES + 144.0)).abs() < EPS);
        assert!((first.sweep_angle_degrees - 216.0).abs() < EPS);

        let pending = geometry.pending.expect("pending arc");
        assert!((pending.start_angle_degrees - (ARC_OFFSET_DEGREES + 216.0)).abs() < EPS);
        assert_eq!(pending.sweep_angle_degrees, 360.0);
        assert_eq!(pending.bounds, metrics.arc_bounds);
        assert_eq!(pending.stroke_width, 16.0);
        assert!(geometry.arcs().all(|arc| arc.cap == ArcCap::Round));
    }

    #[test]
    fn test_arcs_use_configured_cap() {
        let args = ProgressIndicatorArgs::default().stroke_cap(ArcCap::Butt);
        let metrics = ViewMetrics::new(100.0, 100.0, args.stroke_width);
        let circle = IndeterminateCircle::default();
        let geometry = derive(&input_for(&args, &metrics, &circle, 1.5, true));

        assert_eq!(geometry.arcs().count(), 3);
        assert!(geometry.arcs().all(|arc| arc.cap == ArcCap::Butt));
    }

    #[test]
    fn test_full_first_lap_hides_pending_arc() {
        let args = ProgressIndicatorArgs::default();
        let metrics = ViewMetrics::new(100.0, 100.0, args.stroke_width);
        let circle = IndeterminateCircle::default();
        let geometry = derive(&input_for(&args, &metrics, &circle, 1.0, true));

        assert!(geometry.pending.is_none());
        assert!(geometry.second_phase.is_none());
        let first = geometry.first_phase.expect("first lap arc");
        assert_eq!(first.sweep_angle_degrees, 360.0);
    }

    #[test]
    fn test_min_sweep_only_while_showing_progress() {
        let args = ProgressIndicatorArgs::default();
        let metrics = ViewMetrics::new(100.0, 100.0, args.stroke_width);
        let circle = IndeterminateCircle::default();

        let showing = derive(&input_for(&args, &metrics, &circle, 0.0, true));
        let first = showing.first_phase.expect("minimum sweep arc");
        assert_eq!(first.sweep_angle_degrees, MIN_VISIBLE_SWEEP_DEGREES);

        let hidden = derive(&input_for(&args, &metrics, &circle, 0.0, false));
        assert!(hidden.first_phase.is_none());
    }

    #[test]
    fn test_dot_only_drawn_with_positive_radius() {
        let args = ProgressIndicatorArgs::default();
        let metrics = ViewMetrics::new(100.0, 100.0, args.stroke_width);
        let circle = IndeterminateCircle {
            radius: 40.0,
            center_y: 30.0,
            ..IndeterminateCircle::default()
        };
        let geometry = derive(&input_for(&args, &metrics, &circle, 0.0, false));
        let dot = geometry.dot.expect("dot");
        assert_eq!(dot.center, Vec2::new(50.0, 30.0));
        assert_eq!(dot.radius, 40.0);
        assert_eq!(dot.color, args.indeterminate_color);

        let zero = IndeterminateCircle::default();
        assert!(
            derive(&input_for(&args, &metrics, &zero, 0.0, false))
                .dot
                .is_none()
        );
    }

    #[test]
    fn test_draw_order() {
        let args = ProgressIndicatorArgs::default();
        let metrics = ViewMetrics::new(100.0, 100.0, args.stroke_width);
        let circle = IndeterminateCircle {
            radius: 4.0,
            ..IndeterminateCircle::default()
        };
        let mut recorder = Recorder::default();
        derive(&input_for(&args, &metrics, &circle, 1.5, true)).draw(&mut recorder);
        assert_eq!(recorder.calls, ["circle", "pending", "first", "second"]);
    }
}
