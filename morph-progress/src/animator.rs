//! The progress animation state machine.
//!
//! [`ProgressAnimator`] owns every animated quantity of the indicator and
//! advances them from [`ProgressAnimator::update`]. It never draws anything
//! itself: [`ProgressAnimator::compute_render_geometry`] turns the current
//! model into draw commands for a [`Surface`].
//!
//! ## States
//!
//! - `Indeterminate`: the circle pulses between 80% and 100% of the view
//!   radius.
//! - `TransitioningToProgress`: the circle shrinks to a dot, slides up to the
//!   top of the ring, then the pending arc sweeps open while the solid arc
//!   starts growing.
//! - `AnimatingProgress` / `Progress`: the solid arc eases towards the target,
//!   then rests.
//! - `TransitioningToIndeterminate`: the arcs close, the dot slides back to
//!   the center and grows into the pulse again.
//!
//! Transitions are not preemptible. A request that arrives while one is in
//! flight is remembered and applied as soon as it completes.

use tracing::{debug, trace, warn};

use crate::{
    animation::{Curve, fraction, lerp_eased},
    config::ProgressIndicatorArgs,
    geometry::ViewMetrics,
    listener::AnimationListener,
    render::{self, RenderGeometry, RenderInput, Surface},
    saved_state::SavedState,
    state::{
        AnimationState, AnimationStateKind, Phase, StateRequest, Transition,
        TransitionDirection,
    },
};

/// Lowest accepted progress value.
pub const MIN_PROGRESS: f32 = 0.0;
/// Highest accepted progress value: two full laps.
pub const MAX_PROGRESS: f32 = 2.0;

const INDETERMINATE_CYCLE_MS: f32 = 500.0;
const PROGRESS_LEG_MS: f32 = 1500.0;
/// Shrinking the pulse into a dot and growing it back.
const COLLAPSE_MS: f32 = 500.0;
/// Sliding the dot and opening or closing the pending arc.
const TRAVEL_MS: f32 = 500.0;

const NEAR_ZERO: f32 = 0.0001;

const ARC_INITIAL_DEGREES: f32 = 0.0;
const ARC_TARGET_DEGREES: f32 = 360.0;

/// Radius marking the indeterminate circle as hidden.
const INACTIVE_RADIUS: f32 = -1.0;

/// The pulsing circle, which also serves as the head dot during transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndeterminateCircle {
    /// Current radius. Negative while the circle is hidden.
    pub radius: f32,
    /// Radius at the start of the running phase.
    pub initial_radius: f32,
    /// Current vertical center.
    pub center_y: f32,
    /// Vertical center at the start of the running phase.
    pub initial_center_y: f32,
    /// `1` while the pulse grows, `-1` while it shrinks.
    pub direction: i8,
}

impl Default for IndeterminateCircle {
    fn default() -> Self {
        Self {
            radius: 0.0,
            initial_radius: 0.0,
            center_y: 0.0,
            initial_center_y: 0.0,
            direction: 1,
        }
    }
}

/// The solid progress arc, measured in laps (`0.0..=2.0`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressArc {
    /// Currently displayed angle.
    pub angle: f32,
    /// Angle at the start of the current leg.
    pub initial_angle: f32,
    /// Last requested progress value.
    pub target: f32,
}

/// The dim arc covering the part of the ring not yet reached.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PendingArc {
    /// Current sweep in degrees.
    pub sweep: f32,
    /// Sweep at the start of the running phase.
    pub initial_sweep: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct Timers {
    /// Time spent in the current state or phase.
    state_elapsed_ms: f32,
    /// Time spent in the current progress leg.
    progress_elapsed_ms: f32,
}

enum PhaseStep {
    Running,
    Advance(Phase),
    Finished,
}

/// Animation model of a circular indicator that morphs between an
/// indeterminate pulse and a determinate progress arc.
///
/// # Example
///
/// ```
/// use morph_progress::{AnimationStateKind, ProgressAnimator, ProgressIndicatorArgs};
///
/// let mut animator = ProgressAnimator::new(ProgressIndicatorArgs::default());
/// animator.on_size_changed(200.0, 200.0);
/// animator.set_progress(0.5);
/// assert_eq!(animator.state(), AnimationStateKind::TransitioningToProgress);
///
/// // Enough frames for the whole morph and the progress leg.
/// for _ in 0..200 {
///     animator.update(16.0);
/// }
/// assert_eq!(animator.state(), AnimationStateKind::Progress);
/// assert!(!animator.is_animating());
/// ```
pub struct ProgressAnimator {
    args: ProgressIndicatorArgs,
    metrics: ViewMetrics,
    state: AnimationState,
    circle: IndeterminateCircle,
    arc: ProgressArc,
    pending: PendingArc,
    timers: Timers,
    /// Linear fraction of the most recent interpolation; `>= 1.0` means the
    /// running phase cycle has completed.
    phase_fraction: f32,
    /// Arc angle when the arcs started closing.
    recede_from_angle: f32,
    deferred: Option<StateRequest>,
    listener: Option<Box<dyn AnimationListener>>,
}

impl ProgressAnimator {
    /// Creates an animator in the indeterminate state.
    ///
    /// [`on_size_changed`](Self::on_size_changed) must be called before the
    /// first [`update`](Self::update).
    pub fn new(args: ProgressIndicatorArgs) -> Self {
        let args = ProgressIndicatorArgs {
            stroke_width: args.sanitized_stroke_width(),
            ..args
        };
        let target = clamp_progress(args.progress);

        Self {
            args,
            metrics: ViewMetrics::default(),
            state: AnimationState::Indeterminate,
            circle: IndeterminateCircle::default(),
            arc: ProgressArc {
                target,
                ..ProgressArc::default()
            },
            pending: PendingArc::default(),
            timers: Timers::default(),
            phase_fraction: 0.0,
            recede_from_angle: 0.0,
            deferred: None,
            listener: None,
        }
    }

    /// Installs the listener notified when animations end.
    pub fn set_listener(&mut self, listener: impl AnimationListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Removes the listener, if any.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Configuration the animator was built with.
    pub fn args(&self) -> &ProgressIndicatorArgs {
        &self.args
    }

    /// Current state.
    pub fn state(&self) -> AnimationStateKind {
        self.state.kind()
    }

    /// The in-flight transition, if any.
    pub fn transition(&self) -> Option<Transition> {
        match self.state {
            AnimationState::Transitioning(transition) => Some(transition),
            _ => None,
        }
    }

    /// Size-derived geometry from the last [`on_size_changed`](Self::on_size_changed).
    pub fn metrics(&self) -> &ViewMetrics {
        &self.metrics
    }

    /// Current indeterminate circle model.
    pub fn indeterminate_circle(&self) -> &IndeterminateCircle {
        &self.circle
    }

    /// Current progress arc model.
    pub fn progress_arc(&self) -> &ProgressArc {
        &self.arc
    }

    /// Current pending arc model.
    pub fn pending_arc(&self) -> &PendingArc {
        &self.pending
    }

    /// Last requested progress, which may not be reached yet.
    pub fn progress(&self) -> f32 {
        self.arc.target
    }

    /// Whether frames are still needed, i.e. the state is anything but
    /// [`AnimationStateKind::Progress`].
    pub fn is_animating(&self) -> bool {
        self.state != AnimationState::Progress
    }

    /// Animates the arc towards `progress`, clamped to
    /// [`MIN_PROGRESS`]..=[`MAX_PROGRESS`].
    ///
    /// From the indeterminate state this starts the morph into the arc.
    pub fn set_progress(&mut self, progress: f32) {
        self.set_state(StateRequest::AnimatingProgress);
        self.arc.initial_angle = if self.arc.angle > NEAR_ZERO {
            self.arc.angle
        } else {
            ARC_INITIAL_DEGREES
        };
        self.arc.target = clamp_progress(progress);
        self.timers.progress_elapsed_ms = 0.0;
    }

    /// Returns to the indeterminate pulse.
    pub fn set_indeterminate(&mut self) {
        self.set_state(StateRequest::Indeterminate);
    }

    /// Recomputes every size-derived quantity.
    pub fn on_size_changed(&mut self, width: f32, height: f32) {
        self.metrics = ViewMetrics::new(width, height, self.args.stroke_width);
        self.circle.center_y = self.metrics.center.y;
        debug!(width, height, radius = self.metrics.radius, "indicator resized");
    }

    /// Advances every running animation by `elapsed_ms`.
    ///
    /// Negative and non-finite values count as no time passing.
    pub fn update(&mut self, elapsed_ms: f32) {
        let elapsed_ms = if elapsed_ms.is_finite() {
            elapsed_ms.max(0.0)
        } else {
            0.0
        };
        self.timers.state_elapsed_ms += elapsed_ms;

        match self.state {
            AnimationState::Indeterminate => self.update_indeterminate(),
            AnimationState::Transitioning(_) => self.update_transition(elapsed_ms),
            AnimationState::AnimatingProgress => self.update_progress(elapsed_ms),
            AnimationState::Progress => {}
        }
    }

    /// Draw commands for the current frame.
    pub fn compute_render_geometry(&self) -> RenderGeometry {
        render::derive(&RenderInput {
            args: &self.args,
            metrics: &self.metrics,
            circle: &self.circle,
            arc_angle: self.arc.angle,
            pending_sweep: self.pending.sweep,
            enforce_min_sweep: matches!(
                self.state,
                AnimationState::AnimatingProgress | AnimationState::Progress
            ),
        })
    }

    /// Draws the current frame onto `surface`.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        self.compute_render_geometry().draw(surface);
    }

    /// Captures the persistable part of the state.
    pub fn save(&self) -> SavedState {
        SavedState::new(self.arc.target, self.state.kind())
    }

    /// Restores from a saved state.
    ///
    /// Transitions are not persisted, so the animator lands in the state they
    /// were heading to: `Progress` with the arc already at the saved value, or
    /// `Indeterminate`. Invalid input leaves the animator untouched; the
    /// return value tells whether anything was applied.
    pub fn restore(&mut self, saved: SavedState) -> bool {
        let kind = match saved.validate() {
            Ok(kind) => kind,
            Err(err) => {
                warn!(%err, "ignoring saved indicator state");
                return false;
            }
        };
        let target = clamp_progress(saved.progress);

        self.timers = Timers::default();
        self.phase_fraction = 0.0;
        self.deferred = None;

        if kind.is_progress_like() {
            self.state = AnimationState::Progress;
            self.arc = ProgressArc {
                angle: target,
                initial_angle: target,
                target,
            };
            self.pending = PendingArc {
                sweep: ARC_TARGET_DEGREES,
                initial_sweep: ARC_TARGET_DEGREES,
            };
            self.circle = IndeterminateCircle {
                radius: INACTIVE_RADIUS,
                center_y: self.metrics.arc_bounds.top,
                ..IndeterminateCircle::default()
            };
        } else {
            self.state = AnimationState::Indeterminate;
            self.arc = ProgressArc {
                target,
                ..ProgressArc::default()
            };
            self.pending = PendingArc::default();
            self.circle = IndeterminateCircle {
                center_y: self.metrics.center.y,
                ..IndeterminateCircle::default()
            };
        }

        debug!(saved = ?kind, restored = ?self.state.kind(), progress = target, "indicator state restored");
        true
    }

    /// Restores from bytes produced by [`SavedState::to_bytes`], ignoring
    /// anything malformed.
    pub fn restore_bytes(&mut self, bytes: &[u8]) -> bool {
        match SavedState::from_bytes(bytes) {
            Ok(saved) => self.restore(saved),
            Err(err) => {
                warn!(%err, "ignoring saved indicator state");
                false
            }
        }
    }

    fn set_state(&mut self, request: StateRequest) {
        let next = match self.state {
            AnimationState::Progress | AnimationState::AnimatingProgress => {
                self.timers.progress_elapsed_ms = 0.0;
                match request {
                    StateRequest::Indeterminate => {
                        self.begin_transition(TransitionDirection::ToIndeterminate)
                    }
                    other => other.resolved(),
                }
            }
            AnimationState::Indeterminate => match request {
                StateRequest::Indeterminate => return,
                StateRequest::AnimatingProgress | StateRequest::Progress => {
                    self.timers.progress_elapsed_ms = 0.0;
                    self.begin_transition(TransitionDirection::ToProgress)
                }
            },
            AnimationState::Transitioning(transition) => {
                if !self.is_phase_finished() {
                    self.deferred = if request.is_satisfied_by(transition.direction) {
                        if transition.direction == TransitionDirection::ToIndeterminate {
                            self.arc.target = MIN_PROGRESS;
                        }
                        None
                    } else {
                        Some(request)
                    };
                    trace!(?transition, ?request, "state request deferred");
                    return;
                }
                self.timers.state_elapsed_ms = 0.0;
                request.resolved()
            }
        };

        if next != self.state {
            debug!(from = ?self.state.kind(), to = ?next.kind(), "animation state changed");
        }
        self.state = next;
    }

    fn begin_transition(&mut self, direction: TransitionDirection) -> AnimationState {
        self.timers.state_elapsed_ms = 0.0;
        self.phase_fraction = 0.0;
        self.deferred = None;
        if direction == TransitionDirection::ToIndeterminate {
            self.arc.target = MIN_PROGRESS;
        }
        AnimationState::Transitioning(Transition::start(direction))
    }

    fn apply_deferred(&mut self) {
        if let Some(request) = self.deferred.take() {
            debug!(?request, "applying deferred state request");
            self.set_state(request);
        }
    }

    fn is_phase_finished(&self) -> bool {
        self.phase_fraction >= 1.0
    }

    /// Interpolates over the state timer and records the phase fraction.
    fn interpolate(&mut self, duration_ms: f32, from: f32, to: f32, curve: Curve) -> f32 {
        self.phase_fraction = fraction(self.timers.state_elapsed_ms, duration_ms);
        lerp_eased(from, to, self.phase_fraction, curve)
    }

    fn finish_phase(&mut self, next: Phase) -> PhaseStep {
        self.timers.state_elapsed_ms = 0.0;
        PhaseStep::Advance(next)
    }

    fn notify(&mut self, hook: impl FnOnce(&mut dyn AnimationListener)) {
        if let Some(listener) = self.listener.as_deref_mut() {
            hook(listener);
        }
    }

    fn update_indeterminate(&mut self) {
        while self.timers.state_elapsed_ms > INDETERMINATE_CYCLE_MS {
            self.circle.direction = -self.circle.direction;
            self.timers.state_elapsed_ms -= INDETERMINATE_CYCLE_MS;
        }

        let min = self.metrics.indeterminate_min_radius;
        let max = self.metrics.indeterminate_max_radius();
        let (from, to) = if self.circle.direction > 0 {
            (min, max)
        } else {
            (max, min)
        };
        self.circle.radius = self.interpolate(INDETERMINATE_CYCLE_MS, from, to, Curve::Decelerate);
    }

    fn update_transition(&mut self, elapsed_ms: f32) {
        // Each completed phase hands over to the next one within this call.
        while let AnimationState::Transitioning(transition) = self.state {
            let step = match transition.direction {
                TransitionDirection::ToProgress => {
                    self.step_to_progress(transition.phase, elapsed_ms)
                }
                TransitionDirection::ToIndeterminate => {
                    self.step_to_indeterminate(transition.phase)
                }
            };

            match step {
                PhaseStep::Running | PhaseStep::Finished => break,
                PhaseStep::Advance(phase) => {
                    trace!(direction = ?transition.direction, ?phase, "transition phase advanced");
                    self.state = AnimationState::Transitioning(Transition {
                        phase,
                        ..transition
                    });
                }
            }
        }
    }

    fn step_to_progress(&mut self, phase: Phase, elapsed_ms: f32) -> PhaseStep {
        match phase {
            Phase::Phase0 => {
                self.circle.initial_radius = self.circle.radius;
                self.pending.initial_sweep = ARC_INITIAL_DEGREES;
                self.arc.initial_angle = self.arc.angle;
                PhaseStep::Advance(Phase::Phase1)
            }
            Phase::Phase1 => {
                self.circle.radius = self.interpolate(
                    COLLAPSE_MS,
                    self.circle.initial_radius,
                    self.metrics.collapsed_radius,
                    Curve::AccelerateDecelerate,
                );
                if !self.is_phase_finished() {
                    return PhaseStep::Running;
                }
                self.circle.radius = self.metrics.collapsed_radius;
                self.circle.initial_center_y = self.circle.center_y;
                self.finish_phase(Phase::Phase2)
            }
            Phase::Phase2 => {
                let top = self.metrics.arc_bounds.top;
                self.circle.center_y = self.interpolate(
                    TRAVEL_MS,
                    self.circle.initial_center_y,
                    top,
                    Curve::AccelerateDecelerate,
                );
                if !self.is_phase_finished() {
                    return PhaseStep::Running;
                }
                self.circle.center_y = top;
                self.finish_phase(Phase::Phase3)
            }
            Phase::Phase3 => {
                self.pending.sweep = self.interpolate(
                    TRAVEL_MS,
                    self.pending.initial_sweep,
                    ARC_TARGET_DEGREES,
                    Curve::AccelerateDecelerate,
                );
                self.advance_progress_leg(elapsed_ms);
                if !self.is_phase_finished() {
                    return PhaseStep::Running;
                }
                self.pending.sweep = ARC_TARGET_DEGREES;
                self.finish_phase(Phase::Phase4)
            }
            Phase::Phase4 => {
                self.notify(|listener| listener.on_transition_to_progress_end());
                self.set_state(StateRequest::AnimatingProgress);
                self.circle.radius = INACTIVE_RADIUS;
                // This frame's time was already spent by Phase3.
                self.update_progress(0.0);
                self.apply_deferred();
                PhaseStep::Finished
            }
        }
    }

    fn step_to_indeterminate(&mut self, phase: Phase) -> PhaseStep {
        match phase {
            Phase::Phase0 => {
                self.recede_from_angle = self.arc.angle;
                self.pending.initial_sweep = self.pending.sweep;
                PhaseStep::Advance(Phase::Phase1)
            }
            Phase::Phase1 => {
                self.pending.sweep = self.interpolate(
                    TRAVEL_MS,
                    self.pending.initial_sweep,
                    ARC_INITIAL_DEGREES,
                    Curve::AccelerateDecelerate,
                );
                self.arc.angle = lerp_eased(
                    self.recede_from_angle,
                    MIN_PROGRESS,
                    self.phase_fraction,
                    Curve::AccelerateDecelerate,
                );
                if !self.is_phase_finished() {
                    return PhaseStep::Running;
                }
                self.pending.sweep = ARC_INITIAL_DEGREES;
                self.arc.angle = MIN_PROGRESS;
                self.arc.initial_angle = MIN_PROGRESS;
                self.circle.radius = self.metrics.collapsed_radius;
                self.finish_phase(Phase::Phase2)
            }
            Phase::Phase2 => {
                let center_y = self.metrics.center.y;
                self.circle.center_y = self.interpolate(
                    TRAVEL_MS,
                    self.metrics.arc_bounds.top,
                    center_y,
                    Curve::AccelerateDecelerate,
                );
                if !self.is_phase_finished() {
                    return PhaseStep::Running;
                }
                self.circle.center_y = center_y;
                self.finish_phase(Phase::Phase3)
            }
            Phase::Phase3 => {
                let min = self.metrics.indeterminate_min_radius;
                self.circle.radius = self.interpolate(
                    COLLAPSE_MS,
                    self.metrics.collapsed_radius,
                    min,
                    Curve::AccelerateDecelerate,
                );
                if !self.is_phase_finished() {
                    return PhaseStep::Running;
                }
                self.circle.radius = min;
                self.circle.initial_center_y = self.metrics.center.y;
                self.circle.direction = 1;
                self.finish_phase(Phase::Phase4)
            }
            Phase::Phase4 => {
                self.notify(|listener| listener.on_transition_to_indeterminate_end());
                self.set_state(StateRequest::Indeterminate);
                self.update_indeterminate();
                self.apply_deferred();
                PhaseStep::Finished
            }
        }
    }

    fn update_progress(&mut self, elapsed_ms: f32) {
        let reached = self.advance_progress_leg(elapsed_ms);
        if reached && self.state == AnimationState::AnimatingProgress {
            self.notify(|listener| listener.on_progress_end());
            self.set_state(StateRequest::Progress);
        }
    }

    /// Moves the arc along the current leg; returns whether the target was reached.
    fn advance_progress_leg(&mut self, elapsed_ms: f32) -> bool {
        let target = self.arc.target;
        self.timers.progress_elapsed_ms += elapsed_ms;
        let leg_fraction = fraction(self.timers.progress_elapsed_ms, PROGRESS_LEG_MS);
        self.arc.angle = lerp_eased(self.arc.initial_angle, target, leg_fraction, Curve::Decelerate);

        if (self.arc.angle - target).abs() < NEAR_ZERO {
            self.arc.angle = target;
            true
        } else {
            false
        }
    }
}

fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        warn!("NaN progress clamped to {MIN_PROGRESS}");
        return MIN_PROGRESS;
    }
    progress.clamp(MIN_PROGRESS, MAX_PROGRESS)
}
