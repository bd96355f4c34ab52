//! Redraw loop glue between a host and the [`ProgressAnimator`].
//!
//! ## Usage
//!
//! Call [`FrameDriver::tick`] from the host's draw callback. The driver
//! measures the time since the previous frame, advances the animator, draws,
//! and asks the [`FrameClock`] for another frame while anything is moving.

use std::time::Instant;

use tracing::trace;

use crate::{
    animator::ProgressAnimator, listener::AnimationListener, render::Surface,
    saved_state::SavedState,
};

/// Time source and redraw scheduler supplied by the host.
pub trait FrameClock {
    /// Current time.
    fn now(&self) -> Instant;

    /// Asks the host to call [`FrameDriver::tick`] again soon.
    fn request_frame(&mut self);
}

/// [`FrameClock`] backed by [`Instant::now`], forwarding redraw requests to a
/// host callback.
pub struct SystemClock<F> {
    on_request_frame: F,
}

impl<F: FnMut()> SystemClock<F> {
    /// Creates a clock that calls `on_request_frame` whenever a frame is needed.
    pub fn new(on_request_frame: F) -> Self {
        Self { on_request_frame }
    }
}

impl<F: FnMut()> FrameClock for SystemClock<F> {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn request_frame(&mut self) {
        (self.on_request_frame)();
    }
}

/// Drives a [`ProgressAnimator`] from the host's redraw loop.
pub struct FrameDriver<C: FrameClock> {
    animator: ProgressAnimator,
    clock: C,
    last_tick: Instant,
}

impl<C: FrameClock> FrameDriver<C> {
    /// Wraps `animator`; the first frame measures time from now.
    pub fn new(animator: ProgressAnimator, clock: C) -> Self {
        let last_tick = clock.now();
        Self {
            animator,
            clock,
            last_tick,
        }
    }

    /// The driven animator.
    pub fn animator(&self) -> &ProgressAnimator {
        &self.animator
    }

    /// The clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Runs one frame: update, render, and reschedule while animating.
    ///
    /// Returns whether another frame was requested.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let now = self.clock.now();
        // A clock stepping backwards yields zero elapsed time.
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;

        let elapsed_ms = elapsed.as_secs_f32() * 1000.0;
        self.animator.update(elapsed_ms);
        self.animator.render(surface);

        let animating = self.animator.is_animating();
        trace!(elapsed_ms, animating, state = ?self.animator.state(), "frame");
        if animating {
            self.clock.request_frame();
        }
        animating
    }

    /// Restarts frame timing from now and schedules a frame, so time spent
    /// between frames on the caller's side does not count as animation time.
    pub fn notify_state_changed(&mut self) {
        self.last_tick = self.clock.now();
        self.clock.request_frame();
    }

    /// See [`ProgressAnimator::set_progress`].
    pub fn set_progress(&mut self, progress: f32) {
        self.animator.set_progress(progress);
        self.notify_state_changed();
    }

    /// See [`ProgressAnimator::set_indeterminate`].
    pub fn set_indeterminate(&mut self) {
        self.animator.set_indeterminate();
        self.notify_state_changed();
    }

    /// Forwards a size change from the host.
    pub fn on_size_changed(&mut self, width: f32, height: f32) {
        self.animator.on_size_changed(width, height);
    }

    /// See [`ProgressAnimator::set_listener`].
    pub fn set_listener(&mut self, listener: impl AnimationListener + 'static) {
        self.animator.set_listener(listener);
    }

    /// See [`ProgressAnimator::save`].
    pub fn save(&self) -> SavedState {
        self.animator.save()
    }

    /// Restores persisted bytes and schedules a frame if anything changed.
    pub fn restore_bytes(&mut self, bytes: &[u8]) -> bool {
        let restored = self.animator.restore_bytes(bytes);
        if restored {
            self.notify_state_changed();
        }
        restored
    }

    /// Releases the animator.
    pub fn into_animator(self) -> ProgressAnimator {
        self.animator
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc, time::Duration};

    use super::*;
    use crate::{
        config::ProgressIndicatorArgs,
        render::{ArcCommand, CircleCommand},
        state::AnimationStateKind,
    };

    #[derive(Clone)]
    struct ManualClock {
        origin: Instant,
        offset: Rc<Cell<Duration>>,
        requests: Rc<Cell<usize>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                origin: Instant::now(),
                offset: Rc::new(Cell::new(Duration::from_secs(1))),
                requests: Rc::new(Cell::new(0)),
            }
        }

        fn advance(&self, millis: u64) {
            self.offset
                .set(self.offset.get() + Duration::from_millis(millis));
        }

        fn rewind(&self, millis: u64) {
            self.offset
                .set(self.offset.get() - Duration::from_millis(millis));
        }
    }

    impl FrameClock for ManualClock {
        fn now(&self) -> Instant {
            self.origin + self.offset.get()
        }

        fn request_frame(&mut self) {
            self.requests.set(self.requests.get() + 1);
        }
    }

    #[derive(Default)]
    struct CountingSurface {
        circles: usize,
        arcs: usize,
    }

    impl Surface for CountingSurface {
        fn draw_circle(&mut self, _circle: &CircleCommand) {
            self.circles += 1;
        }

        fn draw_arc(&mut self, _arc: &ArcCommand) {
            self.arcs += 1;
        }
    }

    fn driver() -> (FrameDriver<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let mut driver = FrameDriver::new(
            ProgressAnimator::new(ProgressIndicatorArgs::default()),
            clock.clone(),
        );
        driver.on_size_changed(200.0, 200.0);
        (driver, clock)
    }

    #[test]
    fn test_tick_uses_time_since_last_frame() {
        let (mut driver, clock) = driver();
        let mut surface = CountingSurface::default();

        clock.advance(250);
        assert!(driver.tick(&mut surface));
        // Half of the decelerated pulse: 80 + 20 * 0.75.
        let radius = driver.animator().indeterminate_circle().radius;
        assert!((radius - 95.0).abs() < 1e-3, "radius {radius}");
        assert_eq!(surface.circles, 1);
        assert_eq!(clock.requests.get(), 1);
    }

    #[test]
    fn test_backwards_clock_counts_as_no_time() {
        let (mut driver, clock) = driver();
        let mut surface = CountingSurface::default();

        clock.advance(100);
        driver.tick(&mut surface);
        let radius = driver.animator().indeterminate_circle().radius;

        clock.rewind(50);
        driver.tick(&mut surface);
        assert_eq!(driver.animator().indeterminate_circle().radius, radius);
    }

    #[test]
    fn test_state_change_resets_frame_timing() {
        let (mut driver, clock) = driver();
        let mut surface = CountingSurface::default();

        // Caller-side latency before the request must not leak into the morph.
        clock.advance(10_000);
        driver.set_progress(1.0);
        assert_eq!(clock.requests.get(), 1);

        clock.advance(100);
        driver.tick(&mut surface);
        assert_eq!(
            driver.animator().state(),
            AnimationStateKind::TransitioningToProgress
        );
        let transition = driver.animator().transition().expect("in flight");
        assert_eq!(transition.phase, crate::state::Phase::Phase1);
    }

    #[test]
    fn test_stops_requesting_frames_at_rest() {
        let (mut driver, clock) = driver();
        let mut surface = CountingSurface::default();

        driver.set_progress(0.3);
        let mut frames = 0;
        loop {
            clock.advance(16);
            frames += 1;
            if !driver.tick(&mut surface) {
                break;
            }
            assert!(frames < 1_000, "animation never settled");
        }
        assert_eq!(driver.animator().state(), AnimationStateKind::Progress);

        let requests = clock.requests.get();
        clock.advance(16);
        assert!(!driver.tick(&mut surface));
        assert_eq!(clock.requests.get(), requests);
    }

    #[test]
    fn test_restore_schedules_frame() {
        let (mut driver, clock) = driver();
        let saved = SavedState::new(0.75, AnimationStateKind::Progress);

        assert!(driver.restore_bytes(&saved.to_bytes()));
        assert_eq!(clock.requests.get(), 1);
        assert_eq!(driver.save(), saved);

        assert!(!driver.restore_bytes(&[1, 2, 3]));
        assert_eq!(clock.requests.get(), 1);
    }

    #[test]
    fn test_into_animator_keeps_state() {
        let (mut driver, clock) = driver();
        driver.set_progress(1.2);
        clock.advance(100);
        driver.tick(&mut CountingSurface::default());

        let animator = driver.into_animator();
        assert_eq!(animator.progress(), 1.2);
        assert_eq!(animator.state(), AnimationStateKind::TransitioningToProgress);
    }
}
