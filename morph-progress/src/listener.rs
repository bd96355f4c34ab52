//! Notifications fired when an animation finishes.

/// Receives end-of-animation notifications from
/// [`ProgressAnimator::update`](crate::ProgressAnimator::update).
///
/// Every hook has an empty default body, so implementors only override what
/// they care about. Hooks fire synchronously and at most once per transition
/// or progress leg.
pub trait AnimationListener {
    /// The arc has collapsed back into the pulsing circle.
    fn on_transition_to_indeterminate_end(&mut self) {}

    /// The pulsing circle has unfolded into the progress arc.
    fn on_transition_to_progress_end(&mut self) {}

    /// The arc has reached the target progress.
    fn on_progress_end(&mut self) {}
}
