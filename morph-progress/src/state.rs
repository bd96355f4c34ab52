//! State machine vocabulary for the progress animator.

use crate::saved_state::RestoreError;

/// Public, flat view of the animator state.
///
/// The discriminants are the persisted ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum AnimationStateKind {
    /// Pulsing circle, no progress shown.
    Indeterminate = 0,
    /// Pulse collapsing into the progress arc.
    TransitioningToProgress = 1,
    /// Arc moving towards the target progress.
    AnimatingProgress = 2,
    /// Arc resting at the target progress.
    Progress = 3,
    /// Arc collapsing back into the pulse.
    TransitioningToIndeterminate = 4,
}

impl AnimationStateKind {
    /// Persisted ordinal of this state.
    #[inline]
    pub fn ordinal(self) -> i32 {
        self as i32
    }

    /// Whether this state shows (or is heading to) determinate progress.
    pub fn is_progress_like(self) -> bool {
        matches!(
            self,
            Self::TransitioningToProgress | Self::AnimatingProgress | Self::Progress
        )
    }
}

impl TryFrom<i32> for AnimationStateKind {
    type Error = RestoreError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Indeterminate),
            1 => Ok(Self::TransitioningToProgress),
            2 => Ok(Self::AnimatingProgress),
            3 => Ok(Self::Progress),
            4 => Ok(Self::TransitioningToIndeterminate),
            other => Err(RestoreError::UnknownState(other)),
        }
    }
}

/// Which way a transition is heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    /// Indeterminate pulse into progress arc.
    ToProgress,
    /// Progress arc into indeterminate pulse.
    ToIndeterminate,
}

/// Sub-step of a transition.
///
/// `Phase0` is a one-shot setup that falls straight through into `Phase1`;
/// `Phase4` is the single-frame completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Setup.
    Phase0,
    /// First animated phase.
    Phase1,
    /// Second animated phase.
    Phase2,
    /// Third animated phase.
    Phase3,
    /// Completion.
    Phase4,
}

/// An in-flight transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Destination of the transition.
    pub direction: TransitionDirection,
    /// Current sub-step.
    pub phase: Phase,
}

impl Transition {
    pub(crate) fn start(direction: TransitionDirection) -> Self {
        Self {
            direction,
            phase: Phase::Phase0,
        }
    }
}

/// Internal animator state.
///
/// Tagging the phase onto the transition variant keeps the state/phase pair
/// from ever disagreeing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnimationState {
    Indeterminate,
    Transitioning(Transition),
    AnimatingProgress,
    Progress,
}

impl AnimationState {
    pub(crate) fn kind(self) -> AnimationStateKind {
        match self {
            Self::Indeterminate => AnimationStateKind::Indeterminate,
            Self::Transitioning(Transition {
                direction: TransitionDirection::ToProgress,
                ..
            }) => AnimationStateKind::TransitioningToProgress,
            Self::Transitioning(Transition {
                direction: TransitionDirection::ToIndeterminate,
                ..
            }) => AnimationStateKind::TransitioningToIndeterminate,
            Self::AnimatingProgress => AnimationStateKind::AnimatingProgress,
            Self::Progress => AnimationStateKind::Progress,
        }
    }
}

/// A state a caller (or a finishing transition) asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StateRequest {
    Indeterminate,
    AnimatingProgress,
    Progress,
}

impl StateRequest {
    /// Whether a transition heading in `direction` already satisfies this request.
    pub(crate) fn is_satisfied_by(self, direction: TransitionDirection) -> bool {
        match self {
            Self::Indeterminate => direction == TransitionDirection::ToIndeterminate,
            Self::AnimatingProgress | Self::Progress => {
                direction == TransitionDirection::ToProgress
            }
        }
    }

    pub(crate) fn resolved(self) -> AnimationState {
        match self {
            Self::Indeterminate => AnimationState::Indeterminate,
            Self::AnimatingProgress => AnimationState::AnimatingProgress,
            Self::Progress => AnimationState::Progress,
        }
    }
}
