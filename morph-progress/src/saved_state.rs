//! Save/restore of the indicator across host-driven reconstruction.
//!
//! Only two scalars survive: the target progress and the state ordinal, laid
//! out in that order. In-flight transition geometry is not persisted.

use bytemuck::{Pod, PodCastError, Zeroable};
use thiserror::Error;

use crate::state::AnimationStateKind;

/// Errors produced while decoding persisted state.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum RestoreError {
    /// The byte buffer does not hold exactly one saved state.
    #[error("malformed saved state: {0:?}")]
    Malformed(PodCastError),
    /// The state ordinal does not name a known state.
    #[error("unknown animation state ordinal {0}")]
    UnknownState(i32),
    /// The progress value is NaN or infinite.
    #[error("non-finite saved progress {0}")]
    NonFiniteProgress(f32),
}

/// The persisted form of a [`ProgressAnimator`](crate::ProgressAnimator).
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct SavedState {
    /// Last target progress value.
    pub progress: f32,
    /// Ordinal of the [`AnimationStateKind`] at save time.
    pub state: i32,
}

impl SavedState {
    /// Size of the encoded form in bytes.
    pub const ENCODED_LEN: usize = std::mem::size_of::<SavedState>();

    /// Creates a saved state from its parts.
    pub fn new(progress: f32, state: AnimationStateKind) -> Self {
        Self {
            progress,
            state: state.ordinal(),
        }
    }

    /// Encodes the state as raw bytes, progress first.
    pub fn to_bytes(&self) -> [u8; SavedState::ENCODED_LEN] {
        let mut bytes = [0u8; SavedState::ENCODED_LEN];
        bytes.copy_from_slice(bytemuck::bytes_of(self));
        bytes
    }

    /// Decodes and validates bytes produced by [`SavedState::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RestoreError> {
        let saved: SavedState =
            bytemuck::try_pod_read_unaligned(bytes).map_err(RestoreError::Malformed)?;
        saved.validate()?;
        Ok(saved)
    }

    /// Checks both fields and returns the decoded state kind.
    pub fn validate(&self) -> Result<AnimationStateKind, RestoreError> {
        if !self.progress.is_finite() {
            return Err(RestoreError::NonFiniteProgress(self.progress));
        }
        AnimationStateKind::try_from(self.state)
    }
}
