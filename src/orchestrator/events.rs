//! Progress events emitted by [`SpriteForge`](super::SpriteForge).
//!
//! Callback-based, so the orchestrator stays independent of how a host
//! presents progress (CLI log lines, a progress bar, a UI).

use crate::frames::FrameId;
use crate::types::AnimationState;

/// Something happened during a generation action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForgeEvent {
    /// A backend request is about to be sent.
    RequestStarted {
        state: AnimationState,
        /// 1-based frame number within the state.
        index: usize,
        total: usize,
    },
    /// A post-processed frame was appended to the store.
    FrameAdded {
        frame_id: FrameId,
        state: AnimationState,
    },
    /// The action stopped with an error.
    ///
    /// Not emitted for [`ForgeError::Busy`](crate::ForgeError::Busy): the
    /// rejected call never started, and the running action keeps reporting.
    ActionFailed {
        /// Human-readable failure text.
        message: String,
    },
}

/// Receiver for [`ForgeEvent`]s.
pub type EventCallback = Box<dyn Fn(ForgeEvent) + Send + Sync>;
