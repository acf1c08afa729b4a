//! Generated frames and the session frame store.

mod store;

pub use store::FrameStore;

use chrono::{DateTime, Utc};
use spriteforge_raster::EncodedImage;
use uuid::Uuid;

use crate::types::AnimationState;

/// Unique frame identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(Uuid);

impl FrameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for FrameId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for FrameId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One post-processed sprite frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFrame {
    pub id: FrameId,
    pub state: AnimationState,
    /// Matted and centered PNG.
    pub image: EncodedImage,
    pub created_at: DateTime<Utc>,
}

/// Reference images for the next frame of a state.
///
/// Computed from the store for each request and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSet {
    /// Base Idle frame image (identity anchor).
    pub identity: EncodedImage,
    /// Last frame of the state (motion anchor), absent for its first frame.
    pub motion: Option<EncodedImage>,
    /// Frames of the state already in the store.
    pub existing: usize,
}
