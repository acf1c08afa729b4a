//! Sequence orchestration.
//!
//! [`SpriteForge`] decides what to generate and in what order, runs each
//! result through post-processing and keeps the session's frames.

mod events;
mod forge;

pub use events::{EventCallback, ForgeEvent};
pub use forge::{BaseOutcome, SpriteForge};
