//! SpriteForge: consistent multi-frame 2D character sprites from a
//! generative image model.
//!
//! A session starts from a [`SpriteConfig`] and a base Idle sprite, then
//! grows animation states (walk, run, attack, ...) one frame at a time.
//!
//! # Architecture
//!
//! - **Generation**: [`generation::GenerationClient`] builds prompts and
//!   reference lists and calls an [`generation::ImageBackend`] (Gemini over HTTP)
//! - **Post-processing**: the `spriteforge-raster` crate mattes the white
//!   background, centers the sprite and composites sprite sheets
//! - **Orchestration**: [`SpriteForge`] chains requests so each frame is
//!   anchored on the base design and on the previous frame of its animation
//! - **Frames**: [`frames::FrameStore`] keeps the session's frames in order

pub mod config;
pub mod error;
pub mod frames;
pub mod generation;
pub mod orchestrator;
pub mod types;

pub use config::ForgeConfig;
pub use error::{ForgeError, Result};
pub use frames::{FrameId, FrameStore, GeneratedFrame};
pub use orchestrator::{BaseOutcome, EventCallback, ForgeEvent, SpriteForge};
pub use spriteforge_raster::EncodedImage;
pub use types::{AnimationState, SpriteCategory, SpriteConfig, SpriteStyle, SpriteWeapon};
