//! Image generation: prompts, the backend contract and backends.
//!
//! [`GenerationClient`] is the entry point. It builds the prompt and
//! reference list for a base or action frame, executes exactly one backend
//! request and maps empty replies to [`ForgeError::Generation`](crate::ForgeError::Generation).

pub mod backend;
pub mod client;
pub mod gemini;
pub mod prompt;

pub use backend::{BackendReply, ImageBackend, ImageRequest};
pub use client::{ActionFrame, DEFAULT_MODEL, GenerationClient};
pub use gemini::{GeminiBackend, GeminiConfig};
pub use prompt::{PromptVariant, action_prompt, base_prompt, posture_guidance};
