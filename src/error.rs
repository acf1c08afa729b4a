//! Error types for SpriteForge.
//!
//! Each error variant carries a stable error code (SCREAMING_SNAKE_CASE)
//! that is included in the Display output and accessible via [`ForgeError::code()`].
//! Codes are part of the public API contract and will not change.

use spriteforge_raster::RasterError;

/// Stable error codes for programmatic error handling.
///
/// Use these for distinguishing errors rather than parsing Display output.
pub mod error_codes {
    /// The backend produced no usable image, or the request itself failed.
    pub const GENERATION_FAILED: &str = "GENERATION_FAILED";

    /// An image payload could not be decoded.
    pub const IMAGE_DECODE_FAILED: &str = "IMAGE_DECODE_FAILED";

    /// A drawing surface could not be allocated or encoded.
    pub const IMAGE_SURFACE_FAILED: &str = "IMAGE_SURFACE_FAILED";

    /// An action frame was requested before any Idle frame exists.
    pub const BASE_FRAME_MISSING: &str = "BASE_FRAME_MISSING";

    /// Another generation action is still running.
    pub const GENERATION_IN_FLIGHT: &str = "GENERATION_IN_FLIGHT";

    /// Invalid configuration or out-of-range request parameter.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// A post-processing task could not be completed.
    pub const PIPELINE_ERROR: &str = "PIPELINE_ERROR";

    /// File I/O failed.
    pub const IO_ERROR: &str = "IO_ERROR";
}

/// Errors produced by SpriteForge.
///
/// The Display impl formats as `[CODE] message`; [`ForgeError::user_message`]
/// gives the bare text for display to a person.
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// Backend returned no content or no image, or the call failed.
    #[error("[{}] {}", error_codes::GENERATION_FAILED, .0)]
    Generation(String),

    /// Image payload could not be decoded.
    #[error("[{}] {}", error_codes::IMAGE_DECODE_FAILED, .0)]
    ImageDecode(String),

    /// Surface allocation or encoding failed.
    #[error("[{}] {}", error_codes::IMAGE_SURFACE_FAILED, .0)]
    ImageSurface(String),

    /// No base (Idle) frame to anchor identity on.
    #[error("[{}] {}", error_codes::BASE_FRAME_MISSING, .0)]
    MissingBase(String),

    /// Another action holds the in-flight flag.
    #[error("[{}] {}", error_codes::GENERATION_IN_FLIGHT, .0)]
    Busy(String),

    /// Invalid configuration or request parameter.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    Config(String),

    /// Post-processing task failure.
    #[error("[{}] {}", error_codes::PIPELINE_ERROR, .0)]
    Pipeline(String),

    /// File I/O error.
    #[error("[{}] {}", error_codes::IO_ERROR, .0)]
    Io(String),
}

impl ForgeError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Generation(_) => error_codes::GENERATION_FAILED,
            Self::ImageDecode(_) => error_codes::IMAGE_DECODE_FAILED,
            Self::ImageSurface(_) => error_codes::IMAGE_SURFACE_FAILED,
            Self::MissingBase(_) => error_codes::BASE_FRAME_MISSING,
            Self::Busy(_) => error_codes::GENERATION_IN_FLIGHT,
            Self::Config(_) => error_codes::CONFIG_INVALID,
            Self::Pipeline(_) => error_codes::PIPELINE_ERROR,
            Self::Io(_) => error_codes::IO_ERROR,
        }
    }

    /// Returns the inner message without the code prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Generation(m)
            | Self::ImageDecode(m)
            | Self::ImageSurface(m)
            | Self::MissingBase(m)
            | Self::Busy(m)
            | Self::Config(m)
            | Self::Pipeline(m)
            | Self::Io(m) => m,
        }
    }

    /// Human-readable text for surfacing a failed action.
    pub fn user_message(&self) -> String {
        match self {
            Self::Generation(m) => format!("Generation failed: {m}"),
            Self::MissingBase(_) => "Please generate a base character first.".to_owned(),
            Self::Busy(_) => "A generation is already in progress.".to_owned(),
            other => other.message().to_owned(),
        }
    }
}

impl From<RasterError> for ForgeError {
    fn from(e: RasterError) -> Self {
        match e {
            RasterError::Decode(m) => Self::ImageDecode(m),
            RasterError::Surface(m) => Self::ImageSurface(m),
            RasterError::Encode(m) => Self::ImageSurface(format!("encode: {m}")),
            RasterError::InvalidInput(m) => Self::Config(m),
        }
    }
}

impl From<std::io::Error> for ForgeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Convenience alias for SpriteForge results.
pub type Result<T> = std::result::Result<T, ForgeError>;
