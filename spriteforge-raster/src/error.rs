//! Error types for the spriteforge-raster crate.
//!
//! Messages are stable and safe to show to users. Pixel data and base64
//! payloads never appear in error messages.

/// Errors that can occur while decoding, transforming or encoding sprites.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// The payload could not be decoded as a raster image.
    #[error("image decode error: {0}")]
    Decode(String),

    /// A drawing surface of the required size could not be allocated.
    #[error("image surface error: {0}")]
    Surface(String),

    /// The transformed raster could not be encoded.
    #[error("image encode error: {0}")]
    Encode(String),

    /// The caller supplied arguments the operation cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for raster results.
pub type Result<T> = std::result::Result<T, RasterError>;
