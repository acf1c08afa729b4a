//! Self-describing embedded raster payloads.
//!
//! An [`EncodedImage`] is a MIME type plus encoded bytes. It is the unit that
//! flows between the generation backend, the post-processor and the frame
//! store, and it converts to and from `data:{mime};base64,{payload}` URLs for
//! display and for re-submission as a reference image.

use std::fmt;
use std::io::Cursor;

use base64::Engine as _;
use image::{ImageEncoder, RgbaImage};

use crate::error::{RasterError, Result};

/// MIME type of every payload produced by this crate.
pub const PNG_MIME: &str = "image/png";

/// An encoded raster image with its MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    mime_type: String,
    data: Vec<u8>,
}

impl EncodedImage {
    /// Wrap already-encoded bytes.
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Wrap PNG bytes.
    pub fn png(data: Vec<u8>) -> Self {
        Self::new(PNG_MIME, data)
    }

    /// Build from a MIME type and a bare base64 payload (no `data:` prefix).
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Decode`] if the payload is not valid base64.
    pub fn from_base64(mime_type: impl Into<String>, payload: &str) -> Result<Self> {
        let data = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| RasterError::Decode(format!("invalid base64 payload: {e}")))?;
        Ok(Self::new(mime_type, data))
    }

    /// Parse a `data:{mime};base64,{payload}` URL.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Decode`] if the URL is not a base64 data URL.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| RasterError::Decode("payload is not a data URL".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| RasterError::Decode("data URL has no payload separator".into()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| RasterError::Decode("data URL is not base64-encoded".into()))?;
        if mime_type.is_empty() {
            return Err(RasterError::Decode("data URL has no MIME type".into()));
        }
        Self::from_base64(mime_type, payload)
    }

    /// The MIME type, e.g. `image/png`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The encoded bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the payload, returning the encoded bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The bare base64 payload, as attached to backend requests.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Render as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    /// Decode into an 8-bit RGBA pixel buffer.
    ///
    /// The format is sniffed from the bytes; the declared MIME type is
    /// advisory only.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Decode`] if the bytes are not a supported raster.
    pub fn decode(&self) -> Result<RgbaImage> {
        image::load_from_memory(&self.data)
            .map(|img| img.to_rgba8())
            .map_err(|e| RasterError::Decode(format!("{} payload: {e}", self.mime_type)))
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Encode an RGBA buffer as PNG.
///
/// # Errors
///
/// Returns [`RasterError::Encode`] if the encoder rejects the buffer.
pub fn encode_png(image: &RgbaImage) -> Result<EncodedImage> {
    let mut buf = Cursor::new(Vec::new());
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| RasterError::Encode(format!("PNG encode: {e}")))?;
    Ok(EncodedImage::png(buf.into_inner()))
}
