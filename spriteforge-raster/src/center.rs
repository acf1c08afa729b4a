//! Content centering on the alpha bounding box.
//!
//! Animations pivot around the canvas center, so every frame is re-positioned
//! so that its visible content sits in the middle of a same-sized canvas.

use image::RgbaImage;

use crate::encoded::{encode_png, EncodedImage};
use crate::error::Result;
use crate::surface;

/// Pixels with alpha at or below this value count as background noise.
pub const ALPHA_THRESHOLD: u8 = 10;

/// Inclusive pixel bounds of visible content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl ContentBounds {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Top-left position that centers these bounds on a `width` x `height` canvas.
    ///
    /// Odd leftovers round down, so content sits half a pixel up-left of center.
    pub fn centered_origin(&self, width: u32, height: u32) -> (u32, u32) {
        ((width - self.width()) / 2, (height - self.height()) / 2)
    }
}

/// Tight bounding box of pixels whose alpha exceeds [`ALPHA_THRESHOLD`].
///
/// Returns `None` when no pixel qualifies.
pub fn content_bounds(image: &RgbaImage) -> Option<ContentBounds> {
    let mut bounds: Option<ContentBounds> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] <= ALPHA_THRESHOLD {
            continue;
        }
        bounds = Some(match bounds {
            None => ContentBounds {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            },
            Some(b) => ContentBounds {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
        });
    }
    bounds
}

/// Move the visible content to the center of a transparent canvas of the same size.
///
/// Only the bounding-box region is copied (including any faint pixels inside
/// it); everything outside becomes transparent. Content is never scaled. An
/// image with no visible content is returned unchanged.
///
/// # Errors
///
/// Returns [`RasterError::Surface`](crate::RasterError::Surface) if the output
/// canvas cannot be allocated.
pub fn center_content(image: &RgbaImage) -> Result<RgbaImage> {
    let Some(bounds) = content_bounds(image) else {
        tracing::debug!("no visible content; centering skipped");
        return Ok(image.clone());
    };

    let (width, height) = image.dimensions();
    let (target_x, target_y) = bounds.centered_origin(width, height);
    let mut canvas = surface::allocate(width, height)?;

    for dy in 0..bounds.height() {
        for dx in 0..bounds.width() {
            let pixel = *image.get_pixel(bounds.min_x + dx, bounds.min_y + dy);
            canvas.put_pixel(target_x + dx, target_y + dy, pixel);
        }
    }

    tracing::debug!(
        ?bounds,
        target_x,
        target_y,
        "content centered"
    );
    Ok(canvas)
}

/// Decode a payload, center its content and re-encode it as PNG.
///
/// A payload with no visible content is returned byte-for-byte.
///
/// # Errors
///
/// [`RasterError::Decode`](crate::RasterError::Decode),
/// [`RasterError::Surface`](crate::RasterError::Surface) or
/// [`RasterError::Encode`](crate::RasterError::Encode).
pub fn center_sprite(image: &EncodedImage) -> Result<EncodedImage> {
    let decoded = image.decode()?;
    if content_bounds(&decoded).is_none() {
        return Ok(image.clone());
    }
    encode_png(&center_content(&decoded)?)
}
