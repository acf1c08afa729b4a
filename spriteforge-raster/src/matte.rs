//! Background matting by color distance.
//!
//! The background reference color is always sampled from the top-left pixel.
//! Generated sprites are requested on a solid white background, so the corner
//! is normally background; a sprite touching the corner will key out its own
//! color instead. Known fidelity risk, kept for compatibility.

use image::RgbaImage;

use crate::encoded::{encode_png, EncodedImage};
use crate::error::Result;
use crate::surface;

/// Default RGB distance under which a pixel counts as background.
pub const DEFAULT_TOLERANCE: f64 = 20.0;

/// Euclidean distance between two RGB triples.
pub fn rgb_distance(a: [u8; 3], b: [u8; 3]) -> f64 {
    let dr = f64::from(a[0]) - f64::from(b[0]);
    let dg = f64::from(a[1]) - f64::from(b[1]);
    let db = f64::from(a[2]) - f64::from(b[2]);
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Make every pixel within `tolerance` of the top-left color fully transparent.
///
/// RGB channels are never modified; only alpha changes. A negative tolerance
/// matches nothing. Zero-sized images are returned as-is.
pub fn matte_background(image: &RgbaImage, tolerance: f64) -> RgbaImage {
    let mut out = image.clone();
    if out.width() == 0 || out.height() == 0 {
        return out;
    }

    let reference = {
        let p = out.get_pixel(0, 0);
        [p[0], p[1], p[2]]
    };

    let mut cleared = 0usize;
    for pixel in out.pixels_mut() {
        if rgb_distance([pixel[0], pixel[1], pixel[2]], reference) <= tolerance {
            pixel[3] = 0;
            cleared += 1;
        }
    }
    tracing::debug!(
        width = out.width(),
        height = out.height(),
        cleared,
        tolerance,
        "background matted"
    );
    out
}

/// Decode a payload, matte its background and re-encode it as PNG.
///
/// # Errors
///
/// [`RasterError::Decode`](crate::RasterError::Decode) if the payload is not a
/// raster, [`RasterError::Surface`](crate::RasterError::Surface) if the output
/// surface is too large, [`RasterError::Encode`](crate::RasterError::Encode)
/// if PNG encoding fails.
pub fn remove_background(image: &EncodedImage, tolerance: f64) -> Result<EncodedImage> {
    let decoded = image.decode()?;
    surface::check(decoded.width(), decoded.height())?;
    encode_png(&matte_background(&decoded, tolerance))
}
