//! # spriteforge-raster
//!
//! Deterministic post-processing for generated character sprites.
//!
//! Every function here is a pure transform of its raster input. The crate
//! works at two levels:
//!
//! - **Pixel level** on [`image::RgbaImage`]: [`matte_background`],
//!   [`center_content`], [`compose_sheet`].
//! - **Payload level** on [`EncodedImage`] (MIME type + encoded bytes):
//!   [`remove_background`], [`center_sprite`], [`generate_sprite_sheet`].
//!   These decode, transform and re-encode as PNG.
//!
//! ## Pipeline
//!
//! A raw generated image goes through matting then centering:
//!
//! ```no_run
//! # fn example(raw: &spriteforge_raster::EncodedImage) -> spriteforge_raster::Result<()> {
//! use spriteforge_raster::{center_sprite, remove_background, DEFAULT_TOLERANCE};
//!
//! let matted = remove_background(raw, DEFAULT_TOLERANCE)?;
//! let sprite = center_sprite(&matted)?;
//! println!("{}", sprite.to_data_url().len());
//! # Ok(())
//! # }
//! ```

pub mod center;
pub mod encoded;
pub mod error;
pub mod matte;
pub mod sheet;
pub mod surface;

pub use center::{center_content, center_sprite, content_bounds, ContentBounds, ALPHA_THRESHOLD};
pub use encoded::{encode_png, EncodedImage, PNG_MIME};
pub use error::{RasterError, Result};
pub use matte::{matte_background, remove_background, DEFAULT_TOLERANCE};
pub use sheet::{compose_sheet, generate_sprite_sheet, SheetLayout};

/// Run the standard clean-up pipeline: background matting, then centering.
///
/// Both stages run on the decoded pixels and the result is encoded once. When
/// matting leaves nothing visible the matted image is returned uncentered.
///
/// # Errors
///
/// Propagates any decode, surface or encode failure from either stage.
pub fn clean_sprite(raw: &EncodedImage, tolerance: f64) -> Result<EncodedImage> {
    let decoded = raw.decode()?;
    surface::check(decoded.width(), decoded.height())?;
    let matted = matte_background(&decoded, tolerance);
    if content_bounds(&matted).is_none() {
        return encode_png(&matted);
    }
    encode_png(&center_content(&matted)?)
}
