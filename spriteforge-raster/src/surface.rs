//! Drawing-surface allocation with explicit limits.
//!
//! Allocation failures in Rust abort the process, so surface sizes are
//! checked up front and rejected with [`RasterError::Surface`] instead.

use image::{Rgba, RgbaImage};

use crate::error::{RasterError, Result};

/// Largest width or height a surface may have.
pub const MAX_SURFACE_SIDE: u32 = 32_768;

/// Largest total pixel count a surface may have (16384 x 16384).
pub const MAX_SURFACE_PIXELS: u64 = 1 << 28;

/// Fully transparent pixel.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Allocate a fully transparent RGBA surface.
///
/// # Errors
///
/// Returns [`RasterError::Surface`] if either side exceeds
/// [`MAX_SURFACE_SIDE`] or the area exceeds [`MAX_SURFACE_PIXELS`].
pub fn allocate(width: u32, height: u32) -> Result<RgbaImage> {
    check(width, height)?;
    Ok(RgbaImage::from_pixel(width, height, TRANSPARENT))
}

/// Check that a surface of the given size may be allocated.
///
/// # Errors
///
/// Same limits as [`allocate`].
pub fn check(width: u32, height: u32) -> Result<()> {
    if width > MAX_SURFACE_SIDE || height > MAX_SURFACE_SIDE {
        return Err(RasterError::Surface(format!(
            "{width}x{height} exceeds the {MAX_SURFACE_SIDE}px side limit"
        )));
    }
    let pixels = u64::from(width) * u64::from(height);
    if pixels > MAX_SURFACE_PIXELS {
        return Err(RasterError::Surface(format!(
            "{width}x{height} ({pixels} pixels) exceeds the {MAX_SURFACE_PIXELS} pixel limit"
        )));
    }
    Ok(())
}

/// Multiply a cell size by a cell count, failing as a surface error on overflow.
pub(crate) fn scaled_side(cells: u32, cell_size: u32) -> Result<u32> {
    cells.checked_mul(cell_size).ok_or_else(|| {
        RasterError::Surface(format!("{cells} cells of {cell_size}px overflow a surface side"))
    })
}
