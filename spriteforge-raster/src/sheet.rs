//! Sprite sheet compositing - lays frames out on a uniform grid.

use image::{Pixel, RgbaImage};

use crate::encoded::{encode_png, EncodedImage};
use crate::error::{RasterError, Result};
use crate::surface;

/// Grid geometry of a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub columns: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl SheetLayout {
    /// Layout for `count` frames of `cell_width` x `cell_height` in `columns` columns.
    ///
    /// # Errors
    ///
    /// [`RasterError::InvalidInput`] for zero columns.
    pub fn new(count: usize, columns: u32, cell_width: u32, cell_height: u32) -> Result<Self> {
        if columns == 0 {
            return Err(RasterError::InvalidInput(
                "sheet columns must be greater than 0".into(),
            ));
        }
        let count = u32::try_from(count)
            .map_err(|_| RasterError::Surface(format!("{count} frames is too many for one sheet")))?;
        Ok(Self {
            columns,
            rows: count.div_ceil(columns),
            cell_width,
            cell_height,
        })
    }

    /// Grid cell `(column, row)` of the frame at `index`.
    pub fn cell(&self, index: u32) -> (u32, u32) {
        (index % self.columns, index / self.columns)
    }

    /// Top-left pixel of the frame at `index`.
    pub fn origin(&self, index: u32) -> (u32, u32) {
        let (col, row) = self.cell(index);
        (col * self.cell_width, row * self.cell_height)
    }

    /// Sheet pixel size.
    ///
    /// # Errors
    ///
    /// [`RasterError::Surface`] if a side overflows.
    pub fn size(&self) -> Result<(u32, u32)> {
        Ok((
            surface::scaled_side(self.columns, self.cell_width)?,
            surface::scaled_side(self.rows, self.cell_height)?,
        ))
    }
}

/// Composite frames onto a grid, left-to-right then top-to-bottom.
///
/// The first frame's size is the cell size for every frame. Later frames are
/// not checked: they are drawn unscaled at their cell origin, so larger frames
/// spill into neighbouring cells (and are clipped at the sheet edge) while
/// smaller ones leave transparent space. Returns `None` for no frames.
///
/// # Errors
///
/// [`RasterError::InvalidInput`] for zero columns, [`RasterError::Surface`] if
/// the sheet canvas cannot be allocated.
pub fn compose_sheet(frames: &[RgbaImage], columns: u32) -> Result<Option<RgbaImage>> {
    let Some(first) = frames.first() else {
        return Ok(None);
    };

    let layout = SheetLayout::new(frames.len(), columns, first.width(), first.height())?;
    let (width, height) = layout.size()?;
    let mut sheet = surface::allocate(width, height)?;

    for (index, frame) in (0u32..).zip(frames) {
        let (x, y) = layout.origin(index);
        draw_over(&mut sheet, frame, x, y);
    }

    tracing::debug!(
        frames = frames.len(),
        columns = layout.columns,
        rows = layout.rows,
        width,
        height,
        "sprite sheet composed"
    );
    Ok(Some(sheet))
}

/// Source-over draw of `top` onto `bottom` at `(x, y)`, clipped to `bottom`.
///
/// Pixels landing on fully transparent destination pixels are copied exactly.
fn draw_over(bottom: &mut RgbaImage, top: &RgbaImage, x: u32, y: u32) {
    let (bw, bh) = bottom.dimensions();
    for (tx, ty, pixel) in top.enumerate_pixels() {
        let (Some(dx), Some(dy)) = (x.checked_add(tx), y.checked_add(ty)) else {
            continue;
        };
        if dx >= bw || dy >= bh || pixel[3] == 0 {
            continue;
        }
        let dest = bottom.get_pixel_mut(dx, dy);
        if dest[3] == 0 {
            *dest = *pixel;
        } else {
            dest.blend(pixel);
        }
    }
}

/// Decode payloads and composite them into a PNG sprite sheet.
///
/// Returns `None` for no frames, whatever `columns` is.
///
/// # Errors
///
/// [`RasterError::Decode`] if any payload fails to decode, otherwise as
/// [`compose_sheet`], plus [`RasterError::Encode`].
pub fn generate_sprite_sheet(frames: &[EncodedImage], columns: u32) -> Result<Option<EncodedImage>> {
    if frames.is_empty() {
        return Ok(None);
    }
    let decoded = frames
        .iter()
        .map(EncodedImage::decode)
        .collect::<Result<Vec<_>>>()?;
    match compose_sheet(&decoded, columns)? {
        Some(sheet) => encode_png(&sheet).map(Some),
        None => Ok(None),
    }
}
