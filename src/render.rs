use crate::error::ConvertError;
use image::codecs::jpeg::JpegEncoder;
use plotters::prelude::*;

/// The renderer-agnostic table shape both pipelines produce: ordered header
/// labels plus ordered rows of display values.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Ordered column labels for the header band
    pub headers: Vec<String>,

    /// Ordered data rows; each row is parallel-indexed to the headers
    pub rows: Vec<Vec<String>>,
}

/// Layout options for grid drawing
///
/// Text is not wrapped, truncated or clipped: a value wider than
/// `cell_width` simply runs into the next cell, as in the original
/// converter. Widen the cells instead of expecting overflow handling.
#[derive(Clone, Debug)]
pub struct GridOptions {
    /// Width of every cell in pixels
    pub cell_width: u32,

    /// Height of every cell in pixels
    pub cell_height: u32,

    /// Horizontal and vertical text inset from a cell's top-left corner
    pub inset: i32,

    /// Font size for all cell text
    pub font_size: i32,
}

impl Default for GridOptions {
    /// Default layout: 120x40 pixel cells, 10 pixel inset, 16 point text
    fn default() -> Self {
        Self {
            cell_width: 120,
            cell_height: 40,
            inset: 10,
            font_size: 16,
        }
    }
}

/// An encoded raster image together with its pixel dimensions
#[derive(Debug, Clone)]
pub struct RenderedImage {
    /// JPEG-encoded image data
    pub bytes: Vec<u8>,

    /// Image width in pixels: cell width times column count
    pub width: u32,

    /// Image height in pixels: cell height times row count plus one header
    /// band
    pub height: u32,
}

/// Rasterize a grid into a JPEG image
///
/// The canvas is filled white; each header cell gets a solid yellow
/// background with its label drawn in black at the configured inset, and
/// each data cell gets its value drawn in black at the same inset with no
/// background fill.
///
/// A grid with zero columns is rejected with an error; a grid with zero
/// data rows produces a header-only image.
///
/// # Arguments
/// * `grid` - Header labels and stringified data rows
/// * `options` - Cell geometry and font settings
///
/// # Returns
/// * `Result<RenderedImage, ConvertError>` - The encoded image or an error
pub fn draw_grid(grid: &Grid, options: &GridOptions) -> Result<RenderedImage, ConvertError> {
    if grid.headers.is_empty() {
        return Err(ConvertError::EmptyGrid);
    }

    let (Some(width), Some(height)) = (
        options.cell_width.checked_mul(grid.headers.len() as u32),
        options.cell_height.checked_mul(grid.rows.len() as u32 + 1),
    ) else {
        return Err(ConvertError::Draw(format!(
            "grid of {} columns and {} rows is too large to draw",
            grid.headers.len(),
            grid.rows.len()
        )));
    };

    let mut pixels = vec![0u8; pixel_buffer_len(width, height)];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let text_style = TextStyle::from(("sans-serif", options.font_size).into_font())
            .color(&BLACK);
        let cell_w = options.cell_width as i32;
        let cell_h = options.cell_height as i32;

        // Header band: yellow cell backgrounds with black labels
        for (col, label) in grid.headers.iter().enumerate() {
            let x = col as i32 * cell_w;
            root.draw(&Rectangle::new(
                [(x, 0), (x + cell_w, cell_h)],
                YELLOW.filled(),
            ))
            .map_err(draw_error)?;
            root.draw(&Text::new(
                label.clone(),
                (x + options.inset, options.inset),
                text_style.clone(),
            ))
            .map_err(draw_error)?;
        }

        // Data rows: black text, no background fill
        for (row_idx, row) in grid.rows.iter().enumerate() {
            let y = (row_idx as i32 + 1) * cell_h + options.inset;
            for (col_idx, value) in row.iter().enumerate() {
                root.draw(&Text::new(
                    value.clone(),
                    (col_idx as i32 * cell_w + options.inset, y),
                    text_style.clone(),
                ))
                .map_err(draw_error)?;
            }
        }

        root.present().map_err(draw_error)?;
    }

    let mut bytes = Vec::new();
    JpegEncoder::new(&mut bytes).encode(&pixels, width, height, image::ColorType::Rgb8)?;

    Ok(RenderedImage {
        bytes,
        width,
        height,
    })
}

fn draw_error<E: std::error::Error>(e: E) -> ConvertError {
    ConvertError::Draw(e.to_string())
}

// Byte length of the RGB pixel buffer. The product can exceed u32 for grids
// that are still within JPEG's per-dimension limits, so the math is done in
// usize.
fn pixel_buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}
