use crate::aggregate;
use crate::error::ConvertError;
use crate::loader::{self, SheetData};
use crate::render::{self, Grid, GridOptions, RenderedImage};

/// Which rendering pipeline to run for an upload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Draw every row and column of the sheet verbatim
    Full,

    /// Draw the pin-count summary (pins appearing at least twice)
    Aggregate,
}

impl RenderMode {
    /// Map the form's mode value onto a pipeline. `"aggregate"` selects the
    /// aggregated render; anything else falls back to the full render.
    pub fn from_form_value(value: &str) -> Self {
        match value {
            "aggregate" => RenderMode::Aggregate,
            _ => RenderMode::Full,
        }
    }
}

/// Identity mapping from ingested sheet to grid: same header order, same
/// row order and content, values stringified.
pub fn full_grid(sheet: &SheetData) -> Grid {
    Grid {
        headers: sheet.headers.iter().map(|h| h.to_string()).collect(),
        rows: sheet
            .rows
            .iter()
            .map(|row| row.iter().map(|value| value.to_string()).collect())
            .collect(),
    }
}

/// Convert an uploaded spreadsheet into a JPEG table image
///
/// This is the single entry point behind the upload form: parse the bytes,
/// build the grid for the selected mode and draw it with the default cell
/// geometry.
///
/// # Arguments
/// * `bytes` - The uploaded file contents
/// * `mode` - Which rendering pipeline to run
///
/// # Returns
/// * `Result<RenderedImage, ConvertError>` - The encoded image or the first
///   error hit while parsing, validating or drawing
///
/// # Examples
/// ```no_run
/// use excel2image::convert::{render_spreadsheet, RenderMode};
///
/// let bytes = std::fs::read("report.xlsx").unwrap();
/// match render_spreadsheet(&bytes, RenderMode::Full) {
///     Ok(image) => println!("rendered {}x{} image", image.width, image.height),
///     Err(e) => eprintln!("conversion failed: {}", e),
/// }
/// ```
pub fn render_spreadsheet(bytes: &[u8], mode: RenderMode) -> Result<RenderedImage, ConvertError> {
    let sheet = loader::load_workbook(bytes)?;

    let grid = match mode {
        RenderMode::Full => full_grid(&sheet),
        RenderMode::Aggregate => aggregate::aggregate_grid(&sheet)?,
    };

    render::draw_grid(&grid, &GridOptions::default())
}
