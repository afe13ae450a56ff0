use crate::cell::CellValue;
use crate::error::ConvertError;
use calamine::{Reader, Xlsx};
use std::io::Cursor;

/// Raw contents of the first sheet of an uploaded workbook
///
/// Row 1 of the sheet becomes the header labels (empty header cells are kept
/// as [`CellValue::Empty`]); every following row becomes a data row with its
/// native cell types preserved.
#[derive(Debug, Clone)]
pub struct SheetData {
    /// Ordered column labels from the first row
    pub headers: Vec<CellValue>,

    /// Ordered data rows, parallel-indexed to the headers
    pub rows: Vec<Vec<CellValue>>,
}

/// Load an uploaded spreadsheet from its raw bytes
///
/// Opens the bytes as an XLSX workbook and reads the first sheet into a
/// [`SheetData`]. Values keep their native type; they are stringified only
/// when the grid is drawn.
///
/// # Arguments
/// * `bytes` - The uploaded file contents
///
/// # Returns
/// * `Result<SheetData, ConvertError>` - The sheet contents, or a parse
///   error if the bytes are not a valid workbook or the sheet is empty
pub fn load_workbook(bytes: &[u8]) -> Result<SheetData, ConvertError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    // First worksheet only, like the original single-sheet form
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ConvertError::EmptyWorkbook)?;

    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let headers: Vec<CellValue> = match rows.next() {
        Some(header_row) => header_row.iter().map(CellValue::from).collect(),
        None => return Err(ConvertError::EmptyWorkbook),
    };

    let data_rows: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(CellValue::from).collect())
        .collect();

    Ok(SheetData {
        headers,
        rows: data_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_with_parse_error() {
        let result = load_workbook(b"this is not a spreadsheet");
        assert!(matches!(result, Err(ConvertError::Parse(_))));
    }

    #[test]
    fn empty_input_fails() {
        assert!(load_workbook(&[]).is_err());
    }
}
