//! End-to-end tests for the upload pipeline: workbooks are built in memory,
//! rendered through the public entry point and the resulting JPEG is decoded
//! to check its geometry.

use excel2image::cell::CellValue;
use excel2image::convert::{RenderMode, render_spreadsheet};
use excel2image::error::ConvertError;
use excel2image::{aggregate, loader};
use image::GenericImageView;
use rust_xlsxwriter::Workbook;

/// Build an xlsx with the given header row and string/number data rows
fn workbook_bytes(headers: &[&str], rows: &[Vec<&str>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            worksheet
                .write_string((row_idx + 1) as u32, col as u16, *value)
                .unwrap();
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// Build the pin workbook used by the aggregation tests: states in column
/// one, numeric pins in column two, a zero DPD in column three
fn pin_workbook(states: &[&str], pins: &[f64]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.write_string(0, 0, "Cust State").unwrap();
    worksheet.write_string(0, 1, "Cust Pin").unwrap();
    worksheet.write_string(0, 2, "DPD").unwrap();

    for (i, (state, pin)) in states.iter().zip(pins).enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, *state).unwrap();
        worksheet.write_number(row, 1, *pin).unwrap();
        worksheet.write_number(row, 2, 0.0).unwrap();
    }

    workbook.save_to_buffer().unwrap()
}

#[test]
fn full_render_dimensions_match_the_sheet() {
    let bytes = workbook_bytes(
        &["Name", "Age", "City"],
        &[vec!["Alice", "30", "NYC"], vec!["Bob", "25", "SF"]],
    );

    let image = render_spreadsheet(&bytes, RenderMode::Full).unwrap();

    // 3 columns x 120, (2 rows + header) x 40
    assert_eq!(image.width, 360);
    assert_eq!(image.height, 120);

    let decoded = image::load_from_memory(&image.bytes).unwrap();
    assert_eq!(decoded.dimensions(), (360, 120));
}

#[test]
fn loader_preserves_headers_and_row_counts() {
    let bytes = workbook_bytes(
        &["Name", "Age"],
        &[vec!["Alice", "30"], vec!["Bob", "25"], vec!["Cara", "41"]],
    );

    let sheet = loader::load_workbook(&bytes).unwrap();
    assert_eq!(sheet.headers.len(), 2);
    assert_eq!(sheet.rows.len(), 3);
    assert_eq!(sheet.headers[0], CellValue::Text("Name".to_string()));
    assert_eq!(sheet.rows[2][0], CellValue::Text("Cara".to_string()));
}

#[test]
fn aggregate_render_keeps_repeated_pins_in_first_sighting_order() {
    let bytes = pin_workbook(
        &["A", "B", "A", "A", "B"],
        &[100.0, 200.0, 100.0, 100.0, 200.0],
    );

    let sheet = loader::load_workbook(&bytes).unwrap();
    let entries = aggregate::count_pins(&sheet).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].state, CellValue::Text("A".to_string()));
    assert_eq!(entries[0].pin, CellValue::Number(100.0));
    assert_eq!(entries[0].count, 3);
    assert_eq!(entries[1].state, CellValue::Text("B".to_string()));
    assert_eq!(entries[1].pin, CellValue::Number(200.0));
    assert_eq!(entries[1].count, 2);
}

#[test]
fn aggregate_render_dimensions_match_the_summary() {
    let bytes = pin_workbook(
        &["A", "B", "A", "A", "B"],
        &[100.0, 200.0, 100.0, 100.0, 200.0],
    );

    let image = render_spreadsheet(&bytes, RenderMode::Aggregate).unwrap();

    // Fixed 3 summary columns, 2 qualifying pins plus the header band
    assert_eq!(image.width, 360);
    assert_eq!(image.height, 120);

    let decoded = image::load_from_memory(&image.bytes).unwrap();
    assert_eq!(decoded.dimensions(), (360, 120));
}

#[test]
fn aggregate_with_no_repeated_pins_draws_header_only() {
    let bytes = pin_workbook(&["A", "B", "C"], &[1.0, 2.0, 3.0]);

    let image = render_spreadsheet(&bytes, RenderMode::Aggregate).unwrap();
    assert_eq!(image.width, 360);
    assert_eq!(image.height, 40);
}

#[test]
fn aggregate_reports_every_missing_column() {
    let bytes = workbook_bytes(&["Cust Pin", "Remarks"], &[vec!["100", "x"]]);

    let err = render_spreadsheet(&bytes, RenderMode::Aggregate).unwrap_err();
    match &err {
        ConvertError::MissingColumns(missing) => {
            assert_eq!(missing, &vec!["Cust State".to_string(), "DPD".to_string()]);
        }
        other => panic!("expected MissingColumns, got {:?}", other),
    }
    assert_eq!(err.to_string(), "Missing required columns: Cust State, DPD");
}

#[test]
fn unrecognized_mode_routes_to_the_full_render() {
    let bytes = pin_workbook(
        &["A", "B", "A", "A", "B"],
        &[100.0, 200.0, 100.0, 100.0, 200.0],
    );

    let mode = RenderMode::from_form_value("bogus");
    let image = render_spreadsheet(&bytes, mode).unwrap();

    // Full render of 3 columns and 5 data rows, not the 2-row summary
    assert_eq!(image.width, 360);
    assert_eq!(image.height, 240);
}

#[test]
fn invalid_upload_fails_with_a_parse_error() {
    let err = render_spreadsheet(b"definitely not an xlsx", RenderMode::Full).unwrap_err();
    assert!(matches!(err, ConvertError::Parse(_)));
    assert!(err.user_message().starts_with("An unexpected error occurred"));
}

#[test]
fn validation_errors_keep_their_specific_message() {
    let err = ConvertError::MissingColumns(vec!["Cust State".to_string()]);
    assert_eq!(err.user_message(), "Missing required columns: Cust State");
}
