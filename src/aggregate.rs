use crate::cell::CellValue;
use crate::error::ConvertError;
use crate::loader::SheetData;
use crate::render::Grid;
use indexmap::IndexMap;

/// Column holding the grouping key
pub const PIN_COLUMN: &str = "Cust Pin";

/// Column holding the state carried into the output
pub const STATE_COLUMN: &str = "Cust State";

/// Column that must exist in the input; its label is reused for the
/// occurrence count in the output
pub const COUNT_COLUMN: &str = "DPD";

/// One aggregated output row: the state seen with the pin's first
/// occurrence, the pin itself, and how often the pin appeared.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateEntry {
    pub state: CellValue,
    pub pin: CellValue,
    pub count: u32,
}

/// Count pin occurrences across the data rows
///
/// Rows are scanned in input order. The first sighting of a pin records the
/// row's state value (later rows with the same pin never overwrite it) and
/// every sighting, including the first, increments the count. Only pins seen
/// at least twice are returned, in first-sighting order.
///
/// # Arguments
/// * `sheet` - Ingested sheet contents
///
/// # Returns
/// * `Result<Vec<AggregateEntry>, ConvertError>` - The retained entries, or
///   a validation error naming every missing required column
pub fn count_pins(sheet: &SheetData) -> Result<Vec<AggregateEntry>, ConvertError> {
    let headers: Vec<String> = sheet.headers.iter().map(|h| h.to_string()).collect();

    let state_idx = headers.iter().position(|h| h == STATE_COLUMN);
    let pin_idx = headers.iter().position(|h| h == PIN_COLUMN);
    let count_idx = headers.iter().position(|h| h == COUNT_COLUMN);

    let (Some(state_idx), Some(pin_idx), Some(_)) = (state_idx, pin_idx, count_idx) else {
        let missing = [
            (STATE_COLUMN, state_idx),
            (PIN_COLUMN, pin_idx),
            (COUNT_COLUMN, count_idx),
        ]
        .iter()
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| name.to_string())
        .collect();
        return Err(ConvertError::MissingColumns(missing));
    };

    // IndexMap keeps first-sighting order for the output rows
    let mut counts: IndexMap<CellValue, AggregateEntry> = IndexMap::new();

    for row in &sheet.rows {
        let pin = row.get(pin_idx).cloned().unwrap_or(CellValue::Empty);
        let state = row.get(state_idx).cloned().unwrap_or(CellValue::Empty);

        let entry = counts.entry(pin.clone()).or_insert_with(|| AggregateEntry {
            state,
            pin,
            count: 0,
        });
        entry.count += 1;
    }

    Ok(counts
        .into_values()
        .filter(|entry| entry.count >= 2)
        .collect())
}

/// Build the aggregated grid: fixed three-column header and one row per
/// retained pin. Zero qualifying pins yields a header-only grid, which is
/// still drawable.
pub fn aggregate_grid(sheet: &SheetData) -> Result<Grid, ConvertError> {
    let entries = count_pins(sheet)?;

    let rows = entries
        .into_iter()
        .map(|entry| {
            vec![
                entry.state.to_string(),
                entry.pin.to_string(),
                entry.count.to_string(),
            ]
        })
        .collect();

    Ok(Grid {
        headers: vec![
            STATE_COLUMN.to_string(),
            PIN_COLUMN.to_string(),
            COUNT_COLUMN.to_string(),
        ],
        rows,
    })
}
