//! Table parser: raw remote payloads → header + rows
//!
//! Both remote shapes end up in the same [`Table`]:
//! - `Grid`: row 0 is the header, every later row `r` gets origin index `r`
//! - `Cells`: row 1 labels name the columns, a cell on row `n` belongs to origin `n - 1`

pub mod feed;

use crate::address::{LabelParser, HEADER_ROWS};
use crate::error::{SyncError, SyncResult};
use crate::types::{CellEntry, RawPayload, Row, Table};
use std::collections::{BTreeMap, HashMap};

pub use feed::{decode_cell_feed, decode_values_response};

/// Parse a raw payload into a table.
///
/// An empty payload is not an error; it yields an empty header and no rows.
///
/// # Example
/// ```
/// use sheetsync::parser::parse_payload;
/// use sheetsync::types::RawPayload;
///
/// let grid = vec![
///     vec!["name".to_string(), "age".to_string()],
///     vec!["Alice".to_string(), "30".to_string()],
/// ];
/// let table = parse_payload(&RawPayload::Grid(grid))?;
/// assert_eq!(table.header, vec!["name", "age"]);
/// assert_eq!(table.rows[0].get("age"), Some("30"));
/// # Ok::<(), sheetsync::error::SyncError>(())
/// ```
pub fn parse_payload(payload: &RawPayload) -> SyncResult<Table> {
    match payload {
        RawPayload::Grid(grid) => Ok(parse_grid(grid)),
        RawPayload::Cells(cells) => parse_cells(cells),
    }
}

/// Parse a row-major grid whose first row is the header.
///
/// Duplicate header names are kept in the header, but only the last value per
/// name survives in each row.
pub fn parse_grid(grid: &[Vec<String>]) -> Table {
    let Some((header, data)) = grid.split_first() else {
        return Table::default();
    };

    let mut table = Table::new(header.clone());
    for (offset, source) in data.iter().enumerate() {
        let mut row = Row::new(offset + 1);
        for (j, field) in header.iter().enumerate() {
            let value = source.get(j).cloned().unwrap_or_default();
            row.set(field.clone(), value);
        }
        table.rows.push(row);
    }

    table
}

/// Parse a flat list of labeled cells.
///
/// Header columns are positional: a gap in row 1 becomes an empty header name
/// so that header position always equals the remote column index.
pub fn parse_cells(cells: &[CellEntry]) -> SyncResult<Table> {
    if cells.is_empty() {
        return Ok(Table::default());
    }

    let labels = LabelParser::new()?;

    // row number → (column index → value), both ascending
    let mut by_row: BTreeMap<usize, BTreeMap<usize, &str>> = BTreeMap::new();
    for cell in cells {
        let (column, row) = labels.parse(&cell.label).map_err(|e| {
            SyncError::Parse(format!("cell feed entry '{}': {}", cell.label, e))
        })?;
        by_row
            .entry(row)
            .or_default()
            .insert(column, cell.value.as_str());
    }

    let mut names: HashMap<usize, String> = HashMap::new();
    let mut header = Vec::new();
    if let Some(header_cells) = by_row.get(&HEADER_ROWS) {
        let width = header_cells.keys().next_back().copied().unwrap_or(0);
        header = vec![String::new(); width];
        for (&column, &name) in header_cells {
            header[column - 1] = name.to_string();
            names.insert(column, name.to_string());
        }
    }

    let mut table = Table::new(header);
    for (&row_number, entries) in by_row.range(HEADER_ROWS + 1..) {
        let mut row = Row::new(row_number - HEADER_ROWS);
        for name in names.values() {
            row.set(name.clone(), "");
        }
        for (column, value) in entries {
            if let Some(name) = names.get(column) {
                row.set(name.clone(), *value);
            }
        }
        table.rows.push(row);
    }

    Ok(table)
}
