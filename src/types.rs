use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

//==============================================================================
// Raw Payloads (what the remote returns, what the cache stores)
//==============================================================================

/// A single labeled cell from a legacy cell feed (e.g. `B12` → "Alice")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellEntry {
    pub label: String,
    pub value: String,
}

impl CellEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Raw tabular payload in one of the two remote shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "data", rename_all = "snake_case")]
pub enum RawPayload {
    /// Row-major grid, row 0 is the header (Sheets v4 `values`)
    Grid(Vec<Vec<String>>),
    /// Flat list of labeled cells, row 1 is the header (legacy cell feed)
    Cells(Vec<CellEntry>),
}

impl RawPayload {
    /// An empty grid
    pub fn empty() -> Self {
        RawPayload::Grid(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RawPayload::Grid(rows) => rows.is_empty(),
            RawPayload::Cells(cells) => cells.is_empty(),
        }
    }

    /// Shape name, for logging
    pub fn shape_name(&self) -> &'static str {
        match self {
            RawPayload::Grid(_) => "grid",
            RawPayload::Cells(_) => "cells",
        }
    }
}

//==============================================================================
// Parsed Table
//==============================================================================

/// One data row, keyed by field name and tagged with its origin index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based position of this row in the remote source (header excluded)
    pub origin: usize,
    pub cells: BTreeMap<String, String>,
}

impl Row {
    pub fn new(origin: usize) -> Self {
        Self {
            origin,
            cells: BTreeMap::new(),
        }
    }

    /// Value of a field, `None` when the field is not part of this row
    pub fn get(&self, field: &str) -> Option<&str> {
        self.cells.get(field).map(String::as_str)
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(field.into(), value.into());
    }
}

/// Header plus rows in remote order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 0-based position of the first header column with this name
    pub fn column_index(&self, field: &str) -> Option<usize> {
        self.header.iter().position(|name| name == field)
    }

    /// Row values in header order, "" for anything missing
    pub fn row_values(&self, row: &Row) -> Vec<String> {
        self.header
            .iter()
            .map(|name| row.get(name).unwrap_or_default().to_string())
            .collect()
    }

    /// Look up a row by its origin index
    pub fn row_at(&self, origin: usize) -> Option<&Row> {
        self.rows.iter().find(|row| row.origin == origin)
    }
}

//==============================================================================
// Write Intents
//==============================================================================

/// One cell-level write at a fully qualified address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellWrite {
    /// `Sheet!B2` style address
    pub address: String,
    pub value: String,
}

/// A computed, not-yet-sent remote mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteIntent {
    /// New row, values aligned to the header
    Append(Vec<String>),
    /// Cell updates sent as one batch
    BatchUpdate(Vec<CellWrite>),
}

impl WriteIntent {
    /// Number of cells this intent touches
    pub fn cell_count(&self) -> usize {
        match self {
            WriteIntent::Append(values) => values.len(),
            WriteIntent::BatchUpdate(writes) => writes.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_values_follow_header_order() {
        let mut table = Table::new(vec!["name".to_string(), "age".to_string()]);
        let mut row = Row::new(1);
        row.set("age", "30");
        row.set("name", "Alice");
        table.rows.push(row);

        assert_eq!(table.row_values(&table.rows[0]), vec!["Alice", "30"]);
    }

    #[test]
    fn test_column_index_uses_first_duplicate() {
        let table = Table::new(vec!["a".to_string(), "b".to_string(), "a".to_string()]);
        assert_eq!(table.column_index("a"), Some(0));
        assert_eq!(table.column_index("missing"), None);
    }

    #[test]
    fn test_raw_payload_serde_tagging() {
        let payload = RawPayload::Cells(vec![CellEntry::new("A1", "name")]);
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"shape\":\"cells\""));
        let back: RawPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }
}
