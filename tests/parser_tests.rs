//! Table parser and query tests against decoded remote payloads

use pretty_assertions::assert_eq;
use sheetsync::parser::{decode_cell_feed, decode_values_response, parse_payload};
use sheetsync::query::{select, Condition};
use sheetsync::types::{CellEntry, RawPayload};

fn strings(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect()
}

#[test]
fn test_empty_payload_is_not_an_error() {
    let table = parse_payload(&RawPayload::empty()).unwrap();
    assert!(table.header.is_empty());
    assert_eq!(table.row_count(), 0);
}

#[test]
fn test_missing_trailing_cell_defaults_to_empty() {
    let payload = RawPayload::Grid(strings(&[&["name", "age"], &["Alice", "30"], &["Bob"]]));
    let table = parse_payload(&payload).unwrap();

    assert_eq!(table.row_values(&table.rows[0]), vec!["Alice", "30"]);
    assert_eq!(table.row_values(&table.rows[1]), vec!["Bob", ""]);
}

#[test]
fn test_parse_is_deterministic() {
    let payload = RawPayload::Cells(vec![
        CellEntry::new("B2", "30"),
        CellEntry::new("A1", "name"),
        CellEntry::new("B1", "age"),
        CellEntry::new("A2", "Alice"),
    ]);
    assert_eq!(parse_payload(&payload).unwrap(), parse_payload(&payload).unwrap());
}

#[test]
fn test_both_schemas_produce_the_same_table() {
    let grid = decode_values_response(
        r#"{"values": [["name", "age"], ["Alice", "30"], ["Bob", "41"]]}"#,
    )
    .unwrap();
    let cells = decode_cell_feed(
        r#"{"feed": {"entry": [
            {"title": {"$t": "A1"}, "content": {"$t": "name"}},
            {"title": {"$t": "B1"}, "content": {"$t": "age"}},
            {"title": {"$t": "A2"}, "content": {"$t": "Alice"}},
            {"title": {"$t": "B2"}, "content": {"$t": "30"}},
            {"title": {"$t": "A3"}, "content": {"$t": "Bob"}},
            {"title": {"$t": "B3"}, "content": {"$t": "41"}}
        ]}}"#,
    )
    .unwrap();

    assert_eq!(parse_payload(&grid).unwrap(), parse_payload(&cells).unwrap());
}

#[test]
fn test_select_keeps_origin_index() {
    let payload = RawPayload::Grid(strings(&[
        &["name", "age"],
        &["Alice", "30"],
        &["Bob", "41"],
        &["Cleo", "30"],
    ]));
    let table = parse_payload(&payload).unwrap();

    let thirty = select(&table, &Condition::equals([("age", "30")]));
    let origins: Vec<usize> = thirty.iter().map(|r| r.origin).collect();
    assert_eq!(origins, vec![1, 3]);

    assert!(select(&table, &Condition::equals([("age", "31")])).is_empty());
}

#[test]
fn test_cached_payload_survives_json_round_trip() {
    let payload = RawPayload::Grid(strings(&[&["name"], &["Alice"]]));
    let bytes = serde_json::to_vec(&payload).unwrap();
    let restored: RawPayload = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parse_payload(&restored).unwrap(), parse_payload(&payload).unwrap());
}
