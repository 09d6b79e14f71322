//! CLI command handlers

pub mod commands;

pub use commands::{fetch, insert, open_sheet, parse_pairs, select, update, Target};
