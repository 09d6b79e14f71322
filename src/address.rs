//! A1-notation addressing: column letters, remote row numbers, cell addresses
//!
//! All index arithmetic between the parsed table and remote cells lives here.

use crate::error::{SyncError, SyncResult};
use regex::Regex;
use std::fmt;

/// Rows occupied by the header above the first data row
pub const HEADER_ROWS: usize = 1;

/// Widest column a remote sheet can have (`ZZZ`)
pub const MAX_COLUMN: usize = 18_278;

/// Convert a 1-based column index to letters
///
/// Examples:
/// - 1 → A
/// - 26 → Z
/// - 27 → AA
/// - 52 → AZ
/// - 703 → AAA
pub fn to_letter(index: usize) -> SyncResult<String> {
    if index == 0 {
        return Err(SyncError::InvalidAddress(
            "column index must be 1 or greater".to_string(),
        ));
    }

    let mut letters = Vec::new();
    let mut n = index;
    while n > 0 {
        n -= 1;
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }

    Ok(letters.iter().rev().collect())
}

/// Convert column letters back to a 1-based column index (case-insensitive)
pub fn from_letter(letters: &str) -> SyncResult<usize> {
    if letters.is_empty() {
        return Err(SyncError::InvalidAddress("empty column letters".to_string()));
    }

    let mut index: usize = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(SyncError::InvalidAddress(format!(
                "invalid column letter '{}' in '{}'",
                c, letters
            )));
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A' + 1) as usize;
        index = index
            .checked_mul(26)
            .and_then(|i| i.checked_add(digit))
            .ok_or_else(|| {
                SyncError::InvalidAddress(format!("column '{}' is out of range", letters))
            })?;
    }

    Ok(index)
}

/// Remote row number of the data row at `origin`
pub fn remote_row(origin: usize) -> usize {
    origin + HEADER_ROWS
}

/// One remote cell: sheet + column + row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAddress {
    pub sheet: String,
    /// 1-based column index
    pub column: usize,
    /// 1-based remote row number
    pub row: usize,
}

impl CellAddress {
    pub fn new(sheet: impl Into<String>, column: usize, row: usize) -> Self {
        Self {
            sheet: sheet.into(),
            column,
            row,
        }
    }

    /// Address of a header field (0-based position) on the data row at `origin`
    pub fn for_field(sheet: &str, field_position: usize, origin: usize) -> Self {
        Self::new(sheet, field_position + 1, remote_row(origin))
    }

    /// Render as `Sheet!B2`, quoting the sheet name when A1 notation requires it
    pub fn to_a1(&self) -> SyncResult<String> {
        Ok(format!(
            "{}!{}{}",
            quote_sheet_name(&self.sheet),
            to_letter(self.column)?,
            self.row
        ))
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_a1() {
            Ok(a1) => write!(f, "{}", a1),
            Err(_) => write!(f, "{}!C{}R{}", self.sheet, self.column, self.row),
        }
    }
}

/// Sheet names made of word characters are used bare; anything else is quoted
pub fn quote_sheet_name(name: &str) -> String {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

/// Parses `B12` style cell labels into (column index, row number)
pub struct LabelParser {
    pattern: Regex,
}

impl LabelParser {
    pub fn new() -> SyncResult<Self> {
        let pattern = Regex::new(r"^([A-Za-z]+)([1-9][0-9]*)$")
            .map_err(|e| SyncError::Parse(format!("Regex error: {}", e)))?;
        Ok(Self { pattern })
    }

    pub fn parse(&self, label: &str) -> SyncResult<(usize, usize)> {
        let captures = self.pattern.captures(label.trim()).ok_or_else(|| {
            SyncError::InvalidAddress(format!("malformed cell label '{}'", label))
        })?;

        let column = from_letter(&captures[1])?;
        if column > MAX_COLUMN {
            return Err(SyncError::InvalidAddress(format!(
                "column in '{}' is past the last sheet column",
                label
            )));
        }
        let row = captures[2].parse::<usize>().map_err(|_| {
            SyncError::InvalidAddress(format!("row number out of range in '{}'", label))
        })?;

        Ok((column, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_letter() {
        assert_eq!(to_letter(1).unwrap(), "A");
        assert_eq!(to_letter(2).unwrap(), "B");
        assert_eq!(to_letter(26).unwrap(), "Z");
        assert_eq!(to_letter(27).unwrap(), "AA");
        assert_eq!(to_letter(52).unwrap(), "AZ");
        assert_eq!(to_letter(702).unwrap(), "ZZ");
        assert_eq!(to_letter(703).unwrap(), "AAA");
    }

    #[test]
    fn test_to_letter_rejects_zero() {
        assert!(matches!(to_letter(0), Err(SyncError::InvalidAddress(_))));
    }

    #[test]
    fn test_from_letter() {
        assert_eq!(from_letter("A").unwrap(), 1);
        assert_eq!(from_letter("z").unwrap(), 26);
        assert_eq!(from_letter("AA").unwrap(), 27);
        assert_eq!(from_letter("AZ").unwrap(), 52);
        assert_eq!(from_letter("ZZ").unwrap(), 702);
    }

    #[test]
    fn test_from_letter_invalid() {
        assert!(matches!(from_letter(""), Err(SyncError::InvalidAddress(_))));
        assert!(matches!(from_letter("A1"), Err(SyncError::InvalidAddress(_))));
        assert!(matches!(from_letter("É"), Err(SyncError::InvalidAddress(_))));
        assert!(matches!(
            from_letter("ZZZZZZZZZZZZZZZZZZZZZZZZZZZZ"),
            Err(SyncError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_remote_row_skips_header() {
        assert_eq!(remote_row(1), 2);
        assert_eq!(remote_row(10), 11);
    }

    #[test]
    fn test_quote_sheet_name() {
        assert_eq!(quote_sheet_name("Sheet1"), "Sheet1");
        assert_eq!(quote_sheet_name("My Sheet"), "'My Sheet'");
        assert_eq!(quote_sheet_name("Bob's"), "'Bob''s'");
    }

    #[test]
    fn test_label_parser() {
        let parser = LabelParser::new().unwrap();
        assert_eq!(parser.parse("A1").unwrap(), (1, 1));
        assert_eq!(parser.parse("ab12").unwrap(), (28, 12));
        assert!(parser.parse("12").is_err());
        assert!(parser.parse("A0").is_err());
        assert!(parser.parse("").is_err());
    }

    #[test]
    fn test_label_parser_rejects_columns_past_zzz() {
        let parser = LabelParser::new().unwrap();
        assert_eq!(parser.parse("ZZZ1").unwrap(), (MAX_COLUMN, 1));
        assert!(matches!(
            parser.parse("AAAA1"),
            Err(SyncError::InvalidAddress(_))
        ));
        assert!(matches!(
            parser.parse("ZZZZZZZZ1"),
            Err(SyncError::InvalidAddress(_))
        ));
    }
}
