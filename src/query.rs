//! Row queries against a parsed table. Never touches the network.

use crate::types::{Row, Table};
use std::collections::BTreeMap;
use std::fmt;

/// Which rows a query selects
pub enum Condition {
    /// Every row
    All,
    /// Every listed field equals the given value exactly
    Equals(BTreeMap<String, String>),
    /// Arbitrary predicate over a row
    Predicate(Box<dyn Fn(&Row) -> bool>),
}

impl Condition {
    /// Build an equality condition from `(field, value)` pairs
    pub fn equals<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Condition::Equals(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn predicate(f: impl Fn(&Row) -> bool + 'static) -> Self {
        Condition::Predicate(Box::new(f))
    }

    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Condition::All => true,
            Condition::Equals(fields) => fields
                .iter()
                .all(|(field, value)| row.get(field) == Some(value.as_str())),
            Condition::Predicate(f) => f(row),
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Condition::All
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::All => write!(f, "All"),
            Condition::Equals(fields) => f.debug_tuple("Equals").field(fields).finish(),
            Condition::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

/// Rows matching `condition`, in remote order, origin indices intact
pub fn select(table: &Table, condition: &Condition) -> Vec<Row> {
    table
        .rows
        .iter()
        .filter(|row| condition.matches(row))
        .cloned()
        .collect()
}
