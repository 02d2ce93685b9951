use chrono::{DateTime, Utc};
use std::fmt;

/// A scalar cell of a tabular export.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatValue {
    Text(String),
    Number(f64),
    Integer(u64),
    Bool(bool),
    Date(DateTime<Utc>),
}

impl fmt::Display for FlatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlatValue::Text(t) => f.write_str(t),
            FlatValue::Number(n) => write!(f, "{}", n),
            FlatValue::Integer(i) => write!(f, "{}", i),
            FlatValue::Bool(b) => write!(f, "{}", b),
            FlatValue::Date(d) => f.write_str(&d.to_rfc3339()),
        }
    }
}

/// One row of a tabular export: ordered `(column, value)` cells.
///
/// Column order is part of the contract; CSV and XLSX headers are read from
/// the first row of a sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRow {
    cells: Vec<(String, FlatValue)>,
}

impl FlatRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, value: FlatValue) -> &mut Self {
        self.cells.push((column.into(), value));
        self
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &FlatValue> {
        self.cells.iter().map(|(_, v)| v)
    }

    pub fn get(&self, column: &str) -> Option<&FlatValue> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }
}
