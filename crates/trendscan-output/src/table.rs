//! Typed report table.

use crate::column::{Column, ColumnId};
use crate::error::ExportError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// No value
    Empty,
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Calendar date
    Date(NaiveDate),
    /// String
    Text(String),
}

impl Cell {
    /// Whether the cell holds no usable value.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Float(value) => !value.is_finite(),
            _ => false,
        }
    }

    /// JSON value: numbers stay numeric, dates become `yyyy-mm-dd`, and
    /// missing or non-finite values become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Self::Empty => Value::Null,
            Self::Int(value) => Value::from(*value),
            Self::Float(value) => serde_json::Number::from_f64(*value).map_or(Value::Null, Value::Number),
            Self::Bool(flag) => Value::Bool(*flag),
            Self::Date(date) => Value::String(date.format("%Y-%m-%d").to_string()),
            Self::Text(text) => Value::String(text.clone()),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Empty, Self::Float)
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or(Self::Empty, Self::Int)
    }
}

impl From<Option<u64>> for Cell {
    fn from(value: Option<u64>) -> Self {
        value
            .and_then(|v| i64::try_from(v).ok())
            .map_or(Self::Empty, Self::Int)
    }
}

impl From<Option<u16>> for Cell {
    fn from(value: Option<u16>) -> Self {
        value.map_or(Self::Empty, |v| Self::Int(i64::from(v)))
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Option<NaiveDate>> for Cell {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::Empty, Self::Date)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Empty, Self::Text)
    }
}

/// Something that can fill a report row.
pub trait ReportRow {
    /// Value for the given column.
    fn cell(&self, column: ColumnId) -> Cell;
}

/// Columns plus rows of cells, every row as wide as the column list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl ReportTable {
    /// Create an empty table.
    pub const fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table by asking each record for every column.
    pub fn from_records<'a, R, I>(columns: Vec<Column>, records: I) -> Self
    where
        R: ReportRow + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let rows = records
            .into_iter()
            .map(|record| columns.iter().map(|c| record.cell(c.id)).collect())
            .collect();
        Self { columns, rows }
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), ExportError> {
        if row.len() != self.columns.len() {
            return Err(ExportError::RowWidth {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column definitions.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Data rows.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header line.
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    /// Each row rendered through its column's format hint.
    pub fn rendered_rows(&self) -> impl Iterator<Item = Vec<String>> + '_ {
        self.rows.iter().map(|row| {
            self.columns
                .iter()
                .zip(row)
                .map(|(column, cell)| column.format.render(cell))
                .collect()
        })
    }
}
