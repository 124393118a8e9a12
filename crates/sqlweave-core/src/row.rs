//! Result rows.
//!
//! A [`RowSet`] is what an execution handle returns: column names once, then
//! positional cells. [`RowSet::into_rows`] pairs them into [`Row`]s.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::value::SqlValue;

/// Raw query output as produced by an execution handle.
///
/// `columns` describes the statement, not the rows: a query that matches
/// nothing still names its result columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    /// Column names, in result order.
    pub columns: Vec<String>,
    /// Cells of each row, positionally aligned with `columns`.
    pub rows: Vec<Vec<SqlValue>>,
}

impl RowSet {
    /// Creates a row set from column names and row cells.
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self { columns, rows }
    }

    /// Returns true when no rows were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Materializes every row, preserving column order.
    ///
    /// Never fails: a cell without a column name is named by its 1-based
    /// position (`column_3`), and a missing cell reads as `Null`.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        let Self { columns, rows } = self;
        rows.into_iter()
            .map(|cells| Row::from_cells(&columns, cells))
            .collect()
    }
}

/// One result row: an ordered mapping from column name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Pairs `cells` with `columns`.
    #[must_use]
    pub fn from_cells(columns: &[String], cells: Vec<SqlValue>) -> Self {
        let width = columns.len().max(cells.len());
        let mut names = Vec::with_capacity(width);
        for i in 0..width {
            names.push(
                columns
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("column_{}", i + 1)),
            );
        }
        let mut values = cells;
        values.resize(width, SqlValue::Null);
        Self {
            columns: names,
            values,
        }
    }

    /// Returns the value of the named column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    /// Returns the value at a 0-based position.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// Column names, in result order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true for a row without columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates `(column, value)` pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
