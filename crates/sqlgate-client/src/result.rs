//! Backend-neutral query results.
//!
//! A [`ResultSet`] is the ordered column names of one statement's projection
//! plus the rows it produced. Each [`Row`] carries its values and a
//! name-to-index lookup that is built once per statement and shared by
//! reference across every row of that statement; the lookup is never
//! mutated after construction.

use std::collections::HashMap;
use std::sync::Arc;

use crate::value::Value;

/// The ordered columns and rows produced by one statement.
///
/// Statements without a projection (INSERT, CREATE, ...) produce a result
/// set with no columns and no rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    columns: Arc<Vec<String>>,
    rows: Vec<Row>,
}

impl ResultSet {
    /// Build a result set from column names and per-row values.
    ///
    /// The name-to-index lookup is constructed here, once, and shared by
    /// every row. When two columns carry the same name the later index
    /// wins, matching lookup behavior in the engines this client fronts.
    pub fn new(columns: Vec<String>, values: Vec<Vec<Value>>) -> Self {
        let index: HashMap<String, usize> = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        let index = Arc::new(index);
        let rows = values
            .into_iter()
            .map(|values| Row {
                index: Arc::clone(&index),
                values,
            })
            .collect();
        Self {
            columns: Arc::new(columns),
            rows,
        }
    }

    /// Column names in projection order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The rows, in the order the engine produced them.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result set has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the rows by reference.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// One record of column values.
///
/// Values can be addressed by position (`row[0]`) or by column name
/// (`row["id"]`); both go through the same shared lookup, so the two
/// addressing modes always agree.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    index: Arc<HashMap<String, usize>>,
    values: Vec<Value>,
}

impl Row {
    /// The value at `position`, if in range.
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    /// The value under `column`, if the column exists.
    pub fn get_named(&self, column: &str) -> Option<&Value> {
        self.index.get(column).and_then(|&i| self.values.get(i))
    }

    /// All values, in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of values (the statement's column count).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::ops::Index<usize> for Row {
    type Output = Value;

    fn index(&self, position: usize) -> &Value {
        &self.values[position]
    }
}

impl std::ops::Index<&str> for Row {
    type Output = Value;

    fn index(&self, column: &str) -> &Value {
        self.get_named(column)
            .unwrap_or_else(|| panic!("no column named `{column}`"))
    }
}
