use crate::error::{TransformError, TransformResult};
use crate::value::Value;
use std::collections::HashMap;

/// Replace every space and `/` in a column name with `_`.
///
/// Idempotent: the output never contains either character.
pub fn normalize_column_name(name: &str) -> String {
    name.replace([' ', '/'], "_")
}

/// An ordered list of rows over a fixed, ordered set of uniquely named columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<impl Into<String>>) -> TransformResult<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let column_index = build_index(&columns)?;
        Ok(Self {
            columns,
            column_index,
            rows: Vec::new(),
        })
    }

    pub fn with_rows(
        columns: Vec<impl Into<String>>,
        rows: impl IntoIterator<Item = Vec<Value>>,
    ) -> TransformResult<Self> {
        let mut table = Self::new(columns)?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Assemble a table from parts that are already known to be consistent.
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        let column_index = columns
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.clone(), idx))
            .collect();
        Self {
            columns,
            column_index,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Vec<Value>] {
        &mut self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> TransformResult<()> {
        if row.len() != self.columns.len() {
            return Err(TransformError::validation(format!(
                "row has {} values but the table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.column_index.get(column).copied()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index.contains_key(column)
    }

    /// Like [`Table::column_index`], but a missing column is a schema error.
    pub fn require_column(&self, column: &str) -> TransformResult<usize> {
        self.column_index(column)
            .ok_or_else(|| TransformError::unknown_column(column))
    }

    pub(crate) fn require_columns<S: AsRef<str>>(&self, columns: &[S]) -> TransformResult<Vec<usize>> {
        columns
            .iter()
            .map(|c| self.require_column(c.as_ref()))
            .collect()
    }

    pub fn column_values(&self, column: &str) -> TransformResult<Vec<Value>> {
        let idx = self.require_column(column)?;
        Ok(self.rows.iter().map(|row| row[idx].clone()).collect())
    }

    /// Rename every column with [`normalize_column_name`].
    ///
    /// Fails when two columns collapse onto the same name (e.g. `"Unit Price"` and
    /// `"Unit/Price"`).
    pub fn normalize_columns(self) -> TransformResult<Table> {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| normalize_column_name(c))
            .collect();
        let column_index = build_index(&columns)?;
        Ok(Table {
            columns,
            column_index,
            rows: self.rows,
        })
    }

    /// Append `other`'s rows below this table's rows.
    ///
    /// `other` must carry exactly the same column names; its columns are re-aligned by name, so
    /// column order may differ.
    pub fn concat(&self, other: &Table) -> TransformResult<Table> {
        if let Some(extra) = other.columns.iter().find(|c| !self.has_column(c)) {
            return Err(TransformError::unknown_column(extra.clone()));
        }
        let mapping = other.require_columns(&self.columns)?;

        let mut rows = Vec::with_capacity(self.rows.len() + other.rows.len());
        rows.extend(self.rows.iter().cloned());
        rows.extend(
            other
                .rows
                .iter()
                .map(|row| mapping.iter().map(|&idx| row[idx].clone()).collect()),
        );
        Ok(Table::from_parts(self.columns.clone(), rows))
    }
}

fn build_index(columns: &[String]) -> TransformResult<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(columns.len());
    for (idx, column) in columns.iter().enumerate() {
        if index.insert(column.clone(), idx).is_some() {
            return Err(TransformError::validation(format!(
                "duplicate column name `{column}`"
            )));
        }
    }
    Ok(index)
}
