use crate::error::{TransformError, TransformResult};
use crate::table::Table;
use std::collections::HashSet;

/// Project `table` onto `columns`, in the given order.
pub fn select<S: AsRef<str>>(table: &Table, columns: &[S]) -> TransformResult<Table> {
    let idxs = table.require_columns(columns)?;

    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        let column = column.as_ref();
        if !seen.insert(column) {
            return Err(TransformError::validation(format!(
                "column `{column}` selected more than once"
            )));
        }
    }

    let rows = table
        .rows()
        .iter()
        .map(|row| idxs.iter().map(|&idx| row[idx].clone()).collect())
        .collect();
    let names = columns.iter().map(|c| c.as_ref().to_string()).collect();
    Ok(Table::from_parts(names, rows))
}
