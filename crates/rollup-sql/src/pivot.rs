use crate::error::{TransformError, TransformResult};
use crate::table::Table;
use crate::value::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Name of the per-row total column appended by [`pivot`].
pub const GRAND_TOTAL_COLUMN: &str = "Grand_Total";

/// Count occurrences of selected values, one column per value.
///
/// Rows whose `value_column` is not one of `values` are dropped up front, so they contribute to
/// neither the groups nor the totals. The remaining rows are grouped by
/// `(group_col_1, group_col_2)` in key order; each output row carries one count per element of
/// `values` (0 when the combination never occurs) followed by [`GRAND_TOTAL_COLUMN`], the sum of
/// those counts.
///
/// Example:
///   Input: Market, Category, Segment
///   pivot("Market", "Category", "Segment", ["Seg A", "Seg B"])
///   Output: Market, Category, Seg A, Seg B, Grand_Total
pub fn pivot(
    table: &Table,
    group_col_1: &str,
    group_col_2: &str,
    value_column: &str,
    values: &[Value],
) -> TransformResult<Table> {
    let g1 = table.require_column(group_col_1)?;
    let g2 = table.require_column(group_col_2)?;
    let value_idx = table.require_column(value_column)?;

    if values.is_empty() {
        return Err(TransformError::validation("pivot requires at least one value"));
    }
    if group_col_1 == group_col_2 {
        return Err(TransformError::validation(format!(
            "pivot grouping columns must differ, got `{group_col_1}` twice"
        )));
    }

    let value_columns: Vec<String> = values.iter().map(ToString::to_string).collect();
    let mut seen: HashSet<&str> = HashSet::from([group_col_1, group_col_2, GRAND_TOTAL_COLUMN]);
    for name in &value_columns {
        if !seen.insert(name.as_str()) {
            return Err(TransformError::validation(format!(
                "pivot value `{name}` would produce a duplicate column"
            )));
        }
    }

    let positions: HashMap<&Value, usize> = values.iter().enumerate().map(|(i, v)| (v, i)).collect();

    let mut groups: BTreeMap<(Value, Value), Vec<i64>> = BTreeMap::new();
    for row in table.rows() {
        let Some(&pos) = positions.get(&row[value_idx]) else {
            continue;
        };
        let counts = groups
            .entry((row[g1].clone(), row[g2].clone()))
            .or_insert_with(|| vec![0; values.len()]);
        counts[pos] += 1;
    }

    let mut columns = Vec::with_capacity(values.len() + 3);
    columns.push(group_col_1.to_string());
    columns.push(group_col_2.to_string());
    columns.extend(value_columns);
    columns.push(GRAND_TOTAL_COLUMN.to_string());

    let rows: Vec<Vec<Value>> = groups
        .into_iter()
        .map(|((k1, k2), counts)| {
            let total: i64 = counts.iter().sum();
            let mut row = Vec::with_capacity(counts.len() + 3);
            row.push(k1);
            row.push(k2);
            row.extend(counts.into_iter().map(Value::Int));
            row.push(Value::Int(total));
            row
        })
        .collect();

    log::debug!(
        "pivot `{value_column}` by ({group_col_1}, {group_col_2}): {} rows -> {} groups",
        table.row_count(),
        rows.len()
    );
    Ok(Table::from_parts(columns, rows))
}
