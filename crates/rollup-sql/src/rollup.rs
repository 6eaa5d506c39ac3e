//! Subtotal / grand-total rows and the ordering that interleaves them with the data.
//!
//! Synthetic rows are ordinary rows whose grouping columns hold marker labels:
//!
//! ```text
//! group_col_1     group_col_2   <numeric columns...>
//! <value>         <value>       data row
//! <value>         Total         subtotal over every row with that group_col_1 value
//! Grand Total     Total         total over the whole table
//! ```
//!
//! There is no separate row-kind flag, so a real group literally named like a marker is
//! indistinguishable from a synthetic row.

use crate::error::{TransformError, TransformResult};
use crate::group::partition;
use crate::table::Table;
use crate::value::{NumericSum, Value};
use serde::{Deserialize, Serialize};

/// Marker values written into the grouping columns of synthetic rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollupLabels {
    /// Second grouping column of subtotal and grand-total rows.
    pub total: String,
    /// First grouping column of the grand-total row.
    pub grand_total: String,
}

impl Default for RollupLabels {
    fn default() -> Self {
        Self {
            total: "Total".to_string(),
            grand_total: "Grand Total".to_string(),
        }
    }
}

impl RollupLabels {
    pub fn new(total: impl Into<String>, grand_total: impl Into<String>) -> Self {
        Self {
            total: total.into(),
            grand_total: grand_total.into(),
        }
    }
}

/// Build the subtotal rows (one per distinct `group_col_1` value, in key order) followed by a
/// single grand-total row.
///
/// Only the synthetic rows are returned; glue them onto the base table with [`Table::concat`]
/// (or use [`with_rollup`]). Every column other than the two grouping columns is summed and must
/// therefore be numeric.
pub fn rollup(
    table: &Table,
    group_col_1: &str,
    group_col_2: &str,
    labels: &RollupLabels,
) -> TransformResult<Table> {
    let g1 = table.require_column(group_col_1)?;
    let g2 = table.require_column(group_col_2)?;
    if g1 == g2 {
        return Err(TransformError::validation(format!(
            "rollup grouping columns must differ, got `{group_col_1}` twice"
        )));
    }

    let measure_idxs: Vec<usize> = (0..table.columns().len())
        .filter(|&idx| idx != g1 && idx != g2)
        .collect();
    for &idx in &measure_idxs {
        if let Some(row) = table.rows().iter().find(|row| matches!(row[idx], Value::Text(_))) {
            return Err(TransformError::validation(format!(
                "column `{}` is not numeric (found `{}`); project to the grouping and numeric \
                 columns before rolling up",
                table.columns()[idx],
                row[idx]
            )));
        }
    }

    let synthetic_row = |key_1: Value, sums: &[NumericSum]| {
        let mut row = vec![Value::Null; table.columns().len()];
        row[g1] = key_1;
        row[g2] = Value::from(labels.total.as_str());
        for (&idx, sum) in measure_idxs.iter().zip(sums) {
            row[idx] = sum.total();
        }
        row
    };

    let mut rows = Vec::new();
    let mut grand = vec![NumericSum::default(); measure_idxs.len()];
    for (mut key, members) in partition(table, &[g1]) {
        let mut sums = vec![NumericSum::default(); measure_idxs.len()];
        for &member in &members {
            let row = &table.rows()[member];
            for (slot, &idx) in measure_idxs.iter().enumerate() {
                sums[slot].add(&row[idx]);
                grand[slot].add(&row[idx]);
            }
        }
        rows.push(synthetic_row(key.swap_remove(0), &sums));
    }
    rows.push(synthetic_row(
        Value::from(labels.grand_total.as_str()),
        &grand,
    ));

    log::debug!(
        "rollup by `{group_col_1}`: {} subtotal row(s) + grand total",
        rows.len() - 1
    );
    Ok(Table::from_parts(table.columns().to_vec(), rows))
}

/// Stable sort that places, for each `group_col_1` value, the ordinary rows (ordered by
/// `group_col_2`) followed by that value's subtotal, and the grand total last.
///
/// The sort key is `(is grand total, group_col_1, is subtotal, group_col_2)`.
pub fn order_rollup(
    table: &Table,
    group_col_1: &str,
    group_col_2: &str,
    labels: &RollupLabels,
) -> TransformResult<Table> {
    let g1 = table.require_column(group_col_1)?;
    let g2 = table.require_column(group_col_2)?;

    let grand = Value::from(labels.grand_total.as_str());
    let total = Value::from(labels.total.as_str());

    let mut rows = table.rows().to_vec();
    rows.sort_by(|a, b| {
        (a[g1] == grand)
            .cmp(&(b[g1] == grand))
            .then_with(|| a[g1].cmp(&b[g1]))
            .then_with(|| (a[g2] == total).cmp(&(b[g2] == total)))
            .then_with(|| a[g2].cmp(&b[g2]))
    });
    Ok(Table::from_parts(table.columns().to_vec(), rows))
}

/// `rollup`, concatenated onto `table`, in canonical order.
pub fn with_rollup(
    table: &Table,
    group_col_1: &str,
    group_col_2: &str,
    labels: &RollupLabels,
) -> TransformResult<Table> {
    let totals = rollup(table, group_col_1, group_col_2, labels)?;
    let combined = table.concat(&totals)?;
    order_rollup(&combined, group_col_1, group_col_2, labels)
}
