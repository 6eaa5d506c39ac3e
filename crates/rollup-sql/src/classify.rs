use crate::error::{TransformError, TransformResult};
use crate::select::select;
use crate::table::Table;
use crate::value::Value;

/// Label for `value`: the label of the first range (inclusive on both ends) that contains it, or
/// `default_label` when none does. Nulls and text never match a range.
pub fn label_for<'a, L: AsRef<str>>(
    value: &Value,
    ranges: &[(f64, f64)],
    labels: &'a [L],
    default_label: &'a str,
) -> &'a str {
    let Some(number) = value.as_f64() else {
        return default_label;
    };
    ranges
        .iter()
        .zip(labels)
        .find(|((min, max), _)| *min <= number && number <= *max)
        .map(|(_, label)| label.as_ref())
        .unwrap_or(default_label)
}

/// SQL `CASE WHEN` over numeric ranges.
///
/// Projects `table` onto `keep_columns`, then appends `new_column` holding the label that
/// [`label_for`] assigns to each row's `value_column`. Ranges are tried in list order, so
/// overlapping ranges resolve to the earliest one.
pub fn classify<K: AsRef<str>, L: AsRef<str>>(
    table: &Table,
    keep_columns: &[K],
    value_column: &str,
    ranges: &[(f64, f64)],
    labels: &[L],
    default_label: &str,
    new_column: &str,
) -> TransformResult<Table> {
    if ranges.len() != labels.len() {
        return Err(TransformError::validation(format!(
            "got {} ranges but {} labels",
            ranges.len(),
            labels.len()
        )));
    }
    if ranges.is_empty() {
        return Err(TransformError::validation("classify requires at least one range"));
    }
    let inverted = |(min, max): &&(f64, f64)| min.is_nan() || max.is_nan() || min > max;
    if let Some((min, max)) = ranges.iter().find(inverted) {
        return Err(TransformError::validation(format!(
            "range ({min}, {max}) is empty or not a number"
        )));
    }
    if keep_columns.is_empty() {
        return Err(TransformError::validation("classify requires at least one column to keep"));
    }
    if keep_columns.iter().any(|c| c.as_ref() == new_column) {
        return Err(TransformError::validation(format!(
            "category column `{new_column}` is already among the kept columns"
        )));
    }

    let projected = select(table, keep_columns)?;
    let value_idx = projected.require_column(value_column)?;

    let mut columns = projected.columns().to_vec();
    columns.push(new_column.to_string());
    let rows = projected
        .into_rows()
        .into_iter()
        .map(|mut row| {
            let label = label_for(&row[value_idx], ranges, labels, default_label);
            row.push(Value::from(label));
            row
        })
        .collect();

    Ok(Table::from_parts(columns, rows))
}
