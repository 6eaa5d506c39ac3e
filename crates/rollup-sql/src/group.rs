use crate::error::{TransformError, TransformResult};
use crate::table::Table;
use crate::value::{NumericSum, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggFunc {
    Count,
    Sum,
    Mean,
    Min,
    Max,
}

impl FromStr for AggFunc {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "count" => Ok(AggFunc::Count),
            "sum" => Ok(AggFunc::Sum),
            "mean" | "avg" | "average" => Ok(AggFunc::Mean),
            "min" => Ok(AggFunc::Min),
            "max" => Ok(AggFunc::Max),
            _ => Err(TransformError::validation(format!(
                "unknown aggregation `{s}`: expected count, sum, mean, min or max"
            ))),
        }
    }
}

impl fmt::Display for AggFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggFunc::Count => "count",
            AggFunc::Sum => "sum",
            AggFunc::Mean => "mean",
            AggFunc::Min => "min",
            AggFunc::Max => "max",
        })
    }
}

/// Row indices of `table` partitioned by the values at `key_idxs`, in key order.
///
/// Nulls are a key like any other and sort last.
pub(crate) fn partition(table: &Table, key_idxs: &[usize]) -> BTreeMap<Vec<Value>, Vec<usize>> {
    let mut groups: BTreeMap<Vec<Value>, Vec<usize>> = BTreeMap::new();
    for (row_idx, row) in table.rows().iter().enumerate() {
        let key = key_idxs.iter().map(|&idx| row[idx].clone()).collect();
        groups.entry(key).or_default().push(row_idx);
    }
    groups
}

fn group_key_idxs<S: AsRef<str>>(
    table: &Table,
    keys: &[S],
    output_name: &str,
) -> TransformResult<Vec<usize>> {
    if keys.is_empty() {
        return Err(TransformError::validation("group-by requires at least one key column"));
    }
    if keys.iter().any(|k| k.as_ref() == output_name) {
        return Err(TransformError::validation(format!(
            "output column `{output_name}` clashes with a group-by key"
        )));
    }
    let idxs = table.require_columns(keys)?;
    let mut sorted = idxs.clone();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != idxs.len() {
        return Err(TransformError::validation("group-by keys must be distinct"));
    }
    Ok(idxs)
}

fn output_columns<S: AsRef<str>>(keys: &[S], output_name: &str) -> Vec<String> {
    keys.iter()
        .map(|k| k.as_ref().to_string())
        .chain(std::iter::once(output_name.to_string()))
        .collect()
}

/// One row per distinct combination of `keys` (sorted by key) with the number of rows in that
/// group stored in `counter_name`.
pub fn group_count<S: AsRef<str>>(
    table: &Table,
    keys: &[S],
    counter_name: &str,
) -> TransformResult<Table> {
    let key_idxs = group_key_idxs(table, keys, counter_name)?;
    let rows: Vec<Vec<Value>> = partition(table, &key_idxs)
        .into_iter()
        .map(|(mut key, members)| {
            key.push(Value::Int(members.len() as i64));
            key
        })
        .collect();

    log::debug!(
        "group_count: {} rows -> {} groups",
        table.row_count(),
        rows.len()
    );
    Ok(Table::from_parts(output_columns(keys, counter_name), rows))
}

/// Like [`group_count`], but computes `func` over `agg_column` for each group.
pub fn group_agg<S: AsRef<str>>(
    table: &Table,
    keys: &[S],
    output_name: &str,
    agg_column: &str,
    func: AggFunc,
) -> TransformResult<Table> {
    let key_idxs = group_key_idxs(table, keys, output_name)?;
    let agg_idx = table.require_column(agg_column)?;

    let mut rows = Vec::new();
    for (mut key, members) in partition(table, &key_idxs) {
        let values = members.iter().map(|&row| &table.rows()[row][agg_idx]);
        key.push(aggregate(values, func, agg_column)?);
        rows.push(key);
    }

    log::debug!(
        "group_agg ({func} of `{agg_column}`): {} rows -> {} groups",
        table.row_count(),
        rows.len()
    );
    Ok(Table::from_parts(output_columns(keys, output_name), rows))
}

fn aggregate<'a>(
    values: impl Iterator<Item = &'a Value>,
    func: AggFunc,
    column: &str,
) -> TransformResult<Value> {
    let mut present = values.filter(|v| !v.is_null());
    match func {
        AggFunc::Count => Ok(Value::Int(present.count() as i64)),
        AggFunc::Min => Ok(present.min().cloned().unwrap_or_default()),
        AggFunc::Max => Ok(present.max().cloned().unwrap_or_default()),
        AggFunc::Sum | AggFunc::Mean => {
            let mut sum = NumericSum::default();
            if let Some(text) = present.find(|v| !sum.add(v)) {
                return Err(TransformError::validation(format!(
                    "cannot {func} non-numeric value `{text}` in column `{column}`"
                )));
            }
            Ok(if func == AggFunc::Sum {
                sum.total()
            } else {
                sum.mean()
            })
        }
    }
}
