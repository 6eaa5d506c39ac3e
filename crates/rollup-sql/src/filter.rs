use crate::error::{TransformError, TransformResult};
use crate::table::Table;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison operator accepted by [`filter`].
///
/// The set is closed; the textual forms are exactly `>=`, `<=`, `>`, `<`, `==` and `!=`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FilterOp {
    GreaterEquals,
    LessEquals,
    Greater,
    Less,
    Equals,
    NotEquals,
}

impl FilterOp {
    pub const ALL: [FilterOp; 6] = [
        FilterOp::GreaterEquals,
        FilterOp::LessEquals,
        FilterOp::Greater,
        FilterOp::Less,
        FilterOp::Equals,
        FilterOp::NotEquals,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            FilterOp::GreaterEquals => ">=",
            FilterOp::LessEquals => "<=",
            FilterOp::Greater => ">",
            FilterOp::Less => "<",
            FilterOp::Equals => "==",
            FilterOp::NotEquals => "!=",
        }
    }

    /// Evaluate `cell <op> target`.
    ///
    /// Numbers compare numerically and text lexically. A null on either side, or a number
    /// compared with text, has no ordering: only `!=` holds.
    pub fn matches(self, cell: &Value, target: &Value) -> bool {
        let ordering = match (cell, target) {
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::Text(a), Value::Text(b)) => Some(a.as_ref().cmp(b.as_ref())),
            (Value::Text(_), _) | (_, Value::Text(_)) => None,
            _ => Some(cell.cmp(target)),
        };

        let Some(ordering) = ordering else {
            return self == FilterOp::NotEquals;
        };
        match self {
            FilterOp::GreaterEquals => ordering != Ordering::Less,
            FilterOp::LessEquals => ordering != Ordering::Greater,
            FilterOp::Greater => ordering == Ordering::Greater,
            FilterOp::Less => ordering == Ordering::Less,
            FilterOp::Equals => ordering == Ordering::Equal,
            FilterOp::NotEquals => ordering != Ordering::Equal,
        }
    }
}

impl FromStr for FilterOp {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterOp::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| TransformError::InvalidOperator(s.to_string()))
    }
}

impl TryFrom<String> for FilterOp {
    type Error = TransformError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FilterOp> for String {
    fn from(op: FilterOp) -> Self {
        op.symbol().to_string()
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Keep the rows where `row[column] <op> value`, in their original order.
pub fn filter(table: &Table, column: &str, op: FilterOp, value: &Value) -> TransformResult<Table> {
    let idx = table.require_column(column)?;
    let rows: Vec<Vec<Value>> = table
        .rows()
        .iter()
        .filter(|row| op.matches(&row[idx], value))
        .cloned()
        .collect();

    log::debug!(
        "filter `{column}` {op} {value}: {} -> {} rows",
        table.row_count(),
        rows.len()
    );
    Ok(Table::from_parts(table.columns().to_vec(), rows))
}
