use crate::error::{TransformError, TransformResult};
use crate::table::Table;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    #[serde(alias = "outer")]
    Full,
}

impl FromStr for JoinKind {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inner" => Ok(JoinKind::Inner),
            "left" => Ok(JoinKind::Left),
            "right" => Ok(JoinKind::Right),
            "outer" | "full" => Ok(JoinKind::Full),
            _ => Err(TransformError::validation(format!(
                "unknown join kind `{s}`: expected inner, left, right or outer"
            ))),
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinKind::Inner => "inner",
            JoinKind::Left => "left",
            JoinKind::Right => "right",
            JoinKind::Full => "outer",
        })
    }
}

/// Where an output column takes its value from.
#[derive(Clone, Copy, Debug)]
enum Source {
    /// The `n`th key column: left value if the left row exists, otherwise the right one.
    Key(usize),
    Left(usize),
    Right(usize),
}

struct Layout {
    columns: Vec<String>,
    sources: Vec<Source>,
    left_keys: Vec<usize>,
    right_keys: Vec<usize>,
}

fn layout<S: AsRef<str>>(left: &Table, right: &Table, keys: &[S]) -> TransformResult<Layout> {
    if keys.is_empty() {
        return Err(TransformError::validation("join requires at least one key column"));
    }
    let key_names: Vec<&str> = keys.iter().map(AsRef::as_ref).collect();
    let unique: HashSet<&str> = key_names.iter().copied().collect();
    if unique.len() != key_names.len() {
        return Err(TransformError::validation(format!(
            "join key columns must be distinct: {key_names:?}"
        )));
    }

    let left_keys = left.require_columns(&key_names)?;
    let right_keys = right.require_columns(&key_names)?;

    let overlaps = |name: &str, other: &Table| !unique.contains(name) && other.has_column(name);

    let mut columns = Vec::with_capacity(left.columns().len() + right.columns().len());
    let mut sources = Vec::with_capacity(columns.capacity());
    for (idx, name) in left.columns().iter().enumerate() {
        if let Some(pos) = key_names.iter().position(|k| *k == name.as_str()) {
            columns.push(name.clone());
            sources.push(Source::Key(pos));
        } else if overlaps(name, right) {
            columns.push(format!("{name}_x"));
            sources.push(Source::Left(idx));
        } else {
            columns.push(name.clone());
            sources.push(Source::Left(idx));
        }
    }
    for (idx, name) in right.columns().iter().enumerate() {
        if unique.contains(name.as_str()) {
            continue;
        }
        if overlaps(name, left) {
            columns.push(format!("{name}_y"));
        } else {
            columns.push(name.clone());
        }
        sources.push(Source::Right(idx));
    }

    let mut seen = HashSet::with_capacity(columns.len());
    for column in &columns {
        if !seen.insert(column.as_str()) {
            return Err(TransformError::validation(format!(
                "join would produce duplicate column `{column}`"
            )));
        }
    }

    Ok(Layout {
        columns,
        sources,
        left_keys,
        right_keys,
    })
}

fn key_of(row: &[Value], key_idxs: &[usize]) -> Vec<Value> {
    key_idxs.iter().map(|&idx| row[idx].clone()).collect()
}

fn index_rows(table: &Table, key_idxs: &[usize]) -> HashMap<Vec<Value>, Vec<usize>> {
    let mut index: HashMap<Vec<Value>, Vec<usize>> = HashMap::new();
    for (row_idx, row) in table.rows().iter().enumerate() {
        index.entry(key_of(row, key_idxs)).or_default().push(row_idx);
    }
    index
}

impl Layout {
    fn combine(&self, left: Option<&[Value]>, right: Option<&[Value]>) -> Vec<Value> {
        self.sources
            .iter()
            .map(|source| match *source {
                Source::Key(pos) => match (left, right) {
                    (Some(l), _) => l[self.left_keys[pos]].clone(),
                    (None, Some(r)) => r[self.right_keys[pos]].clone(),
                    (None, None) => Value::Null,
                },
                Source::Left(idx) => left.map(|l| l[idx].clone()).unwrap_or_default(),
                Source::Right(idx) => right.map(|r| r[idx].clone()).unwrap_or_default(),
            })
            .collect()
    }
}

/// Relational join of `left` and `right` on equal values of `keys`.
///
/// Duplicate keys produce the full cross product of matching rows. Key columns appear once, in
/// their left-hand position; other columns present on both sides get `_x` / `_y` suffixes.
/// Missing keys match each other.
pub fn join<S: AsRef<str>>(
    left: &Table,
    right: &Table,
    keys: &[S],
    kind: JoinKind,
) -> TransformResult<Table> {
    let layout = layout(left, right, keys)?;
    let mut rows: Vec<Vec<Value>> = Vec::new();

    match kind {
        JoinKind::Inner | JoinKind::Left | JoinKind::Full => {
            let right_index = index_rows(right, &layout.right_keys);
            let mut right_matched = vec![false; right.row_count()];

            for l in left.rows() {
                let l = l.as_slice();
                match right_index.get(&key_of(l, &layout.left_keys)) {
                    Some(matches) => {
                        for &r in matches {
                            right_matched[r] = true;
                            let r = right.rows()[r].as_slice();
                            rows.push(layout.combine(Some(l), Some(r)));
                        }
                    }
                    None if kind != JoinKind::Inner => rows.push(layout.combine(Some(l), None)),
                    None => {}
                }
            }

            if kind == JoinKind::Full {
                for (r, matched) in right.rows().iter().zip(right_matched) {
                    if !matched {
                        rows.push(layout.combine(None, Some(r.as_slice())));
                    }
                }
            }
        }
        JoinKind::Right => {
            let left_index = index_rows(left, &layout.left_keys);
            for r in right.rows() {
                let r = r.as_slice();
                match left_index.get(&key_of(r, &layout.right_keys)) {
                    Some(matches) => {
                        for &l in matches {
                            let l = left.rows()[l].as_slice();
                            rows.push(layout.combine(Some(l), Some(r)));
                        }
                    }
                    None => rows.push(layout.combine(None, Some(r))),
                }
            }
        }
    }

    log::debug!(
        "join ({kind}): {} x {} rows -> {} rows",
        left.row_count(),
        right.row_count(),
        rows.len()
    );
    Ok(Table::from_parts(layout.columns, rows))
}
