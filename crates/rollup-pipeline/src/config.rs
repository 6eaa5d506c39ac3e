use anyhow::Context;
use rollup_io::CsvOptions;
use rollup_sql::{
    classify, coerce_numeric, filter, group_agg, group_count, join, pivot, select, with_rollup,
    AggFunc, FilterOp, JoinKind, RollupLabels, Table, TransformError, TransformResult, Value,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A dataset pipeline: which files to read and the ordered steps that turn them into a report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub inputs: Inputs,
    pub steps: Vec<Step>,
}

/// Input files, relative to the raw-data directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inputs {
    /// The table every step starts from.
    pub primary: PathBuf,
    /// Right-hand side of `join` steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<PathBuf>,
    /// Reader settings applied to whichever inputs are delimited files.
    #[serde(default, skip_serializing_if = "is_default_csv")]
    pub csv: CsvOptions,
}

fn is_default_csv(options: &CsvOptions) -> bool {
    *options == CsvOptions::default()
}

/// One table-to-table operation.
///
/// Serialized with an `"op"` tag, e.g.
/// `{"op": "filter", "column": "Age", "operator": ">=", "value": 18}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    CoerceNumeric {
        column: String,
    },
    /// Join the current table (left) with the reference input (right).
    Join {
        keys: Vec<String>,
        #[serde(default)]
        kind: JoinKind,
    },
    Filter {
        column: String,
        operator: FilterOp,
        value: Value,
    },
    Select {
        columns: Vec<String>,
    },
    GroupCount {
        keys: Vec<String>,
        counter: String,
    },
    GroupAgg {
        keys: Vec<String>,
        output: String,
        column: String,
        func: AggFunc,
    },
    Classify {
        keep_columns: Vec<String>,
        value_column: String,
        ranges: Vec<(f64, f64)>,
        labels: Vec<String>,
        default_label: String,
        new_column: String,
    },
    Pivot {
        group_col_1: String,
        group_col_2: String,
        value_column: String,
        values: Vec<Value>,
    },
    /// Subtotals, grand total and canonical ordering in one step.
    Rollup {
        group_col_1: String,
        group_col_2: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total_label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        grand_label: Option<String>,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::CoerceNumeric { .. } => "coerce_numeric",
            Step::Join { .. } => "join",
            Step::Filter { .. } => "filter",
            Step::Select { .. } => "select",
            Step::GroupCount { .. } => "group_count",
            Step::GroupAgg { .. } => "group_agg",
            Step::Classify { .. } => "classify",
            Step::Pivot { .. } => "pivot",
            Step::Rollup { .. } => "rollup",
        }
    }

    pub fn apply(&self, table: &Table, reference: Option<&Table>) -> TransformResult<Table> {
        match self {
            Step::CoerceNumeric { column } => coerce_numeric(table, column),
            Step::Join { keys, kind } => {
                let reference = reference.ok_or_else(missing_reference)?;
                join(table, reference, keys, *kind)
            }
            Step::Filter {
                column,
                operator,
                value,
            } => filter(table, column, *operator, value),
            Step::Select { columns } => select(table, columns),
            Step::GroupCount { keys, counter } => group_count(table, keys, counter),
            Step::GroupAgg {
                keys,
                output,
                column,
                func,
            } => group_agg(table, keys, output, column, *func),
            Step::Classify {
                keep_columns,
                value_column,
                ranges,
                labels,
                default_label,
                new_column,
            } => classify(
                table,
                keep_columns,
                value_column,
                ranges,
                labels,
                default_label,
                new_column,
            ),
            Step::Pivot {
                group_col_1,
                group_col_2,
                value_column,
                values,
            } => pivot(table, group_col_1, group_col_2, value_column, values),
            Step::Rollup {
                group_col_1,
                group_col_2,
                total_label,
                grand_label,
            } => {
                let defaults = RollupLabels::default();
                let labels = RollupLabels::new(
                    total_label.clone().unwrap_or(defaults.total),
                    grand_label.clone().unwrap_or(defaults.grand_total),
                );
                with_rollup(table, group_col_1, group_col_2, &labels)
            }
        }
    }
}

fn missing_reference() -> TransformError {
    TransformError::Validation("join requires a reference input".to_string())
}

impl PipelineConfig {
    /// Check the parts of a config that do not depend on the data.
    pub fn validate(&self) -> TransformResult<()> {
        if self.steps.is_empty() {
            return Err(TransformError::Validation(format!(
                "pipeline `{}` has no steps",
                self.name
            )));
        }
        if self.inputs.reference.is_none()
            && self.steps.iter().any(|step| matches!(step, Step::Join { .. }))
        {
            return Err(missing_reference());
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: PipelineConfig =
            serde_json::from_str(json).context("parse pipeline config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read pipeline config {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("load {}", path.display()))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
