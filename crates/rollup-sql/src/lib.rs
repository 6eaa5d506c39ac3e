//! SQL-style relational operations over small in-memory tables.
//!
//! Every operation takes one or two [`Table`]s plus literal parameters and returns a new
//! [`Table`]; nothing here performs I/O or mutates a caller's table. The operations are meant to
//! be chained in a fixed order by a pipeline:
//!
//! ```text
//! coerce_numeric -> join -> filter -> select -> group_count -> classify -> pivot
//!     -> rollup + concat -> order_rollup
//! ```
//!
//! Column names are expected to be normalized (see [`normalize_column_name`]) before any
//! operation runs.

#![forbid(unsafe_code)]

mod classify;
mod coerce;
mod error;
mod filter;
mod group;
mod join;
mod pivot;
mod rollup;
mod select;
mod table;
mod value;

pub use crate::classify::{classify, label_for};
pub use crate::coerce::{coerce_numeric, parse_numeric, parse_numeric_text};
pub use crate::error::{TransformError, TransformResult};
pub use crate::filter::{filter, FilterOp};
pub use crate::group::{group_agg, group_count, AggFunc};
pub use crate::join::{join, JoinKind};
pub use crate::pivot::{pivot, GRAND_TOTAL_COLUMN};
pub use crate::rollup::{order_rollup, rollup, with_rollup, RollupLabels};
pub use crate::select::select;
pub use crate::table::{normalize_column_name, Table};
pub use crate::value::Value;
