//! Spreadsheet ingestion through calamine.
//!
//! Only the first worksheet is read. Its first used row is the header; every later row becomes a
//! table row of the same width.

use crate::error::{IoError, IoResult};
use crate::read::text_cell;
use calamine::{open_workbook_auto, Data, Reader};
use rollup_sql::{Table, Value};
use std::path::Path;

pub fn read_excel(path: &Path) -> IoResult<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        return Err(IoError::EmptyInput);
    };
    let range = range?;

    let mut rows = range.rows();
    let Some(header_cells) = rows.next() else {
        return Err(IoError::EmptyInput);
    };
    let header: Vec<String> = header_cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_name(cell, idx))
        .collect();

    let table = Table::with_rows(
        header,
        rows.map(|cells| cells.iter().map(convert_cell).collect::<Vec<_>>()),
    )?;
    log::debug!(
        "read {} spreadsheet rows over {} columns from {}",
        table.row_count(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

fn header_name(cell: &Data, idx: usize) -> String {
    let name = cell.to_string();
    let name = name.trim();
    if name.is_empty() {
        format!("Column{}", idx + 1)
    } else {
        name.to_string()
    }
}

fn convert_cell(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(v) => Value::Int(*v),
        Data::Float(v) => float_value(*v),
        Data::String(s) => text_cell(s),
        Data::Bool(true) => Value::from("TRUE"),
        Data::Bool(false) => Value::from("FALSE"),
        Data::DateTime(v) => float_value(v.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::from(s.as_str()),
    }
}

/// Spreadsheets store every number as a float; whole numbers come back as integers.
fn float_value(v: f64) -> Value {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if v.fract() == 0.0 && v.abs() <= MAX_EXACT {
        Value::Int(v as i64)
    } else {
        Value::from(v)
    }
}
