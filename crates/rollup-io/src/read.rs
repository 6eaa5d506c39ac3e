use crate::delimited::{read_csv, CsvOptions};
use crate::error::IoResult;
use crate::excel::read_excel;
use crate::format::InputFormat;
use rollup_sql::{Table, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a table from `path`, picking the reader from the file extension, and normalize its
/// column names.
pub fn read_table(path: impl AsRef<Path>) -> IoResult<Table> {
    read_table_with(path, &CsvOptions::default())
}

/// [`read_table`] with explicit settings for delimited files. Other formats ignore `csv`.
pub fn read_table_with(path: impl AsRef<Path>, csv: &CsvOptions) -> IoResult<Table> {
    let path = path.as_ref();
    let table = match InputFormat::from_path(path)? {
        InputFormat::Csv => read_csv(BufReader::new(File::open(path)?), csv)?,
        InputFormat::Excel => read_excel(path)?,
        InputFormat::Parquet => read_parquet(path)?,
    };
    let table = table.normalize_columns()?;
    log::info!(
        "loaded {} ({} rows, {} columns)",
        path.display(),
        table.row_count(),
        table.columns().len()
    );
    Ok(table)
}

/// Text cells lose surrounding whitespace in every reader; blank text is missing.
pub(crate) fn text_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::from(trimmed)
    }
}

#[cfg(feature = "parquet")]
fn read_parquet(path: &Path) -> IoResult<Table> {
    crate::columnar::read_parquet(path)
}

#[cfg(not(feature = "parquet"))]
fn read_parquet(path: &Path) -> IoResult<Table> {
    Err(crate::error::IoError::UnsupportedFormat(format!(
        "{} (built without the `parquet` feature)",
        path.display()
    )))
}
