use crate::delimited::write_csv;
use crate::error::IoResult;
use crate::format::OutputFormat;
use rollup_sql::Table;
use rust_xlsxwriter::{ColNum, RowNum, Workbook, XlsxError};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Serialize `table` to bytes in `format`.
pub fn render(table: &Table, format: OutputFormat) -> IoResult<Vec<u8>> {
    match format {
        OutputFormat::Xlsx => render_xlsx(table),
        OutputFormat::Csv => {
            let mut out = Vec::new();
            write_csv(table, &mut out)?;
            Ok(out)
        }
    }
}

/// Write `table` to `path`, replacing any existing file.
///
/// The file is written next to its destination and renamed into place, so readers never observe
/// a half-written table.
pub fn write_table(table: &Table, path: impl AsRef<Path>, format: OutputFormat) -> IoResult<()> {
    let bytes = render(table, format)?;
    atomic_write(path.as_ref(), &bytes)
}

fn render_xlsx(table: &Table) -> IoResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string(0, col_num(col)?, name)?;
    }
    for (idx, row) in table.rows().iter().enumerate() {
        let row_num = RowNum::try_from(idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, value) in row.iter().enumerate() {
            let col = col_num(col)?;
            if let Some(number) = value.as_f64() {
                worksheet.write_number(row_num, col, number)?;
            } else if let Some(text) = value.as_text() {
                worksheet.write_string(row_num, col, text)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn col_num(col: usize) -> Result<ColNum, XlsxError> {
    ColNum::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}

pub(crate) fn atomic_write(dest: &Path, bytes: &[u8]) -> IoResult<()> {
    // `Path::parent` is `Some("")` for bare file names.
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|err| err.error)?;
    Ok(())
}
