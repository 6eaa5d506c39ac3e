use rollup_sql::TransformError;
use thiserror::Error;

pub type IoResult<T> = Result<T, IoError>;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("unsupported file format `{0}`: expected csv, xls, xlsx, xlsm, xlsb, ods or parquet")]
    UnsupportedFormat(String),
    #[error("input has no header row")]
    EmptyInput,
    #[error("csv error at row {row}: {reason}")]
    Csv { row: u64, reason: String },
    #[error("failed to read spreadsheet: {0}")]
    Excel(#[from] calamine::Error),
    #[cfg(feature = "parquet")]
    #[error("failed to read parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[cfg(feature = "parquet")]
    #[error("failed to decode arrow batch: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),
    #[error("column `{column}` has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },
    #[error("failed to write xlsx: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl IoError {
    /// Fold a `csv` error into [`IoError::Csv`], keeping plain I/O failures as [`IoError::Io`].
    pub(crate) fn from_csv(err: csv::Error, fallback_row: u64) -> Self {
        let reason = err.to_string();
        let position = err.position().cloned();
        match err.into_kind() {
            csv::ErrorKind::Io(err) => IoError::Io(err),
            _ => IoError::Csv {
                row: position
                    .map(|p| p.record())
                    .filter(|&r| r > 0)
                    .unwrap_or(fallback_row),
                reason,
            },
        }
    }
}
