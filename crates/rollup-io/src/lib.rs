//! Getting tables in and out of files.
//!
//! Ingestion picks a reader from the file extension (CSV, any calamine-readable spreadsheet,
//! Parquet) and normalizes column names, so every table handed to `rollup-sql` is ready for the
//! relational operations. Persistence writes XLSX or CSV, either to a single path or as a
//! timestamped version plus a `latest` copy.

#![forbid(unsafe_code)]

#[cfg(feature = "parquet")]
mod columnar;
mod delimited;
mod error;
mod excel;
mod format;
mod read;
mod versioned;
mod write;

#[cfg(feature = "parquet")]
pub use crate::columnar::read_parquet;
pub use crate::delimited::{read_csv, write_csv, CsvOptions, CsvTextEncoding};
pub use crate::error::{IoError, IoResult};
pub use crate::excel::read_excel;
pub use crate::format::{InputFormat, OutputFormat};
pub use crate::read::{read_table, read_table_with};
pub use crate::versioned::{
    write_versioned, write_versioned_at, VersionedOutput, LATEST_STEM, VERSIONS_DIR,
};
pub use crate::write::{render, write_table};
