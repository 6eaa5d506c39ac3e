use crate::error::{IoError, IoResult};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Source formats recognised by [`crate::read_table`], chosen by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    /// Anything calamine opens: `xls`, `xlsx`, `xlsm`, `xlsb`, `ods`.
    Excel,
    Parquet,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> IoResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(InputFormat::Csv),
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Ok(InputFormat::Excel),
            "parquet" => Ok(InputFormat::Parquet),
            _ => Err(IoError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Format of persisted output tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(IoError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
