//! Versioned output: every run keeps a timestamped copy and refreshes a `latest` copy.
//!
//! ```text
//! <output_root>/
//!   latest.<ext>
//!   versions/
//!     v_20240102_030405.<ext>
//!     v_20240102_030405_1.<ext>   second write within the same second
//! ```

use crate::error::IoResult;
use crate::format::OutputFormat;
use crate::write::{atomic_write, render};
use chrono::{Local, NaiveDateTime};
use rollup_sql::Table;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const VERSIONS_DIR: &str = "versions";
pub const LATEST_STEM: &str = "latest";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionedOutput {
    pub version_path: PathBuf,
    pub latest_path: PathBuf,
}

/// [`write_versioned_at`] stamped with the current local time.
pub fn write_versioned(
    table: &Table,
    output_root: impl AsRef<Path>,
    format: OutputFormat,
) -> IoResult<VersionedOutput> {
    write_versioned_at(table, output_root, format, Local::now().naive_local())
}

/// Write `versions/v_<YYYYMMDD_HHMMSS>.<ext>` under `output_root`, then overwrite
/// `latest.<ext>` with the same bytes.
///
/// An existing version file is never overwritten: a `_1`, `_2`, ... suffix is added instead. The
/// version is written under a temporary name and only takes its final name once complete.
pub fn write_versioned_at(
    table: &Table,
    output_root: impl AsRef<Path>,
    format: OutputFormat,
    timestamp: NaiveDateTime,
) -> IoResult<VersionedOutput> {
    let output_root = output_root.as_ref();
    let versions_dir = output_root.join(VERSIONS_DIR);
    fs::create_dir_all(&versions_dir)?;

    let bytes = render(table, format)?;

    let stem = timestamp.format("v_%Y%m%d_%H%M%S").to_string();
    let version_path = persist_version(&versions_dir, &stem, format.extension(), &bytes)?;

    let latest_path = output_root.join(format!("{LATEST_STEM}.{}", format.extension()));
    atomic_write(&latest_path, &bytes)?;

    log::info!(
        "saved {} rows to {} (latest: {})",
        table.row_count(),
        version_path.display(),
        latest_path.display()
    );
    Ok(VersionedOutput {
        version_path,
        latest_path,
    })
}

/// Write `bytes` to a temp file in `dir`, then move it to the first free
/// `<stem>[_<n>].<extension>` name. A failed write leaves no version file behind.
fn persist_version(dir: &Path, stem: &str, extension: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    let mut attempt = 0u32;
    loop {
        let path = dir.join(version_file_name(stem, attempt, extension));
        match tmp.persist_noclobber(&path) {
            Ok(_) => return Ok(path),
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                tmp = err.file;
                attempt += 1;
            }
            Err(err) => return Err(err.error),
        }
    }
}

fn version_file_name(stem: &str, attempt: u32, extension: &str) -> String {
    if attempt == 0 {
        format!("{stem}.{extension}")
    } else {
        format!("{stem}_{attempt}.{extension}")
    }
}
