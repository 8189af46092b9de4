//! ledgerlift-export: write the included ledger's row projection to disk.

pub mod delimited;
pub mod error;
pub mod xlsx;

use chrono::NaiveDate;
use ledgerlift_core::{export_filename, ExportSheet, Transaction};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use delimited::write_csv;
pub use error::{ExportError, Result};
pub use xlsx::write_xlsx;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Project `ledger` and write `Bank_Statement_<today>.<ext>` into `out_dir`.
///
/// An empty ledger is not written.
pub fn export_ledger(
    ledger: &[Transaction],
    format: ExportFormat,
    out_dir: &Path,
    today: NaiveDate,
) -> Result<PathBuf> {
    if ledger.is_empty() {
        return Err(ExportError::EmptyLedger);
    }

    let sheet = ExportSheet::from_ledger(ledger);
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(export_filename(today, format.extension()));

    match format {
        ExportFormat::Xlsx => write_xlsx(&sheet, &path)?,
        ExportFormat::Csv => write_csv(&sheet, &path)?,
    }

    tracing::info!(path = %path.display(), rows = sheet.rows.len(), "wrote export");
    Ok(path)
}
