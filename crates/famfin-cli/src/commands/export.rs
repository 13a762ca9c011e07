//! Export and restore command implementations

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use famfin_core::db::Database;
use famfin_core::export::{ExportLocale, ExportService};

/// Output path meaning "write to stdout"
pub const STDOUT_PATH: &str = "-";

/// `family_finance_export_<YYYYmmdd_HHMMSS>.csv` in the current directory
pub fn default_export_path() -> PathBuf {
    PathBuf::from(format!(
        "family_finance_export_{}.csv",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Export every transaction; returns the number of rows written
pub fn cmd_export(db: &Database, output: Option<&Path>, locale: ExportLocale) -> Result<usize> {
    let service = ExportService::new(db);

    if output == Some(Path::new(STDOUT_PATH)) {
        let stdout = io::stdout();
        return Ok(service.export_csv_to_writer(stdout.lock(), locale)?);
    }

    let path = output.map(Path::to_path_buf).unwrap_or_else(default_export_path);
    let rows = service
        .export_csv(&path, locale)
        .with_context(|| format!("Failed to export to {}", path.display()))?;

    println!("✅ Exported {} transactions to {}", rows, path.display());

    Ok(rows)
}

/// Restore transactions from an export file; returns the number inserted
pub fn cmd_import(db: &Database, file: &Path) -> Result<usize> {
    println!("📥 Restoring transactions from {}...", file.display());

    let inserted = ExportService::new(db)
        .import_csv(file)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    println!("✅ Restored {} transactions.", inserted);

    Ok(inserted)
}
