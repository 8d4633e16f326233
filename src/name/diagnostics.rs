use crate::placetype::Placetype;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Per-run CSV of `country,id,missing` rows, one per named record.
pub struct NameDiagnostics {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl NameDiagnostics {
    /// Truncates `<dir>/<layer>.csv`.
    pub fn create(dir: &Path, layer: Placetype) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.csv", layer));
        let file = File::create(&path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        Ok(NameDiagnostics { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&mut self, country: Option<&str>, id: i64, missing: bool) {
        let country = country.unwrap_or("??");
        let row = [country.to_string(), id.to_string(), missing.to_string()];
        if let Err(e) = self.writer.write_record(&row) {
            warn!(path = ?self.path, error = %e, "could not write name diagnostics");
        }
    }

    pub fn flush(&mut self) {
        if let Err(e) = self.writer.flush() {
            warn!(path = ?self.path, error = %e, "could not flush name diagnostics");
        }
    }
}
