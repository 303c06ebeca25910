//! Append-only export history log
//!
//! Each record is written as a single JSON line and flushed immediately.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{ReportError, ReportResult};

use super::entry::ExportRecord;

/// Reads and appends export records in `exports.log`
pub struct ExportHistory {
    log_path: PathBuf,
}

impl ExportHistory {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append a record to the log
    pub fn log(&self, record: &ExportRecord) -> ReportResult<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ReportError::Io(format!("Failed to create history directory: {}", e))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| ReportError::Io(format!("Failed to open export history: {}", e)))?;

        let json = serde_json::to_string(record)
            .map_err(|e| ReportError::Json(format!("Failed to serialize export record: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| ReportError::Io(format!("Failed to write export record: {}", e)))?;

        file.flush()
            .map_err(|e| ReportError::Io(format!("Failed to flush export history: {}", e)))?;

        Ok(())
    }

    /// All records, oldest first
    pub fn read_all(&self) -> ReportResult<Vec<ExportRecord>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| ReportError::Io(format!("Failed to open export history: {}", e)))?;

        let mut records = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                ReportError::Io(format!(
                    "Failed to read export history line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let record: ExportRecord = serde_json::from_str(&line).map_err(|e| {
                ReportError::Json(format!(
                    "Failed to parse export record at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            records.push(record);
        }

        Ok(records)
    }

    /// The most recent `count` records, oldest first
    pub fn read_recent(&self, count: usize) -> ReportResult<Vec<ExportRecord>> {
        let mut all = self.read_all()?;
        let start = all.len().saturating_sub(count);
        Ok(all.split_off(start))
    }

    pub fn entry_count(&self) -> ReportResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| ReportError::Io(format!("Failed to open export history: {}", e)))?;

        let count = BufReader::new(file)
            .lines()
            .filter_map(Result::ok)
            .filter(|l| !l.trim().is_empty())
            .count();

        Ok(count)
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}
