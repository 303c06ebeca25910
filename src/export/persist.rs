//! Saving finished documents
//!
//! Writes are atomic: the payload goes to a temp file in the target directory
//! which is then renamed over the final name, so a failed save never leaves a
//! truncated PDF behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ReportError, ReportResult};

/// Delivers a finished document somewhere the user can get at it
pub trait Persist {
    /// Save `bytes` under `filename`, returning where it landed
    fn save(&self, filename: &str, bytes: &[u8]) -> ReportResult<PathBuf>;
}

/// Saves documents into a directory
#[derive(Debug, Clone)]
pub struct DirectoryPersist {
    dir: PathBuf,
}

impl DirectoryPersist {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Persist for DirectoryPersist {
    fn save(&self, filename: &str, bytes: &[u8]) -> ReportResult<PathBuf> {
        if filename.is_empty() || filename.contains(|c: char| c == '/' || c == '\\') {
            return Err(ReportError::Persist(format!(
                "invalid file name: {:?}",
                filename
            )));
        }

        let path = self.dir.join(filename);
        write_bytes_atomic(&path, bytes)?;
        Ok(path)
    }
}

/// Write bytes to a file atomically (write to temp, then rename)
pub fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> ReportResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ReportError::Persist(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file lives next to the target so the rename stays on one filesystem
    let temp_path = path.with_extension("pdf.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| ReportError::Persist(format!("Failed to create temp file: {}", e)))?;

    let result = write_and_sync(file, bytes)
        .and_then(|()| {
            fs::rename(&temp_path, path)
                .map_err(|e| ReportError::Persist(format!("Failed to rename temp file: {}", e)))
        });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn write_and_sync(file: File, bytes: &[u8]) -> ReportResult<()> {
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .map_err(|e| ReportError::Persist(format!("Failed to write document: {}", e)))?;

    writer
        .flush()
        .map_err(|e| ReportError::Persist(format!("Failed to flush document: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| ReportError::Persist(format!("Failed to sync document: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_into_directory() {
        let temp_dir = TempDir::new().unwrap();
        let persist = DirectoryPersist::new(temp_dir.path().join("out"));

        let path = persist.save("report.pdf", b"%PDF-1.5 test").unwrap();

        assert_eq!(path, temp_dir.path().join("out").join("report.pdf"));
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.5 test");
        assert!(!path.with_extension("pdf.tmp").exists());
    }

    #[test]
    fn test_save_overwrites_same_name() {
        let temp_dir = TempDir::new().unwrap();
        let persist = DirectoryPersist::new(temp_dir.path());

        persist.save("report.pdf", b"first").unwrap();
        let path = persist.save("report.pdf", b"second").unwrap();

        assert_eq!(fs::read(path).unwrap(), b"second");
    }

    #[test]
    fn test_rejects_path_in_filename() {
        let temp_dir = TempDir::new().unwrap();
        let persist = DirectoryPersist::new(temp_dir.path());

        let err = persist.save("../escape.pdf", b"x").unwrap_err();
        assert!(matches!(err, ReportError::Persist(_)));
    }

    #[test]
    fn test_failed_save_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        // A non-empty directory in the way makes the final rename fail
        let target = temp_dir.path().join("report.pdf");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), b"x").unwrap();

        let err = write_bytes_atomic(&target, b"%PDF-1.5").unwrap_err();

        assert!(matches!(err, ReportError::Persist(_)));
        assert!(!target.with_extension("pdf.tmp").exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_failure_is_persist_error() {
        let full = File::create("/dev/full").unwrap();
        let err = write_and_sync(full, &[0u8; 16]).unwrap_err();
        assert!(matches!(err, ReportError::Persist(_)));
    }

    #[test]
    fn test_unwritable_directory_is_persist_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, b"not a directory").unwrap();

        let persist = DirectoryPersist::new(&blocker);
        let err = persist.save("report.pdf", b"x").unwrap_err();
        assert!(matches!(err, ReportError::Persist(_)));
    }
}
