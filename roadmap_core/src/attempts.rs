//! Write-Ahead Log (WAL) for attempt persistence.
//!
//! Graded answers are appended to a JSONL (JSON Lines) file with file
//! locking to ensure safe concurrent access.

use crate::{AttemptRecord, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Attempt sink trait for persisting graded answers
pub trait AttemptSink {
    fn append(&mut self, attempt: &AttemptRecord) -> Result<()>;
}

/// JSONL-based attempt sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl AttemptSink for JsonlSink {
    fn append(&mut self, attempt: &AttemptRecord) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(attempt)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended attempt {} to WAL", attempt.id);
        Ok(())
    }
}

/// Read all attempts from a WAL file
///
/// Corrupt lines are skipped with a warning; one bad record must not
/// hide the rest of the log.
pub fn read_attempts(path: &Path) -> Result<Vec<AttemptRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut attempts = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<AttemptRecord>(&line) {
            Ok(attempt) => attempts.push(attempt),
            Err(e) => {
                tracing::warn!("Failed to parse attempt at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} attempts from WAL", attempts.len());
    Ok(attempts)
}
