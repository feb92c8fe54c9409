//! CSV rollup functionality for archiving WAL attempts.
//!
//! Implements atomic WAL-to-CSV conversion with proper error handling to
//! prevent data loss.

use crate::{AttemptRecord, Result, SessionMode};
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    topic_id: String,
    mode: String,
    is_correct: bool,
    srs_event: bool,
    answered_at: String,
}

impl From<&AttemptRecord> for CsvRow {
    fn from(attempt: &AttemptRecord) -> Self {
        CsvRow {
            id: attempt.id.to_string(),
            topic_id: attempt.topic_id.clone(),
            mode: mode_str(attempt.mode).to_string(),
            is_correct: attempt.is_correct,
            srs_event: attempt.srs_event,
            answered_at: attempt.answered_at.to_rfc3339(),
        }
    }
}

pub(crate) fn mode_str(mode: SessionMode) -> &'static str {
    match mode {
        SessionMode::Practice => "practice",
        SessionMode::Review => "review",
        SessionMode::Final => "final",
    }
}

/// Roll up WAL attempts into CSV and archive the WAL atomically
///
/// This function:
/// 1. Reads all attempts from the WAL
/// 2. Appends them to the CSV file (creates with headers if needed)
/// 3. Syncs the CSV to disk
/// 4. Renames the WAL to .processed
/// 5. Returns the number of attempts processed
///
/// # Safety
/// - CSV is fsynced before the WAL is renamed
/// - WAL is renamed (not deleted) to allow manual recovery if needed
pub fn wal_to_csv_and_archive(wal_path: &Path, csv_path: &Path) -> Result<usize> {
    let attempts = crate::attempts::read_attempts(wal_path)?;

    if attempts.is_empty() {
        tracing::info!("No attempts in WAL to roll up");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Write headers only on first write to the file
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for attempt in &attempts {
        let row = CsvRow::from(attempt);
        writer.serialize(row)?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} attempts to CSV", attempts.len());

    let processed_path = wal_path.with_extension("wal.processed");
    std::fs::rename(wal_path, &processed_path)?;

    tracing::info!("Archived WAL to {:?}", processed_path);

    Ok(attempts.len())
}

/// Clean up old processed WAL files
///
/// Removes all .wal.processed files in the given directory.
pub fn cleanup_processed_wals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(extension) = path.extension() {
            if extension == "processed" {
                std::fs::remove_file(&path)?;
                tracing::debug!("Removed processed WAL: {:?}", path);
                count += 1;
            }
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed WAL files", count);
    }

    Ok(count)
}
