//! Attempt history loading with a recency window.
//!
//! Merges recent attempts from both the WAL and the CSV archive so
//! callers see one view regardless of rollup timing.

use crate::{AttemptRecord, Result, SessionMode, TopicId};
use chrono::{DateTime, Duration, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

/// CSV row format for reading archived attempts
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    topic_id: String,
    mode: String,
    is_correct: bool,
    srs_event: bool,
    answered_at: String,
}

impl TryFrom<CsvRow> for AttemptRecord {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| crate::Error::Other(format!("Invalid UUID: {}", e)))?;

        let answered_at = DateTime::parse_from_rfc3339(&row.answered_at)
            .map_err(|e| crate::Error::Other(format!("Invalid date: {}", e)))?
            .with_timezone(&Utc);

        let mode = match row.mode.as_str() {
            "practice" => SessionMode::Practice,
            "review" => SessionMode::Review,
            "final" => SessionMode::Final,
            other => {
                return Err(crate::Error::Other(format!(
                    "Unknown session mode '{}'",
                    other
                )))
            }
        };

        Ok(AttemptRecord {
            id,
            topic_id: row.topic_id,
            mode,
            is_correct: row.is_correct,
            srs_event: row.srs_event,
            answered_at,
        })
    }
}

/// Load attempts from the last N days from both WAL and CSV
///
/// Returns attempts sorted by answered_at (newest first). Attempts that
/// appear in both WAL and CSV are deduplicated by id.
pub fn load_recent_attempts(
    wal_path: &Path,
    csv_path: &Path,
    days: i64,
) -> Result<Vec<AttemptRecord>> {
    let cutoff = Utc::now() - Duration::days(days);
    let mut attempts = Vec::new();
    let mut seen_ids = HashSet::new();

    // WAL first (most recent)
    if wal_path.exists() {
        let wal_attempts = crate::attempts::read_attempts(wal_path)?;
        for attempt in wal_attempts {
            if attempt.answered_at >= cutoff {
                seen_ids.insert(attempt.id);
                attempts.push(attempt);
            }
        }
        tracing::debug!("Loaded {} attempts from WAL", attempts.len());
    }

    // Then the CSV archive
    if csv_path.exists() {
        let csv_attempts = load_attempts_from_csv(csv_path)?;
        let mut csv_count = 0;
        for attempt in csv_attempts {
            if attempt.answered_at >= cutoff && !seen_ids.contains(&attempt.id) {
                seen_ids.insert(attempt.id);
                attempts.push(attempt);
                csv_count += 1;
            }
        }
        tracing::debug!("Loaded {} attempts from CSV", csv_count);
    }

    attempts.sort_by(|a, b| b.answered_at.cmp(&a.answered_at));

    tracing::info!(
        "Loaded {} total attempts from last {} days",
        attempts.len(),
        days
    );

    Ok(attempts)
}

/// Load all attempts from a CSV file
fn load_attempts_from_csv(path: &Path) -> Result<Vec<AttemptRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut attempts = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match AttemptRecord::try_from(row) {
                Ok(attempt) => attempts.push(attempt),
                Err(e) => {
                    tracing::warn!("Failed to parse CSV row: {}", e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row: {}", e);
            }
        }
    }

    Ok(attempts)
}

/// Find the most recent attempt for a given topic
pub fn find_last_attempt_for_topic<'a>(
    attempts: &'a [AttemptRecord],
    topic_id: &str,
) -> Option<&'a AttemptRecord> {
    // Attempts should already be sorted newest first
    attempts.iter().find(|a| a.topic_id == topic_id)
}

/// Count of attempts per topic id over the given slice
pub fn attempt_counts(attempts: &[AttemptRecord]) -> Vec<(TopicId, usize)> {
    let mut counts: Vec<(TopicId, usize)> = Vec::new();
    for attempt in attempts {
        match counts.iter_mut().find(|(id, _)| id == &attempt.topic_id) {
            Some((_, n)) => *n += 1,
            None => counts.push((attempt.topic_id.clone(), 1)),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attempts::AttemptSink;

    fn create_test_attempt(topic: &str, days_ago: i64) -> AttemptRecord {
        AttemptRecord {
            id: Uuid::new_v4(),
            topic_id: topic.into(),
            mode: SessionMode::Review,
            is_correct: true,
            srs_event: false,
            answered_at: Utc::now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_load_recent_attempts_from_wal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("attempts.wal");
        let csv_path = temp_dir.path().join("attempts.csv");

        let mut sink = crate::attempts::JsonlSink::new(&wal_path);
        sink.append(&create_test_attempt("quad_solve_basic", 1))
            .unwrap();
        sink.append(&create_test_attempt("prob_basic", 3)).unwrap();
        sink.append(&create_test_attempt("combi_basic", 10)).unwrap(); // Too old

        let attempts = load_recent_attempts(&wal_path, &csv_path, 7).unwrap();
        assert_eq!(attempts.len(), 2);
    }

    #[test]
    fn test_deduplication_across_wal_and_csv() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("attempts.wal");
        let csv_path = temp_dir.path().join("attempts.csv");

        let attempt = create_test_attempt("quad_solve_basic", 1);
        let attempt_id = attempt.id;
        let mut sink = crate::attempts::JsonlSink::new(&wal_path);
        sink.append(&attempt).unwrap();

        crate::csv_rollup::wal_to_csv_and_archive(&wal_path, &csv_path).unwrap();

        let attempts = load_recent_attempts(
            &temp_dir.path().join("nonexistent.wal"),
            &csv_path,
            7,
        )
        .unwrap();

        let count = attempts.iter().filter(|a| a.id == attempt_id).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_attempts_sorted_newest_first() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("attempts.wal");
        let csv_path = temp_dir.path().join("attempts.csv");

        let mut sink = crate::attempts::JsonlSink::new(&wal_path);
        sink.append(&create_test_attempt("old_topic", 5)).unwrap();
        sink.append(&create_test_attempt("new_topic", 1)).unwrap();

        let attempts = load_recent_attempts(&wal_path, &csv_path, 7).unwrap();

        assert_eq!(attempts[0].topic_id, "new_topic");
        assert_eq!(attempts[1].topic_id, "old_topic");
    }

    #[test]
    fn test_find_last_attempt_for_topic() {
        let a1 = create_test_attempt("quad_solve_basic", 3);
        let a2 = create_test_attempt("prob_basic", 2);
        let a3 = create_test_attempt("quad_solve_basic", 1);

        let attempts = vec![a3.clone(), a2, a1]; // Already sorted newest first

        let last = find_last_attempt_for_topic(&attempts, "quad_solve_basic");
        assert!(last.is_some());
        assert_eq!(last.unwrap().id, a3.id);
    }

    #[test]
    fn test_attempt_counts() {
        let attempts = vec![
            create_test_attempt("a", 1),
            create_test_attempt("b", 1),
            create_test_attempt("a", 2),
        ];

        let counts = attempt_counts(&attempts);
        assert!(counts.contains(&("a".to_string(), 2)));
        assert!(counts.contains(&("b".to_string(), 1)));
    }
}
