//! Manual mastery override loader.
//!
//! An instructor (or the learner's own profile) can flag topics as
//! mastered outside the SRS pipeline. The flags arrive as a JSON file;
//! a missing or malformed file means no overrides, never a failure.

use crate::{Result, TopicId};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Override file format (matches the external profile export)
#[derive(Debug, Deserialize)]
struct OverrideFile {
    mastered_topic_ids: Vec<String>,
    #[allow(dead_code)]
    updated_at: Option<DateTime<Utc>>,
}

/// Load manually-mastered topic ids from a JSON file
///
/// Returns an empty set if the file doesn't exist, can't be read, or
/// can't be parsed; the signal is advisory.
pub fn load_manual_overrides(path: &Path) -> Result<HashSet<TopicId>> {
    if !path.exists() {
        tracing::debug!("No override file found at {:?}", path);
        return Ok(HashSet::new());
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!(
                "Failed to read overrides at {:?}: {}. Ignoring signal.",
                path,
                e
            );
            return Ok(HashSet::new());
        }
    };

    let file: OverrideFile = match serde_json::from_str(&contents) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(
                "Failed to parse overrides at {:?}: {}. Ignoring signal.",
                path,
                e
            );
            return Ok(HashSet::new());
        }
    };

    let ids: HashSet<TopicId> = file
        .mastered_topic_ids
        .into_iter()
        .filter(|id| !id.trim().is_empty())
        .collect();

    tracing::info!("Loaded {} manual mastery overrides", ids.len());
    Ok(ids)
}
