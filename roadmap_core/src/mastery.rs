//! Mastery classification over SRS records.
//!
//! Pure functions mapping an optional mastery record to a rank and a due
//! flag. Missing records are a defined state (unstarted), never an error.

use crate::{MasteryRank, MasteryRecord, TopicId};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Interval written into synthesized records for manually-mastered topics
pub const OVERRIDE_INTERVAL_DAYS: i64 = 30;
/// Reps written into synthesized records for manually-mastered topics
pub const OVERRIDE_REPS: i32 = 4;
/// Ease factor written into synthesized records for manually-mastered topics
pub const OVERRIDE_EASE_FACTOR: f64 = 2.5;

/// Classify a record into a mastery rank.
///
/// Rule order is the contract: the lapses check short-circuits before the
/// mastered threshold, so a lapsed topic never classifies as mastered even
/// if its interval and reps otherwise qualify.
pub fn mastery_rank(record: Option<&MasteryRecord>) -> MasteryRank {
    let Some(r) = record else {
        return MasteryRank::Unstarted;
    };
    if r.reps <= 0 {
        return MasteryRank::Weak;
    }
    if r.lapses >= 3 {
        return MasteryRank::Weak;
    }
    if r.interval_days >= 14 && r.reps >= 3 {
        return MasteryRank::Mastered;
    }
    MasteryRank::InProgress
}

/// Whether a topic's scheduled review date has arrived. No record means
/// nothing is scheduled, so never due.
pub fn is_due(record: Option<&MasteryRecord>, now: DateTime<Utc>) -> bool {
    match record {
        Some(r) => r.due_at <= now,
        None => false,
    }
}

/// Synthesize a record for a topic flagged mastered outside the SRS
/// pipeline (instructor or self-report). The fixed values classify as
/// `Mastered` under [`mastery_rank`].
pub fn synthesized_mastery(topic_id: &str, now: DateTime<Utc>) -> MasteryRecord {
    MasteryRecord {
        topic_id: topic_id.to_string(),
        due_at: now,
        interval_days: OVERRIDE_INTERVAL_DAYS,
        reps: OVERRIDE_REPS,
        lapses: 0,
        ease_factor: OVERRIDE_EASE_FACTOR,
        updated_at: now,
    }
}

/// Merge real SRS records with manual mastery overrides into one progress
/// map. A real record always wins; overrides only fill topics with no
/// record yet.
pub fn build_progress_map(
    records: &HashMap<TopicId, MasteryRecord>,
    manual_mastered: &HashSet<TopicId>,
    now: DateTime<Utc>,
) -> HashMap<TopicId, MasteryRecord> {
    let mut map = records.clone();
    for id in manual_mastered {
        if !map.contains_key(id) {
            map.insert(id.clone(), synthesized_mastery(id, now));
        }
    }
    map
}
