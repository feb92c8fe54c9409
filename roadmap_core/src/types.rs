//! Core domain types for the adaptive roadmap system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Topics, units, and prerequisite edges
//! - SRS-style mastery records and manual overrides
//! - Attempt records produced by answer sessions
//! - Answer payloads crossing the grading boundary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Opaque topic identifier (e.g. `quad_solve_basic`)
pub type TopicId = String;

// ============================================================================
// Curriculum Types
// ============================================================================

/// Curriculum unit a topic belongs to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Unit {
    Math1,
    MathA,
    Math2,
    MathB,
    MathC,
    Math3,
}

impl Unit {
    /// Human-readable label for roadmap display
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Math1 => "Mathematics I",
            Unit::MathA => "Mathematics A",
            Unit::Math2 => "Mathematics II",
            Unit::MathB => "Mathematics B",
            Unit::MathC => "Mathematics C",
            Unit::Math3 => "Mathematics III",
        }
    }
}

/// A curriculum topic. Content fields (title, problem templates) live in
/// external collaborators; the core only needs identity and grouping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub unit: Unit,
    pub section: Option<String>,
}

/// A prerequisite dependency: `to` depends on `from`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrerequisiteEdge {
    pub from: TopicId,
    pub to: TopicId,
}

/// The complete curriculum: topics in catalog (base) order plus the
/// prerequisite edge list
#[derive(Clone, Debug)]
pub struct Curriculum {
    pub topics: Vec<Topic>,
    pub edges: Vec<PrerequisiteEdge>,
}

impl Curriculum {
    /// Topic ids in catalog order (the sequencer's tie-break order)
    pub fn base_order(&self) -> Vec<TopicId> {
        self.topics.iter().map(|t| t.id.clone()).collect()
    }
}

// ============================================================================
// Mastery Types
// ============================================================================

/// Spaced-repetition bookkeeping for one topic.
///
/// The core consumes these records; it never computes the scheduling values.
/// An external scheduler owns `due_at`/`interval_days`/`ease_factor`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MasteryRecord {
    pub topic_id: TopicId,
    pub due_at: DateTime<Utc>,
    pub interval_days: i64,
    pub reps: i32,
    pub lapses: i32,
    #[serde(rename = "ef")]
    pub ease_factor: f64,
    pub updated_at: DateTime<Utc>,
}

/// Ordinal mastery classification for a topic
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MasteryRank {
    Unstarted,
    Weak,
    InProgress,
    Mastered,
}

impl MasteryRank {
    /// Human-readable label for roadmap display
    pub fn label(&self) -> &'static str {
        match self {
            MasteryRank::Unstarted => "not started",
            MasteryRank::Weak => "needs review",
            MasteryRank::InProgress => "in progress",
            MasteryRank::Mastered => "mastered",
        }
    }
}

/// The learner's persistent SRS snapshot, keyed by topic
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct LearnerState {
    pub records: HashMap<TopicId, MasteryRecord>,
}

// ============================================================================
// Sequencing Types
// ============================================================================

/// Everything the topological sequencer needs for one call.
///
/// `nodes` must not contain duplicates. Edges referencing ids outside
/// `nodes` are ignored. `base_order` defines the tie-break index.
#[derive(Clone, Debug)]
pub struct SequencingInput {
    pub nodes: Vec<TopicId>,
    pub edges: Vec<PrerequisiteEdge>,
    pub base_order: Vec<TopicId>,
    pub mastery: HashMap<TopicId, MasteryRecord>,
}

// ============================================================================
// Session and Attempt Types
// ============================================================================

/// Mode of an answer session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Practice,
    Review,
    Final,
}

/// A graded answer, persisted to the attempt log.
///
/// `srs_event` is set only on the answer that completes a Review session by
/// streak; the external SRS scheduler consumes exactly those events.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub id: Uuid,
    pub topic_id: TopicId,
    pub mode: SessionMode,
    pub is_correct: bool,
    pub srs_event: bool,
    pub answered_at: DateTime<Utc>,
}

/// A learner's answer, validated once at the boundary before any grading
/// or session logic sees it
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerPayload {
    /// Single free-form answer
    Single { value: String },
    /// Multi-part answer keyed by part id
    Multi { parts: HashMap<String, String> },
}

impl AnswerPayload {
    /// Validate the payload: every part present and non-blank
    pub fn validate(&self) -> crate::Result<()> {
        match self {
            AnswerPayload::Single { value } => {
                if value.trim().is_empty() {
                    return Err(crate::Error::Answer("empty answer".into()));
                }
            }
            AnswerPayload::Multi { parts } => {
                if parts.is_empty() {
                    return Err(crate::Error::Answer("no answer parts".into()));
                }
                for (part_id, value) in parts {
                    if value.trim().is_empty() {
                        return Err(crate::Error::Answer(format!(
                            "part '{}' is empty",
                            part_id
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
