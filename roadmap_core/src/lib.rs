#![forbid(unsafe_code)]

//! Core domain model and business logic for the Manabi adaptive roadmap.
//!
//! This crate provides:
//! - Domain types (topics, edges, mastery records, attempts)
//! - Mastery classification and lock evaluation
//! - Topological sequencing with dynamic urgency ordering
//! - The answer-session state machine
//! - Persistence (attempt WAL, CSV archive, learner state)
//!
//! Sequencing and classification are pure functions: safe to call
//! concurrently for different learners, recomputed on demand by callers.

pub mod types;
pub mod error;
pub mod mastery;
pub mod graph;
pub mod sequence;
pub mod session;
pub mod curriculum;
pub mod config;
pub mod logging;
pub mod state;
pub mod overrides;
pub mod attempts;
pub mod csv_rollup;
pub mod history;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use mastery::{build_progress_map, is_due, mastery_rank, synthesized_mastery};
pub use graph::PrereqGraph;
pub use sequence::sequence;
pub use session::{
    CompletionReason, FinalResult, Phase, Session, SessionLimits, SessionSnapshot,
};
pub use curriculum::{build_default_curriculum, get_default_curriculum};
pub use config::Config;
pub use attempts::{AttemptSink, JsonlSink};
pub use overrides::load_manual_overrides;
pub use history::load_recent_attempts;
