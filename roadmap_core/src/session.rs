//! Answer-session state machine.
//!
//! Tracks one active question-answering session (practice / review /
//! final) and decides completion and pass outcomes. Question fetching and
//! grading are external collaborator calls; this machine only consumes
//! their results. A failed collaborator call simply never invokes a
//! transition, so a retry is always state-consistent.
//!
//! Phases: `Idle → Loaded → Graded → (Loaded | Complete)`. `Complete` is
//! terminal for Review and Final; Practice has no automatic terminal
//! state and is ended by the caller.

use crate::{Error, Result, SessionMode};
use serde::{Deserialize, Serialize};

/// Where the session currently is in its lifecycle
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No question in flight yet
    Idle,
    /// A question is presented and awaiting grading
    Loaded,
    /// The current question has been graded
    Graded,
    /// Terminal (Review/Final only)
    Complete,
}

/// Why a session completed
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// Review: target streak of consecutive correct answers reached
    Streak,
    /// Review: question cap reached without the streak
    Cap,
    /// Final: all questions answered
    FinalTotal,
}

/// Tunable limits for review and final sessions
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SessionLimits {
    /// Consecutive correct answers that complete a review session
    pub target_streak: u32,
    /// Review question cap so a struggling learner is never trapped
    pub max_questions: u32,
    /// Question count of a final exam
    pub final_total: u32,
    /// Minimum correct ratio to pass a final exam
    pub pass_rate: f64,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            target_streak: 3,
            max_questions: 10,
            final_total: 10,
            pass_rate: 0.7,
        }
    }
}

/// Outcome of a completed final exam
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct FinalResult {
    pub correct: u32,
    pub total: u32,
    pub passed: bool,
}

/// Read-only view of a session for the presentation layer
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub mode: SessionMode,
    pub answered_count: u32,
    pub correct_streak: u32,
    pub correct_count: u32,
    pub complete: bool,
    pub completion_reason: Option<CompletionReason>,
}

/// One active answer session.
///
/// Single-writer: exactly one learner drives one session instance, and
/// the `&mut self` transitions give at-most-one in-flight grading per
/// session by construction. Hosting multiple sessions means one `Session`
/// per session key, never shared mutable fields.
#[derive(Clone, Debug)]
pub struct Session {
    mode: SessionMode,
    limits: SessionLimits,
    phase: Phase,
    answered_count: u32,
    correct_streak: u32,
    correct_count: u32,
    completion_reason: Option<CompletionReason>,
    final_result: Option<FinalResult>,
}

impl Session {
    /// Start a session in `Idle`; call [`fetch_next`](Self::fetch_next)
    /// once the first question has been acquired.
    pub fn new(mode: SessionMode, limits: SessionLimits) -> Self {
        Self {
            mode,
            limits,
            phase: Phase::Idle,
            answered_count: 0,
            correct_streak: 0,
            correct_count: 0,
            completion_reason: None,
            final_result: None,
        }
    }

    /// Advance to the next question.
    ///
    /// Allowed from `Idle` or `Graded`. Rejected once complete, and in
    /// Review/Final also rejected from `Loaded`: the current question must
    /// be graded before advancing. Practice may skip freely.
    pub fn fetch_next(&mut self) -> Result<()> {
        if self.is_complete() {
            return Err(Error::SessionGuard("session is complete".into()));
        }
        if self.phase == Phase::Loaded && self.mode != SessionMode::Practice {
            return Err(Error::SessionGuard(
                "current question must be graded before advancing".into(),
            ));
        }
        self.phase = Phase::Loaded;
        tracing::debug!("Session advanced to question {}", self.answered_count + 1);
        Ok(())
    }

    /// Record a grading verdict for the loaded question.
    ///
    /// Allowed only from `Loaded`; a duplicate submit (e.g. a retried
    /// request) is guard-rejected without touching the counters.
    pub fn submit_answer(&mut self, is_correct: bool) -> Result<()> {
        if self.phase != Phase::Loaded {
            return Err(Error::SessionGuard(
                "no question awaiting grading".into(),
            ));
        }

        self.answered_count += 1;
        if is_correct {
            self.correct_streak += 1;
            self.correct_count += 1;
        } else {
            self.correct_streak = 0;
        }

        self.phase = Phase::Graded;

        match self.mode {
            SessionMode::Review => {
                if is_correct && self.correct_streak >= self.limits.target_streak {
                    self.finish(CompletionReason::Streak);
                } else if self.answered_count >= self.limits.max_questions {
                    self.finish(CompletionReason::Cap);
                }
            }
            SessionMode::Final => {
                if self.answered_count >= self.limits.final_total {
                    let total = self.limits.final_total;
                    let ratio = self.correct_count as f64 / total as f64;
                    self.final_result = Some(FinalResult {
                        correct: self.correct_count,
                        total,
                        passed: ratio >= self.limits.pass_rate,
                    });
                    self.finish(CompletionReason::FinalTotal);
                }
            }
            SessionMode::Practice => {}
        }

        Ok(())
    }

    /// True once a completion condition fired. Practice sessions never
    /// complete on their own.
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Whether this answer would finish a review session by streak.
    ///
    /// Callers use this to flag the single SRS event of a review session
    /// before submitting the verdict.
    pub fn would_finish_review(&self, is_correct: bool) -> bool {
        self.mode == SessionMode::Review
            && is_correct
            && self.correct_streak + 1 >= self.limits.target_streak
    }

    /// Final exam outcome, present only after a Final session completes
    pub fn final_result(&self) -> Option<FinalResult> {
        self.final_result
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn limits(&self) -> &SessionLimits {
        &self.limits
    }

    /// Read-only snapshot for display and completion callbacks
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            answered_count: self.answered_count,
            correct_streak: self.correct_streak,
            correct_count: self.correct_count,
            complete: self.is_complete(),
            completion_reason: self.completion_reason,
        }
    }

    fn finish(&mut self, reason: CompletionReason) {
        self.phase = Phase::Complete;
        self.completion_reason = Some(reason);
        tracing::info!(
            "Session complete: {:?} after {} answers ({:?})",
            reason,
            self.answered_count,
            self.mode
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_answers(session: &mut Session, answers: &[bool]) {
        for &correct in answers {
            session.fetch_next().unwrap();
            session.submit_answer(correct).unwrap();
        }
    }

    #[test]
    fn test_review_completes_by_streak() {
        let mut s = Session::new(SessionMode::Review, SessionLimits::default());

        // correct, correct, incorrect, correct, correct, correct
        run_answers(&mut s, &[true, true, false, true, true, true]);

        let snap = s.snapshot();
        assert!(snap.complete);
        assert_eq!(snap.answered_count, 6);
        assert_eq!(snap.completion_reason, Some(CompletionReason::Streak));
    }

    #[test]
    fn test_review_streak_resets_on_incorrect() {
        let mut s = Session::new(SessionMode::Review, SessionLimits::default());

        run_answers(&mut s, &[true, true, false]);
        assert_eq!(s.snapshot().correct_streak, 0);
        assert!(!s.is_complete());
    }

    #[test]
    fn test_review_completes_by_cap() {
        let limits = SessionLimits {
            max_questions: 4,
            ..SessionLimits::default()
        };
        let mut s = Session::new(SessionMode::Review, limits);

        run_answers(&mut s, &[false, false, false, false]);

        let snap = s.snapshot();
        assert!(snap.complete);
        assert_eq!(snap.answered_count, 4);
        assert_eq!(snap.completion_reason, Some(CompletionReason::Cap));
    }

    #[test]
    fn test_final_pass() {
        let limits = SessionLimits {
            final_total: 5,
            pass_rate: 0.7,
            ..SessionLimits::default()
        };
        let mut s = Session::new(SessionMode::Final, limits);

        run_answers(&mut s, &[true, true, false, true, true]);

        let result = s.final_result().unwrap();
        assert_eq!(result.correct, 4);
        assert_eq!(result.total, 5);
        assert!(result.passed); // 0.8 >= 0.7
        assert_eq!(
            s.snapshot().completion_reason,
            Some(CompletionReason::FinalTotal)
        );
    }

    #[test]
    fn test_final_fail() {
        let limits = SessionLimits {
            final_total: 5,
            pass_rate: 0.7,
            ..SessionLimits::default()
        };
        let mut s = Session::new(SessionMode::Final, limits);

        run_answers(&mut s, &[true, false, true, false, true]);

        let result = s.final_result().unwrap();
        assert_eq!(result.correct, 3);
        assert!(!result.passed); // 0.6 < 0.7
    }

    #[test]
    fn test_practice_never_completes() {
        let mut s = Session::new(SessionMode::Practice, SessionLimits::default());

        run_answers(&mut s, &[false; 50]);
        assert!(!s.is_complete());
        assert_eq!(s.snapshot().answered_count, 50);

        // Practice may skip without grading
        s.fetch_next().unwrap();
        assert!(s.fetch_next().is_ok());
    }

    #[test]
    fn test_review_fetch_guard_before_grading() {
        let mut s = Session::new(SessionMode::Review, SessionLimits::default());

        s.fetch_next().unwrap();
        let err = s.fetch_next();
        assert!(matches!(err, Err(Error::SessionGuard(_))));

        // State unchanged: still Loaded, nothing counted
        assert_eq!(s.phase(), Phase::Loaded);
        assert_eq!(s.snapshot().answered_count, 0);
    }

    #[test]
    fn test_submit_guard_without_loaded_question() {
        let mut s = Session::new(SessionMode::Review, SessionLimits::default());

        // Nothing loaded yet
        assert!(matches!(
            s.submit_answer(true),
            Err(Error::SessionGuard(_))
        ));

        // Duplicate submit after grading is rejected too
        s.fetch_next().unwrap();
        s.submit_answer(true).unwrap();
        let before = s.snapshot().answered_count;
        assert!(matches!(
            s.submit_answer(true),
            Err(Error::SessionGuard(_))
        ));
        assert_eq!(s.snapshot().answered_count, before);
    }

    #[test]
    fn test_fetch_rejected_once_complete() {
        let mut s = Session::new(SessionMode::Review, SessionLimits::default());
        run_answers(&mut s, &[true, true, true]);
        assert!(s.is_complete());
        assert!(matches!(s.fetch_next(), Err(Error::SessionGuard(_))));
    }

    #[test]
    fn test_would_finish_review() {
        let mut s = Session::new(SessionMode::Review, SessionLimits::default());

        run_answers(&mut s, &[true, true]);
        s.fetch_next().unwrap();
        assert!(s.would_finish_review(true));
        assert!(!s.would_finish_review(false));
    }

    #[test]
    fn test_streak_never_exceeds_answered() {
        let mut s = Session::new(SessionMode::Practice, SessionLimits::default());
        for _ in 0..20 {
            s.fetch_next().unwrap();
            s.submit_answer(true).unwrap();
            let snap = s.snapshot();
            assert!(snap.correct_streak <= snap.answered_count);
        }
    }
}
