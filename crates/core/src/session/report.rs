use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::config::SessionMode;
use crate::model::{CourseId, DiagnosticResult, Difficulty, Question, QuestionAttempt, SessionId};

/// Why a session reached `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// The configured diagnostic length was reached.
    LengthReached,
    /// No unpresented question was left in the pool.
    PoolExhausted,
    /// The caller ended the session early.
    Stopped,
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompletionReason::LengthReached => "length reached",
            CompletionReason::PoolExhausted => "question pool exhausted",
            CompletionReason::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub answered: usize,
    /// Planned question count; `None` for practice.
    pub total: Option<usize>,
    pub current_difficulty: Difficulty,
    pub is_complete: bool,
}

/// Everything a finished session hands back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub course_id: CourseId,
    pub mode: SessionMode,
    pub reason: CompletionReason,
    pub attempts: Vec<QuestionAttempt>,
    pub final_difficulty: Difficulty,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Present for diagnostics with at least one attempt.
    pub result: Option<DiagnosticResult>,
}

/// What happens after an attempt is recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Next(Question),
    Completed(SessionReport),
}

/// Outcome of answering (or timing out) the current question.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStep {
    pub attempt: QuestionAttempt,
    pub feedback: String,
    pub progress: SessionProgress,
    pub outcome: StepOutcome,
}

impl SessionStep {
    #[must_use]
    pub fn next_question(&self) -> Option<&Question> {
        match &self.outcome {
            StepOutcome::Next(q) => Some(q),
            StepOutcome::Completed(_) => None,
        }
    }

    #[must_use]
    pub fn report(&self) -> Option<&SessionReport> {
        match &self.outcome {
            StepOutcome::Next(_) => None,
            StepOutcome::Completed(report) => Some(report),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, StepOutcome::Completed(_))
    }
}
