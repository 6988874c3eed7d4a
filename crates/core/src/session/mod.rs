//! Adaptive session orchestration.
//!
//! An [`AdaptiveSession`] walks `NotStarted → InProgress → Completed` exactly
//! once. It owns its attempt history and never starts a clock of its own:
//! whoever runs the countdown calls [`AdaptiveSession::timeout_current_question`].

mod config;
mod report;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::feedback::{generate_feedback, timeout_feedback};
use crate::model::{
    CourseId, DiagnosticResult, Difficulty, Question, QuestionAttempt, QuestionId, SessionId,
};
use crate::pool::QuestionPool;
use crate::scoring::ScoreError;
use crate::time::Clock;

pub use config::{ConfigError, SessionConfig, SessionMode};
pub use report::{CompletionReason, SessionProgress, SessionReport, SessionStep, StepOutcome};

//
// ─── STATE / ERRORS ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::NotStarted => "not started",
            SessionState::InProgress => "in progress",
            SessionState::Completed => "completed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session is {actual}, expected {expected}")]
    InvalidState {
        expected: SessionState,
        actual: SessionState,
    },

    #[error("no question available for course {course_id}")]
    PoolExhausted { course_id: CourseId },

    #[error("attempt is for question {submitted}, but {current} is being asked")]
    AttemptMismatch {
        current: QuestionId,
        submitted: QuestionId,
    },

    #[error(transparent)]
    Score(#[from] ScoreError),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Single-use controller for one diagnostic or practice run.
///
/// # Examples
///
/// ```
/// # use quiz_core::model::{CourseId, QuestionDraft};
/// # use quiz_core::pool::QuestionPool;
/// # use quiz_core::session::{AdaptiveSession, SessionConfig};
/// # use quiz_core::time::fixed_clock;
/// let course = CourseId::new("arithmetic")?;
/// let pool: QuestionPool = (1..=4)
///     .map(|d| {
///         QuestionDraft::new(course.clone(), format!("Question {d}"), "42")
///             .with_difficulty(d * 2)
///             .with_target_time(30)
///             .validate()
///     })
///     .collect::<Result<_, _>>()?;
///
/// let mut session = AdaptiveSession::new(SessionConfig::diagnostic_with_length(2)?, fixed_clock());
/// session.start(pool, course)?;
/// session.answer("42", 12)?;
/// let step = session.answer("41", 12)?;
/// let result = step.report().and_then(|r| r.result.as_ref()).expect("scored");
/// assert_eq!(result.correct_percentage(), 50);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct AdaptiveSession {
    id: SessionId,
    config: SessionConfig,
    clock: Clock,
    state: SessionState,
    course_id: Option<CourseId>,
    pool: QuestionPool,
    presented: HashSet<QuestionId>,
    current: Option<Question>,
    attempts: Vec<QuestionAttempt>,
    difficulty: Difficulty,
    started_at: Option<DateTime<Utc>>,
}

impl AdaptiveSession {
    #[must_use]
    pub fn new(config: SessionConfig, clock: Clock) -> Self {
        Self {
            id: SessionId::new_random(),
            config,
            clock,
            state: SessionState::NotStarted,
            course_id: None,
            pool: QuestionPool::default(),
            presented: HashSet::new(),
            current: None,
            attempts: Vec::new(),
            difficulty: config.policy().start(),
            started_at: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Completed
    }

    #[must_use]
    pub fn course_id(&self) -> Option<&CourseId> {
        self.course_id.as_ref()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn attempts(&self) -> &[QuestionAttempt] {
        &self.attempts
    }

    /// Difficulty the selector asked for when the current question was picked.
    #[must_use]
    pub fn current_difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let reachable = self.attempts.len()
            + usize::from(self.current.is_some())
            + self.pool.remaining(&self.presented);
        SessionProgress {
            answered: self.attempts.len(),
            total: self.config.mode().length().map(|len| len.min(reachable)),
            current_difficulty: self.difficulty,
            is_complete: self.is_complete(),
        }
    }

    /// Begin the session on `course_id`'s questions from `pool`.
    ///
    /// Returns the first question, picked nearest to the policy's start level.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the session was already started.
    /// - `PoolExhausted` if the pool has no question for the course; the
    ///   session stays `NotStarted`.
    pub fn start(
        &mut self,
        pool: QuestionPool,
        course_id: CourseId,
    ) -> Result<&Question, SessionError> {
        self.expect_state(SessionState::NotStarted)?;

        let pool = pool.for_course(&course_id);
        let target = self.config.policy().next_difficulty(&[]);
        let Some(first) = pool.nearest_unpresented(target, &self.presented).cloned() else {
            return Err(SessionError::PoolExhausted { course_id });
        };

        self.state = SessionState::InProgress;
        self.started_at = Some(self.clock.now());
        self.course_id = Some(course_id);
        self.pool = pool;
        self.difficulty = target;
        self.presented.insert(first.id().clone());
        let current: &Question = self.current.insert(first);
        Ok(current)
    }

    /// Record an attempt for the current question.
    ///
    /// Only correctness and time taken are read from `attempt`; difficulty and
    /// target time always come from the question being asked.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the session is in progress.
    /// - `AttemptMismatch` if the attempt is for a different question.
    pub fn submit_attempt(&mut self, attempt: QuestionAttempt) -> Result<SessionStep, SessionError> {
        let current = self.current_in_progress()?;
        if attempt.question_id() != current.id() {
            return Err(SessionError::AttemptMismatch {
                current: current.id().clone(),
                submitted: attempt.question_id().clone(),
            });
        }
        let attempt =
            QuestionAttempt::answered(current, attempt.correct(), attempt.time_taken_secs());

        let feedback = generate_feedback(
            attempt.correct(),
            attempt.time_taken_secs(),
            attempt.target_time_secs(),
        );
        self.record(attempt, feedback)
    }

    /// Grade a free-text response to the current question and record it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the session is in progress.
    pub fn answer(&mut self, response: &str, time_taken_secs: u32) -> Result<SessionStep, SessionError> {
        let current = self.current_in_progress()?;
        let attempt =
            QuestionAttempt::answered(current, current.is_correct(response), time_taken_secs);
        let feedback = generate_feedback(
            attempt.correct(),
            attempt.time_taken_secs(),
            attempt.target_time_secs(),
        );
        self.record(attempt, feedback)
    }

    /// The countdown for the current question ran out: record it as wrong at
    /// exactly its target time.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the session is in progress.
    pub fn timeout_current_question(&mut self) -> Result<SessionStep, SessionError> {
        let current = self.current_in_progress()?;
        let attempt = QuestionAttempt::timed_out(current);
        let feedback = timeout_feedback(attempt.target_time_secs());
        self.record(attempt, feedback)
    }

    /// End an in-progress session now. The unanswered current question is discarded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the session is in progress.
    pub fn finish(&mut self) -> Result<SessionReport, SessionError> {
        self.expect_state(SessionState::InProgress)?;
        self.complete(CompletionReason::Stopped)
    }

    fn expect_state(&self, expected: SessionState) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    fn current_in_progress(&self) -> Result<&Question, SessionError> {
        self.expect_state(SessionState::InProgress)?;
        self.current.as_ref().ok_or(SessionError::InvalidState {
            expected: SessionState::InProgress,
            actual: self.state,
        })
    }

    fn record(
        &mut self,
        attempt: QuestionAttempt,
        feedback: String,
    ) -> Result<SessionStep, SessionError> {
        self.current = None;
        self.attempts.push(attempt.clone());
        self.difficulty = self.config.policy().next_difficulty(&self.attempts);

        let length_reached = self
            .config
            .mode()
            .length()
            .is_some_and(|len| self.attempts.len() >= len);

        let outcome = if length_reached {
            StepOutcome::Completed(self.complete(CompletionReason::LengthReached)?)
        } else {
            match self
                .pool
                .nearest_unpresented(self.difficulty, &self.presented)
                .cloned()
            {
                Some(next) => {
                    self.presented.insert(next.id().clone());
                    self.current = Some(next.clone());
                    StepOutcome::Next(next)
                }
                None => StepOutcome::Completed(self.complete(CompletionReason::PoolExhausted)?),
            }
        };

        Ok(SessionStep {
            attempt,
            feedback,
            progress: self.progress(),
            outcome,
        })
    }

    fn complete(&mut self, reason: CompletionReason) -> Result<SessionReport, SessionError> {
        let course_id = self.course_id.clone().ok_or(SessionError::InvalidState {
            expected: SessionState::InProgress,
            actual: self.state,
        })?;

        let result = if self.config.mode().is_diagnostic() && !self.attempts.is_empty() {
            Some(DiagnosticResult::from_attempts(
                course_id.clone(),
                self.attempts.clone(),
            )?)
        } else {
            None
        };

        let completed_at = self.clock.now();
        self.state = SessionState::Completed;
        self.current = None;

        Ok(SessionReport {
            session_id: self.id,
            course_id,
            mode: self.config.mode(),
            reason,
            attempts: self.attempts.clone(),
            final_difficulty: self.difficulty,
            started_at: self.started_at.unwrap_or(completed_at),
            completed_at,
            result,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
