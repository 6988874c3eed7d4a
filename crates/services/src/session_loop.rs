use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rng;
use rand::seq::SliceRandom;
use quiz_core::model::{CourseId, Question, StudentId};
use quiz_core::pool::QuestionPool;
use quiz_core::session::{
    AdaptiveSession, CompletionReason, SessionConfig, SessionProgress, SessionReport, SessionStep,
};
use storage::repository::{CourseRepository, DiagnosticResultRepository, QuestionRepository};

use crate::Clock;
use crate::error::SessionLoopError;

/// One learner's run through an [`AdaptiveSession`], plus the bookkeeping the
/// service needs: when the current question was shown and whether the final
/// result reached the result store.
#[derive(Debug, Clone)]
pub struct StudentSession {
    student: StudentId,
    session: AdaptiveSession,
    shown_at: Option<DateTime<Utc>>,
    report: Option<SessionReport>,
    saved: bool,
}

impl StudentSession {
    #[must_use]
    pub fn student(&self) -> &StudentId {
        &self.student
    }

    #[must_use]
    pub fn session(&self) -> &AdaptiveSession {
        &self.session
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.session.progress()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    /// Final report, once the session has completed.
    #[must_use]
    pub fn report(&self) -> Option<&SessionReport> {
        self.report.as_ref()
    }

    /// `true` once the diagnostic result has been written to the result store.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// A completed diagnostic whose result still has to be written.
    #[must_use]
    pub fn needs_save(&self) -> bool {
        !self.saved && self.report.as_ref().is_some_and(is_saveable)
    }
}

/// Result of answering (or timing out) a single question.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAnswerResult {
    pub step: SessionStep,
    pub is_complete: bool,
    /// Set when this step wrote the diagnostic result.
    pub saved: bool,
}

/// Only full diagnostics are kept; a stopped run must not replace an earlier result.
fn is_saveable(report: &SessionReport) -> bool {
    report.result.is_some() && report.reason != CompletionReason::Stopped
}

/// Orchestrates session start, answering, and result persistence.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
    questions: Arc<dyn QuestionRepository>,
    results: Arc<dyn DiagnosticResultRepository>,
    shuffle: bool,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        courses: Arc<dyn CourseRepository>,
        questions: Arc<dyn QuestionRepository>,
        results: Arc<dyn DiagnosticResultRepository>,
    ) -> Self {
        Self {
            clock,
            courses,
            questions,
            results,
            shuffle: false,
        }
    }

    /// Randomize the order among questions the selector would otherwise tie on.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Start a session on `course_id` for `student`.
    ///
    /// # Errors
    ///
    /// Returns `SessionLoopError::CourseNotFound` for an unknown course,
    /// `SessionLoopError::Session` if the course has no questions, or storage errors.
    pub async fn start_session(
        &self,
        student: StudentId,
        course_id: CourseId,
        config: SessionConfig,
    ) -> Result<StudentSession, SessionLoopError> {
        if self.courses.get_course(&course_id).await?.is_none() {
            return Err(SessionLoopError::CourseNotFound(course_id));
        }

        let mut questions = self.questions.list_questions(&course_id).await?;
        if self.shuffle {
            questions.shuffle(&mut rng());
        }
        let pool = QuestionPool::new(questions);

        let mut session = AdaptiveSession::new(config, self.clock);
        if let Err(e) = session.start(pool, course_id.clone()) {
            tracing::warn!(course = %course_id, student = %student, error = %e, "session not started");
            return Err(e.into());
        }

        tracing::info!(
            session = %session.id(),
            course = %course_id,
            student = %student,
            diagnostic = config.mode().is_diagnostic(),
            "session started"
        );

        Ok(StudentSession {
            student,
            session,
            shown_at: Some(self.clock.now()),
            report: None,
            saved: false,
        })
    }

    /// Start a diagnostic of `length` questions, or the default length.
    ///
    /// # Errors
    ///
    /// Returns `SessionLoopError::Config` for an out-of-range length, otherwise
    /// as [`Self::start_session`].
    pub async fn start_diagnostic(
        &self,
        student: StudentId,
        course_id: CourseId,
        length: Option<usize>,
    ) -> Result<StudentSession, SessionLoopError> {
        let config = match length {
            Some(n) => SessionConfig::diagnostic_with_length(n)?,
            None => SessionConfig::diagnostic(),
        };
        self.start_session(student, course_id, config).await
    }

    /// Start an open-ended practice session.
    ///
    /// # Errors
    ///
    /// As [`Self::start_session`].
    pub async fn start_practice(
        &self,
        student: StudentId,
        course_id: CourseId,
    ) -> Result<StudentSession, SessionLoopError> {
        self.start_session(student, course_id, SessionConfig::practice())
            .await
    }

    /// Grade `response` to the current question, timing it with the service clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionLoopError::Session` if the session is not in progress,
    /// or `SessionLoopError::Storage` if a completed diagnostic cannot be saved.
    pub async fn answer_current(
        &self,
        session: &mut StudentSession,
        response: &str,
    ) -> Result<SessionAnswerResult, SessionLoopError> {
        let elapsed = session
            .shown_at
            .map_or(0, |shown| self.clock.elapsed_secs(shown));
        self.answer_current_with_time(session, response, elapsed)
            .await
    }

    /// Grade `response` with an externally measured answer time.
    ///
    /// # Errors
    ///
    /// As [`Self::answer_current`].
    pub async fn answer_current_with_time(
        &self,
        session: &mut StudentSession,
        response: &str,
        time_taken_secs: u32,
    ) -> Result<SessionAnswerResult, SessionLoopError> {
        let step = session.session.answer(response, time_taken_secs)?;
        self.after_step(session, step).await
    }

    /// The external timer expired for the current question.
    ///
    /// # Errors
    ///
    /// As [`Self::answer_current`].
    pub async fn timeout_current(
        &self,
        session: &mut StudentSession,
    ) -> Result<SessionAnswerResult, SessionLoopError> {
        let step = session.session.timeout_current_question()?;
        self.after_step(session, step).await
    }

    /// Stop an in-progress session early. The partial result is reported but not saved.
    ///
    /// # Errors
    ///
    /// Returns `SessionLoopError::Session` if the session is not in progress.
    pub async fn finish(
        &self,
        session: &mut StudentSession,
    ) -> Result<SessionReport, SessionLoopError> {
        let report = session.session.finish()?;
        tracing::info!(
            session = %report.session_id,
            answered = report.attempts.len(),
            "session stopped"
        );
        session.shown_at = None;
        session.report = Some(report.clone());
        Ok(report)
    }

    /// Write a completed diagnostic's result if an earlier attempt failed.
    ///
    /// Returns `true` if this call wrote it.
    ///
    /// # Errors
    ///
    /// Returns `SessionLoopError::Storage` if writing fails again.
    pub async fn save_pending(&self, session: &mut StudentSession) -> Result<bool, SessionLoopError> {
        if !session.needs_save() {
            return Ok(false);
        }
        self.save(session).await?;
        Ok(true)
    }

    async fn after_step(
        &self,
        session: &mut StudentSession,
        step: SessionStep,
    ) -> Result<SessionAnswerResult, SessionLoopError> {
        tracing::debug!(
            session = %session.session.id(),
            question = %step.attempt.question_id(),
            correct = step.attempt.correct(),
            secs = step.attempt.time_taken_secs(),
            "attempt recorded"
        );

        let mut saved = false;
        match step.report() {
            None => session.shown_at = Some(self.clock.now()),
            Some(report) => {
                if report.reason == CompletionReason::PoolExhausted {
                    tracing::warn!(
                        session = %report.session_id,
                        course = %report.course_id,
                        answered = report.attempts.len(),
                        "question pool exhausted"
                    );
                }
                tracing::info!(
                    session = %report.session_id,
                    reason = %report.reason,
                    skill_level = report.result.as_ref().map(|r| r.skill_level().value()),
                    "session completed"
                );
                session.shown_at = None;
                session.report = Some(report.clone());
                if session.needs_save() {
                    self.save(session).await?;
                    saved = true;
                }
            }
        }

        Ok(SessionAnswerResult {
            is_complete: step.is_complete(),
            step,
            saved,
        })
    }

    async fn save(&self, session: &mut StudentSession) -> Result<(), SessionLoopError> {
        let Some(report) = session.report.as_ref() else {
            return Ok(());
        };
        let Some(result) = report.result.as_ref() else {
            return Ok(());
        };

        if let Err(e) = self
            .results
            .save_result(&session.student, result, report.completed_at)
            .await
        {
            tracing::error!(session = %report.session_id, error = %e, "saving result failed");
            return Err(e.into());
        }

        tracing::info!(
            session = %report.session_id,
            student = %session.student,
            course = %result.course_id(),
            "result saved"
        );
        session.saved = true;
        Ok(())
    }
}
