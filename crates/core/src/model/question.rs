use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::difficulty::Difficulty;
use crate::model::ids::{CourseId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question statement cannot be empty")]
    EmptyStatement,

    #[error("correct answer cannot be empty")]
    EmptyAnswer,

    #[error("target time must be > 0 seconds")]
    InvalidTargetTime,
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question as it comes out of an authoring form.
///
/// `id` is optional: new questions get a generated id on validation, edits
/// keep theirs so they replace the stored question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: Option<QuestionId>,
    pub course_id: CourseId,
    pub statement: String,
    pub correct_answer: String,
    pub difficulty: i64,
    pub target_time_secs: u32,
}

impl QuestionDraft {
    /// Default target time offered by the authoring form.
    pub const DEFAULT_TARGET_TIME_SECS: u32 = 60;

    #[must_use]
    pub fn new(
        course_id: CourseId,
        statement: impl Into<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            course_id,
            statement: statement.into(),
            correct_answer: correct_answer.into(),
            difficulty: i64::from(Difficulty::START.value()),
            target_time_secs: Self::DEFAULT_TARGET_TIME_SECS,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: QuestionId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: i64) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn with_target_time(mut self, secs: u32) -> Self {
        self.target_time_secs = secs;
        self
    }

    /// Validate into an immutable `Question`.
    ///
    /// Difficulty is clamped into range rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for empty text or a zero target time.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let statement = self.statement.trim().to_owned();
        if statement.is_empty() {
            return Err(QuestionError::EmptyStatement);
        }
        let correct_answer = self.correct_answer.trim().to_owned();
        if correct_answer.is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }
        if self.target_time_secs == 0 {
            return Err(QuestionError::InvalidTargetTime);
        }

        Ok(Question {
            id: self.id.unwrap_or_else(QuestionId::generate),
            course_id: self.course_id,
            statement,
            correct_answer,
            difficulty: Difficulty::clamped(self.difficulty),
            target_time_secs: self.target_time_secs,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A question in a course's bank. Never mutated; edits replace it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion")]
pub struct Question {
    id: QuestionId,
    course_id: CourseId,
    statement: String,
    correct_answer: String,
    difficulty: Difficulty,
    target_time_secs: u32,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    #[must_use]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn target_time_secs(&self) -> u32 {
        self.target_time_secs
    }

    /// Grades a free-text response: surrounding whitespace and letter case are ignored.
    #[must_use]
    pub fn is_correct(&self, response: &str) -> bool {
        let response = response.trim();
        !response.is_empty() && response.to_lowercase() == self.correct_answer.to_lowercase()
    }

    /// Returns an editable draft carrying this question's id.
    #[must_use]
    pub fn to_draft(&self) -> QuestionDraft {
        QuestionDraft {
            id: Some(self.id.clone()),
            course_id: self.course_id.clone(),
            statement: self.statement.clone(),
            correct_answer: self.correct_answer.clone(),
            difficulty: i64::from(self.difficulty.value()),
            target_time_secs: self.target_time_secs,
        }
    }
}

/// Wire shape of a `Question`; deserialization re-runs draft validation.
#[derive(Deserialize)]
struct RawQuestion {
    id: QuestionId,
    course_id: CourseId,
    statement: String,
    correct_answer: String,
    difficulty: Difficulty,
    target_time_secs: u32,
}

impl TryFrom<RawQuestion> for Question {
    type Error = QuestionError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        QuestionDraft::new(raw.course_id, raw.statement, raw.correct_answer)
            .with_id(raw.id)
            .with_difficulty(i64::from(raw.difficulty.value()))
            .with_target_time(raw.target_time_secs)
            .validate()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
