use serde::{Deserialize, Serialize};

use crate::model::difficulty::Difficulty;
use crate::model::ids::QuestionId;
use crate::model::question::{Question, QuestionError};

/// One answered (or timed-out) question within a session.
///
/// Created once per presentation and never modified; the session appends it to
/// its history in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAttempt")]
pub struct QuestionAttempt {
    question_id: QuestionId,
    correct: bool,
    time_taken_secs: u32,
    difficulty: Difficulty,
    target_time_secs: u32,
}

impl QuestionAttempt {
    /// Attempt for a question the learner answered after `time_taken_secs`.
    #[must_use]
    pub fn answered(question: &Question, correct: bool, time_taken_secs: u32) -> Self {
        Self {
            question_id: question.id().clone(),
            correct,
            time_taken_secs,
            difficulty: question.difficulty(),
            target_time_secs: question.target_time_secs(),
        }
    }

    /// Attempt recorded when the countdown for `question` ran out.
    #[must_use]
    pub fn timed_out(question: &Question) -> Self {
        Self::answered(question, false, question.target_time_secs())
    }

    /// Rehydrate an attempt from persisted storage.
    ///
    /// A zero target time is raised to one second so `on_time` stays meaningful.
    #[must_use]
    pub fn from_persisted(
        question_id: QuestionId,
        correct: bool,
        time_taken_secs: u32,
        difficulty: Difficulty,
        target_time_secs: u32,
    ) -> Self {
        Self {
            question_id,
            correct,
            time_taken_secs,
            difficulty,
            target_time_secs: target_time_secs.max(1),
        }
    }

    #[must_use]
    pub fn question_id(&self) -> &QuestionId {
        &self.question_id
    }

    #[must_use]
    pub fn correct(&self) -> bool {
        self.correct
    }

    #[must_use]
    pub fn time_taken_secs(&self) -> u32 {
        self.time_taken_secs
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn target_time_secs(&self) -> u32 {
        self.target_time_secs
    }

    #[must_use]
    pub fn on_time(&self) -> bool {
        self.time_taken_secs <= self.target_time_secs
    }

    /// Correct and within the target time.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.correct && self.on_time()
    }
}

#[derive(Deserialize)]
struct RawAttempt {
    question_id: QuestionId,
    correct: bool,
    time_taken_secs: u32,
    difficulty: Difficulty,
    target_time_secs: u32,
}

impl TryFrom<RawAttempt> for QuestionAttempt {
    type Error = QuestionError;

    fn try_from(raw: RawAttempt) -> Result<Self, Self::Error> {
        if raw.target_time_secs == 0 {
            return Err(QuestionError::InvalidTargetTime);
        }
        Ok(Self::from_persisted(
            raw.question_id,
            raw.correct,
            raw.time_taken_secs,
            raw.difficulty,
            raw.target_time_secs,
        ))
    }
}
