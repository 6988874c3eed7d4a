use serde::{Deserialize, Serialize};

use crate::model::{CourseId, Difficulty, QuestionAttempt};
use crate::scoring::{self, Score, ScoreError};

/// Outcome of a completed diagnostic session.
///
/// Every aggregate is derived from `attempts`; there is no way to build one
/// with numbers that disagree with its attempt list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticResult {
    course_id: CourseId,
    skill_level: Difficulty,
    correct_percentage: u8,
    average_time_secs: u32,
    attempts: Vec<QuestionAttempt>,
}

impl DiagnosticResult {
    /// Score `attempts` and wrap them into a result.
    ///
    /// Also used to rehydrate persisted results, so stored aggregates are
    /// always recomputed.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::EmptyHistory` if `attempts` is empty.
    pub fn from_attempts(
        course_id: CourseId,
        attempts: Vec<QuestionAttempt>,
    ) -> Result<Self, ScoreError> {
        let Score {
            skill_level,
            correct_percentage,
            average_time_secs,
        } = scoring::score(&attempts)?;

        Ok(Self {
            course_id,
            skill_level,
            correct_percentage,
            average_time_secs,
            attempts,
        })
    }

    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    #[must_use]
    pub fn skill_level(&self) -> Difficulty {
        self.skill_level
    }

    #[must_use]
    pub fn correct_percentage(&self) -> u8 {
        self.correct_percentage
    }

    #[must_use]
    pub fn average_time_secs(&self) -> u32 {
        self.average_time_secs
    }

    #[must_use]
    pub fn attempts(&self) -> &[QuestionAttempt] {
        &self.attempts
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.correct()).count()
    }
}

/// Deserialization goes through `from_attempts` so aggregates are never trusted.
impl<'de> Deserialize<'de> for DiagnosticResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            course_id: CourseId,
            attempts: Vec<QuestionAttempt>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::from_attempts(raw.course_id, raw.attempts).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionDraft;

    #[test]
    fn empty_attempts_cannot_form_a_result() {
        let err = DiagnosticResult::from_attempts(CourseId::new("geometry").unwrap(), Vec::new())
            .unwrap_err();
        assert_eq!(err, ScoreError::EmptyHistory);
    }

    #[test]
    fn result_fields_match_scorer() {
        let course = CourseId::new("geometry").unwrap();
        let q = QuestionDraft::new(course.clone(), "Area of a 6 × 9 rectangle?", "54")
            .with_difficulty(3)
            .with_target_time(30)
            .validate()
            .unwrap();
        let attempts = vec![
            QuestionAttempt::answered(&q, true, 20),
            QuestionAttempt::answered(&q, true, 25),
            QuestionAttempt::timed_out(&q),
        ];
        let result = DiagnosticResult::from_attempts(course, attempts.clone()).unwrap();
        let expected = scoring::score(&attempts).unwrap();

        assert_eq!(result.skill_level(), expected.skill_level);
        assert_eq!(result.correct_percentage(), 67);
        assert_eq!(result.average_time_secs(), 25);
        assert_eq!(result.correct_count(), 2);
        assert_eq!(result.attempts().len(), 3);
    }

    #[test]
    fn deserialize_rescores_and_checks_attempts() {
        let json = r#"{"course_id":"geometry","skill_level":10,"correct_percentage":100,"average_time_secs":1,
            "attempts":[{"question_id":"geom-1","correct":false,"time_taken_secs":30,"difficulty":3,"target_time_secs":30}]}"#;
        let result: DiagnosticResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.correct_percentage(), 0);
        assert_eq!(result.average_time_secs(), 30);

        let zero_target = r#"{"course_id":"geometry",
            "attempts":[{"question_id":"geom-1","correct":true,"time_taken_secs":5,"difficulty":3,"target_time_secs":0}]}"#;
        assert!(serde_json::from_str::<DiagnosticResult>(zero_target).is_err());

        let empty = r#"{"course_id":"geometry","attempts":[]}"#;
        assert!(serde_json::from_str::<DiagnosticResult>(empty).is_err());
    }
}
