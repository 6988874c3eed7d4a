use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Difficulty, QuestionAttempt};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScoreError {
    /// Scoring a session with no attempts is a caller bug, not a zero score.
    #[error("cannot score an empty attempt history")]
    EmptyHistory,
}

//
// ─── SCORE ─────────────────────────────────────────────────────────────────────
//

/// Weight of the level reached, in hundredths.
const LEVEL_WEIGHT: u64 = 60;
/// Weight of accuracy (as a fraction in `[0, 1]`), in hundredths of the 1–10 scale.
const ACCURACY_WEIGHT: u64 = 400;

/// Aggregate of a completed attempt sequence.
///
/// # Examples
///
/// ```
/// # use quiz_core::scoring::score;
/// # use quiz_core::model::{CourseId, QuestionAttempt, QuestionDraft};
/// let q = QuestionDraft::new(CourseId::new("algebra")?, "Solve 2x = 8", "4")
///     .with_difficulty(6)
///     .with_target_time(30)
///     .validate()?;
/// let attempts = vec![
///     QuestionAttempt::answered(&q, true, 20),
///     QuestionAttempt::answered(&q, false, 40),
/// ];
/// let s = score(&attempts)?;
/// assert_eq!(s.correct_percentage, 50);
/// assert_eq!(s.average_time_secs, 30);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub skill_level: Difficulty,
    pub correct_percentage: u8,
    pub average_time_secs: u32,
}

/// Half-up integer division, matching `Math.round` for non-negative values.
fn div_round(num: u64, den: u64) -> u64 {
    (2 * num + den) / (2 * den)
}

/// Scores an attempt sequence.
///
/// - `correct_percentage = round(100 * correct / total)`
/// - `average_time_secs = round(mean(time_taken))`
/// - `skill_level = round(0.6 * level + 0.04 * accuracy%)`, clamped to 1–10, where
///   `level` is the difficulty of the last attempt.
///
/// # Errors
///
/// Returns `ScoreError::EmptyHistory` when `attempts` is empty.
pub fn score(attempts: &[QuestionAttempt]) -> Result<Score, ScoreError> {
    let Some(last) = attempts.last() else {
        return Err(ScoreError::EmptyHistory);
    };

    let total = u64::try_from(attempts.len()).unwrap_or(u64::MAX);
    let correct = u64::try_from(attempts.iter().filter(|a| a.correct()).count())
        .unwrap_or(u64::MAX);
    let time_sum: u64 = attempts
        .iter()
        .map(|a| u64::from(a.time_taken_secs()))
        .sum();

    let correct_percentage = u8::try_from(div_round(100 * correct, total)).unwrap_or(100);
    let average_time_secs = u32::try_from(div_round(time_sum, total)).unwrap_or(u32::MAX);

    let level = u64::from(last.difficulty().value());
    let weighted = div_round(
        LEVEL_WEIGHT * level * total + ACCURACY_WEIGHT * correct,
        100 * total,
    );
    let skill_level = Difficulty::clamped(i64::try_from(weighted).unwrap_or(i64::MAX));

    Ok(Score {
        skill_level,
        correct_percentage,
        average_time_secs,
    })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CourseId, Question, QuestionDraft};

    fn question(difficulty: i64, target: u32) -> Question {
        QuestionDraft::new(CourseId::new("arithmetic").unwrap(), "What is 12 × 15?", "180")
            .with_difficulty(difficulty)
            .with_target_time(target)
            .validate()
            .unwrap()
    }

    fn run(difficulty: i64, outcomes: &[bool]) -> Vec<QuestionAttempt> {
        let q = question(difficulty, 10);
        outcomes
            .iter()
            .map(|&ok| QuestionAttempt::answered(&q, ok, 10))
            .collect()
    }

    #[test]
    fn empty_history_is_an_error() {
        assert_eq!(score(&[]).unwrap_err(), ScoreError::EmptyHistory);
    }

    #[test]
    fn eight_of_ten_correct() {
        let mut outcomes = vec![true; 8];
        outcomes.extend([false, false]);
        let s = score(&run(5, &outcomes)).unwrap();
        assert_eq!(s.correct_percentage, 80);
        assert_eq!(s.average_time_secs, 10);
    }

    #[test]
    fn all_correct_at_max_is_advanced() {
        let s = score(&run(10, &[true; 8])).unwrap();
        assert!(s.skill_level.value() >= 9);
        assert_eq!(s.correct_percentage, 100);
    }

    #[test]
    fn all_incorrect_at_min_is_beginner() {
        let s = score(&run(1, &[false; 8])).unwrap();
        assert!(s.skill_level.value() <= 2);
        assert_eq!(s.correct_percentage, 0);
    }

    #[test]
    fn percentage_rounds_half_up() {
        // 1 of 8 = 12.5%
        let mut outcomes = vec![false; 7];
        outcomes.push(true);
        assert_eq!(score(&run(5, &outcomes)).unwrap().correct_percentage, 13);
        // 2 of 3 = 66.67%
        assert_eq!(score(&run(5, &[true, true, false])).unwrap().correct_percentage, 67);
    }

    #[test]
    fn average_time_rounds() {
        let q = question(4, 30);
        let attempts = vec![
            QuestionAttempt::answered(&q, true, 10),
            QuestionAttempt::answered(&q, true, 11),
        ];
        assert_eq!(score(&attempts).unwrap().average_time_secs, 11);
    }

    #[test]
    fn skill_is_monotone_in_accuracy() {
        let mut previous = 0;
        for correct in 0..=6 {
            let mut outcomes = vec![true; correct];
            outcomes.extend(vec![false; 6 - correct]);
            let level = score(&run(6, &outcomes)).unwrap().skill_level.value();
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn skill_is_monotone_in_level() {
        let mut previous = 0;
        for difficulty in 1..=10 {
            let level = score(&run(difficulty, &[true, false, true]))
                .unwrap()
                .skill_level
                .value();
            assert!(level >= previous);
            previous = level;
        }
    }
}
