use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Difficulty, QuestionAttempt};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PolicyError {
    #[error("streak window must be > 0")]
    InvalidWindow,
}

/// Deterministic difficulty adaptation over a short trailing window.
///
/// Rules, applied to the most recent attempt and the trailing `window`:
/// - no history: `start`
/// - last attempt wrong or over its target time: one level easier
/// - the whole window correct and on time: one level harder
/// - anything else: hold at the last attempt's level
///
/// # Examples
///
/// ```
/// # use quiz_core::adaptive::AdaptivePolicy;
/// # use quiz_core::model::Difficulty;
/// let policy = AdaptivePolicy::default();
/// assert_eq!(policy.next_difficulty(&[]), Difficulty::START);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptivePolicy {
    start: Difficulty,
    window: usize,
}

impl AdaptivePolicy {
    pub const DEFAULT_WINDOW: usize = 3;

    /// # Errors
    ///
    /// Returns `PolicyError::InvalidWindow` if `window` is zero.
    pub fn new(start: Difficulty, window: usize) -> Result<Self, PolicyError> {
        if window == 0 {
            return Err(PolicyError::InvalidWindow);
        }
        Ok(Self { start, window })
    }

    #[must_use]
    pub fn start(&self) -> Difficulty {
        self.start
    }

    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Difficulty for the next question given everything answered so far.
    #[must_use]
    pub fn next_difficulty(&self, history: &[QuestionAttempt]) -> Difficulty {
        let Some(last) = history.last() else {
            return self.start;
        };

        if !last.is_clean() {
            return last.difficulty().lower();
        }

        let streak = history.len() >= self.window
            && history[history.len() - self.window..]
                .iter()
                .all(QuestionAttempt::is_clean);
        if streak {
            last.difficulty().raise()
        } else {
            last.difficulty()
        }
    }
}

impl Default for AdaptivePolicy {
    fn default() -> Self {
        Self {
            start: Difficulty::START,
            window: Self::DEFAULT_WINDOW,
        }
    }
}

/// [`AdaptivePolicy::next_difficulty`] with the default policy.
#[must_use]
pub fn next_difficulty(history: &[QuestionAttempt]) -> Difficulty {
    AdaptivePolicy::default().next_difficulty(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CourseId, Question, QuestionDraft};

    fn question(difficulty: i64) -> Question {
        QuestionDraft::new(CourseId::new("algebra").unwrap(), "Solve 2x - 7 = 13", "10")
            .with_difficulty(difficulty)
            .with_target_time(45)
            .validate()
            .unwrap()
    }

    fn clean(difficulty: i64) -> QuestionAttempt {
        QuestionAttempt::answered(&question(difficulty), true, 30)
    }

    fn wrong(difficulty: i64) -> QuestionAttempt {
        QuestionAttempt::answered(&question(difficulty), false, 30)
    }

    fn slow(difficulty: i64) -> QuestionAttempt {
        QuestionAttempt::answered(&question(difficulty), true, 46)
    }

    #[test]
    fn empty_history_starts_mid_scale() {
        assert_eq!(next_difficulty(&[]), Difficulty::START);
    }

    #[test]
    fn three_clean_answers_raise_by_one() {
        let history = vec![clean(5), clean(5), clean(5)];
        assert_eq!(next_difficulty(&history).value(), 6);
    }

    #[test]
    fn raise_is_capped() {
        let history = vec![clean(10), clean(10), clean(10)];
        assert_eq!(next_difficulty(&history), Difficulty::MAX);
    }

    #[test]
    fn wrong_answer_after_streak_lowers_by_one() {
        let history = vec![clean(5), clean(5), clean(5), wrong(6)];
        assert_eq!(next_difficulty(&history).value(), 5);
    }

    #[test]
    fn lower_is_floored() {
        assert_eq!(next_difficulty(&[wrong(1)]), Difficulty::MIN);
    }

    #[test]
    fn slow_answer_lowers() {
        let history = vec![clean(7), clean(7), slow(7)];
        assert_eq!(next_difficulty(&history).value(), 6);
    }

    #[test]
    fn mixed_window_holds_last_level() {
        let history = vec![wrong(4), clean(4), clean(4)];
        assert_eq!(next_difficulty(&history).value(), 4);
    }

    #[test]
    fn short_streak_holds() {
        assert_eq!(next_difficulty(&[clean(5)]).value(), 5);
        assert_eq!(next_difficulty(&[clean(5), clean(5)]).value(), 5);
    }

    #[test]
    fn only_the_trailing_window_counts() {
        let history = vec![wrong(3), wrong(3), clean(3), clean(3), clean(3)];
        assert_eq!(next_difficulty(&history).value(), 4);
    }

    #[test]
    fn custom_window() {
        let policy = AdaptivePolicy::new(Difficulty::clamped(2), 1).unwrap();
        assert_eq!(policy.next_difficulty(&[]).value(), 2);
        assert_eq!(policy.next_difficulty(&[clean(2)]).value(), 3);
        assert_eq!(
            AdaptivePolicy::new(Difficulty::START, 0).unwrap_err(),
            PolicyError::InvalidWindow
        );
    }

    #[test]
    fn output_always_in_range() {
        let mut history = Vec::new();
        for i in 0..40_i64 {
            let d = next_difficulty(&history);
            assert!((1..=10).contains(&d.value()));
            let attempt = if i % 5 == 4 {
                wrong(i64::from(d.value()))
            } else {
                clean(i64::from(d.value()))
            };
            history.push(attempt);
        }
    }
}
