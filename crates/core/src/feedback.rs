//! Immediate feedback shown after each question.
//!
//! Every negative message starts with [`INCORRECT_PREFIX`]; presentation code
//! styles messages by checking that prefix.

pub const INCORRECT_PREFIX: &str = "Incorrect";

/// Feedback for an answered question.
///
/// A zero `target_time_secs` is treated as one second.
#[must_use]
pub fn generate_feedback(correct: bool, time_taken_secs: u32, target_time_secs: u32) -> String {
    let target = target_time_secs.max(1);
    if !correct {
        return format!("{INCORRECT_PREFIX}. Review the worked solution and try a similar question.");
    }
    if time_taken_secs <= target {
        format!("Correct! Great speed: you answered in {time_taken_secs}s (target {target}s).")
    } else {
        format!(
            "Correct! You took {time_taken_secs}s, longer than the {target}s target. \
             Keep practicing to build speed."
        )
    }
}

/// Feedback when the countdown for a question runs out.
#[must_use]
pub fn timeout_feedback(target_time_secs: u32) -> String {
    format!(
        "{INCORRECT_PREFIX}: time's up after {}s! Let's move on to the next question.",
        target_time_secs.max(1)
    )
}

/// Whether a feedback message reports a wrong or missed answer.
#[must_use]
pub fn is_negative(message: &str) -> bool {
    message.starts_with(INCORRECT_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incorrect_always_has_prefix() {
        for t in [0, 1, 10, 500] {
            for target in [1, 10, 90] {
                let msg = generate_feedback(false, t, target);
                assert!(msg.starts_with("Incorrect"), "{msg}");
            }
        }
    }

    #[test]
    fn correct_never_has_prefix() {
        for t in [0, 1, 10, 500] {
            for target in [1, 10, 90] {
                let msg = generate_feedback(true, t, target);
                assert!(!is_negative(&msg), "{msg}");
            }
        }
    }

    #[test]
    fn on_time_mentions_speed() {
        let msg = generate_feedback(true, 10, 10);
        assert!(msg.contains("speed"));
        assert!(!msg.contains("longer"));
    }

    #[test]
    fn slow_answer_mentions_target() {
        let msg = generate_feedback(true, 11, 10);
        assert!(msg.contains("longer than the 10s target"));
    }

    #[test]
    fn zero_target_is_total() {
        assert!(generate_feedback(true, 1, 0).contains("target 1s"));
    }

    #[test]
    fn timeout_is_negative() {
        assert!(is_negative(&timeout_feedback(30)));
    }
}
