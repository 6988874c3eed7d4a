//! Learner-facing interpretation of a diagnostic result and chart-ready series.

use serde::Serialize;
use std::fmt;

use crate::model::{DiagnosticResult, QuestionAttempt};

/// Coarse label for a 1–10 skill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SkillBand {
    Beginner,
    Basic,
    Intermediate,
    Proficient,
    Advanced,
}

impl SkillBand {
    #[must_use]
    pub fn from_level(level: u8) -> Self {
        match level {
            9.. => SkillBand::Advanced,
            7..=8 => SkillBand::Proficient,
            5..=6 => SkillBand::Intermediate,
            3..=4 => SkillBand::Basic,
            _ => SkillBand::Beginner,
        }
    }
}

impl fmt::Display for SkillBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkillBand::Beginner => "Beginner",
            SkillBand::Basic => "Basic",
            SkillBand::Intermediate => "Intermediate",
            SkillBand::Proficient => "Proficient",
            SkillBand::Advanced => "Advanced",
        };
        f.write_str(s)
    }
}

#[must_use]
pub fn accuracy_remark(correct_percentage: u8) -> &'static str {
    match correct_percentage {
        80.. => "Excellent understanding",
        60..=79 => "Good grasp of concepts",
        _ => "Room for improvement",
    }
}

#[must_use]
pub fn pace_remark(average_time_secs: u32) -> &'static str {
    match average_time_secs {
        0..=30 => "Quick response time",
        31..=60 => "Average response time",
        _ => "Taking a bit longer than average",
    }
}

/// Summary shown on the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultInsights {
    pub skill_level: u8,
    pub band: SkillBand,
    pub correct_percentage: u8,
    pub accuracy_remark: &'static str,
    pub average_time_secs: u32,
    pub pace_remark: &'static str,
    pub recommendation: String,
}

impl ResultInsights {
    #[must_use]
    pub fn from_result(result: &DiagnosticResult) -> Self {
        let level = result.skill_level().value();
        let pct = result.correct_percentage();
        let avg = result.average_time_secs();
        let understanding = if pct >= 70 { "strong" } else { "adequate" };

        Self {
            skill_level: level,
            band: SkillBand::from_level(level),
            correct_percentage: pct,
            accuracy_remark: accuracy_remark(pct),
            average_time_secs: avg,
            pace_remark: pace_remark(avg),
            recommendation: format!(
                "Start with level {level} content and advance gradually. You showed \
                 {understanding} understanding of the concepts, with an average response \
                 time of {avg} seconds."
            ),
        }
    }
}

/// Per-question series for plotting a session (labels `Q1`, `Q2`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PerformanceSeries {
    pub labels: Vec<String>,
    pub difficulty: Vec<u8>,
    pub time_taken_secs: Vec<u32>,
    pub correct: Vec<bool>,
}

impl PerformanceSeries {
    #[must_use]
    pub fn from_attempts(attempts: &[QuestionAttempt]) -> Self {
        let mut series = Self::default();
        for (idx, attempt) in attempts.iter().enumerate() {
            series.labels.push(format!("Q{}", idx + 1));
            series.difficulty.push(attempt.difficulty().value());
            series.time_taken_secs.push(attempt.time_taken_secs());
            series.correct.push(attempt.correct());
        }
        series
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CourseId, QuestionDraft};

    #[test]
    fn band_thresholds() {
        assert_eq!(SkillBand::from_level(1), SkillBand::Beginner);
        assert_eq!(SkillBand::from_level(3), SkillBand::Basic);
        assert_eq!(SkillBand::from_level(6), SkillBand::Intermediate);
        assert_eq!(SkillBand::from_level(7), SkillBand::Proficient);
        assert_eq!(SkillBand::from_level(10), SkillBand::Advanced);
    }

    #[test]
    fn remarks() {
        assert_eq!(accuracy_remark(80), "Excellent understanding");
        assert_eq!(accuracy_remark(60), "Good grasp of concepts");
        assert_eq!(accuracy_remark(59), "Room for improvement");
        assert_eq!(pace_remark(30), "Quick response time");
        assert_eq!(pace_remark(60), "Average response time");
        assert_eq!(pace_remark(61), "Taking a bit longer than average");
    }

    #[test]
    fn insights_and_series_follow_result() {
        let course = CourseId::new("calculus").unwrap();
        let q = QuestionDraft::new(course.clone(), "d/dx e^x", "e^x")
            .with_difficulty(6)
            .with_target_time(50)
            .validate()
            .unwrap();
        let attempts = vec![
            QuestionAttempt::answered(&q, true, 20),
            QuestionAttempt::answered(&q, false, 40),
        ];
        let result = DiagnosticResult::from_attempts(course, attempts).unwrap();
        let insights = ResultInsights::from_result(&result);
        assert_eq!(insights.correct_percentage, 50);
        assert!(insights.recommendation.contains("adequate"));
        assert_eq!(insights.pace_remark, "Quick response time");

        let series = PerformanceSeries::from_attempts(result.attempts());
        assert_eq!(series.labels, vec!["Q1", "Q2"]);
        assert_eq!(series.difficulty, vec![6, 6]);
        assert_eq!(series.correct, vec![true, false]);
    }
}
