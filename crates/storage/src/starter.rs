//! Built-in starter courses and questions loaded by `seed`.

use quiz_core::model::{Course, CourseId, Question, QuestionDraft, QuestionId};
use thiserror::Error;

use crate::repository::{Storage, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SeedError {
    #[error("invalid starter data: {0}")]
    InvalidData(#[from] quiz_core::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

const COURSES: &[(&str, &str, &str)] = &[
    ("arithmetic", "Arithmetic", "Basic arithmetic concepts and operations"),
    ("algebra", "Algebra", "Solving equations and working with variables"),
    ("geometry", "Geometry", "Introduction to Euclidean geometry"),
    ("calculus", "Calculus", "Derivatives, integrals and their applications"),
    ("probability", "Probability", "Understanding chance and random events"),
    ("statistics", "Statistics", "Data analysis and interpretation"),
];

/// `(id, course, statement, answer, difficulty, target seconds)`
type Row = (&'static str, &'static str, &'static str, &'static str, i64, u32);

const QUESTIONS: &[Row] = &[
    ("arith-1", "arithmetic", "What is 7 × 8?", "56", 2, 20),
    ("arith-2", "arithmetic", "What is 12 × 15?", "180", 3, 30),
    ("arith-3", "arithmetic", "What is 7 × 8 – (3 + 5)?", "48", 4, 40),
    ("arith-4", "arithmetic", "What is 356 + 289?", "645", 5, 45),
    ("arith-5", "arithmetic", "What is 729 ÷ 9?", "81", 6, 50),
    ("arith-6", "arithmetic", "What is the result of 15% of 240?", "36", 7, 60),
    (
        "arith-7",
        "arithmetic",
        "If a number is increased by 20% and then decreased by 25%, what is the overall percentage change?",
        "-10",
        8,
        90,
    ),
    ("alg-1", "algebra", "Solve for x: 3x + 5 = 20", "5", 3, 40),
    ("alg-2", "algebra", "Solve for x: 2x - 7 = 13", "10", 4, 45),
    ("alg-3", "algebra", "Simplify: 3(2x - 5) + 4(x + 3)", "10x - 3", 5, 60),
    ("alg-4", "algebra", "Solve the system: x + y = 5, x - y = 3", "x = 4, y = 1", 6, 90),
    ("alg-5", "algebra", "Solve the quadratic equation: x² - 5x + 6 = 0", "x = 2, x = 3", 7, 120),
    ("geom-1", "geometry", "What is the area of a rectangle with width 6 and length 9?", "54", 3, 30),
    ("geom-2", "geometry", "What is the area of a circle with radius 5?", "25π", 4, 45),
    ("geom-3", "geometry", "If a triangle has sides of lengths 3, 4, and 5, what is its area?", "6", 5, 60),
    ("calc-1", "calculus", "What is the derivative of f(x) = 3x² + 5x?", "6x + 5", 5, 60),
    ("calc-2", "calculus", "What is the derivative of f(x) = e^x?", "e^x", 6, 50),
    ("calc-3", "calculus", "Evaluate the definite integral ∫₀¹ x² dx", "1/3", 7, 90),
    ("prob-1", "probability", "A fair coin is tossed once. What is the probability of heads?", "1/2", 2, 20),
    ("prob-2", "probability", "A fair die is rolled. What is the probability of an even number?", "1/2", 3, 30),
    ("prob-3", "probability", "Two fair dice are rolled. What is the probability that the sum is 7?", "1/6", 5, 60),
    ("stat-1", "statistics", "What is the mean of 2, 4, 6, 8?", "5", 2, 30),
    ("stat-2", "statistics", "What is the median of 3, 9, 1, 7, 5?", "5", 3, 40),
    ("stat-3", "statistics", "What is the mode of 4, 2, 4, 3, 2, 4?", "4", 4, 40),
];

/// The starter courses.
///
/// # Errors
///
/// Returns `quiz_core::Error` if a built-in entry fails validation.
pub fn starter_courses() -> Result<Vec<Course>, quiz_core::Error> {
    COURSES
        .iter()
        .map(|&(id, name, description)| -> Result<Course, quiz_core::Error> {
            Ok(Course::new(CourseId::new(id)?, name, description)?)
        })
        .collect()
}

/// The starter question bank, in the order listed above.
///
/// # Errors
///
/// Returns `quiz_core::Error` if a built-in entry fails validation.
pub fn starter_questions() -> Result<Vec<Question>, quiz_core::Error> {
    QUESTIONS
        .iter()
        .map(
            |&(id, course, statement, answer, difficulty, target)| -> Result<Question, quiz_core::Error> {
                Ok(QuestionDraft::new(CourseId::new(course)?, statement, answer)
                    .with_id(QuestionId::new(id)?)
                    .with_difficulty(difficulty)
                    .with_target_time(target)
                    .validate()?)
            },
        )
        .collect()
}

/// Counts written by [`load_starter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub courses: usize,
    pub questions: usize,
}

/// Upsert the starter data. Safe to run repeatedly.
///
/// # Errors
///
/// Returns `SeedError` if starter data is invalid or cannot be stored.
pub async fn load_starter(storage: &Storage) -> Result<SeedSummary, SeedError> {
    let courses = starter_courses()?;
    let questions = starter_questions()?;

    for course in &courses {
        storage.courses.upsert_course(course).await?;
    }
    for question in &questions {
        storage.questions.upsert_question(question).await?;
    }

    Ok(SeedSummary {
        courses: courses.len(),
        questions: questions.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_question_belongs_to_a_starter_course() {
        let courses = starter_courses().unwrap();
        for q in starter_questions().unwrap() {
            assert!(courses.iter().any(|c| c.id() == q.course_id()), "{}", q.id());
        }
    }

    #[tokio::test]
    async fn loading_twice_is_idempotent() {
        let storage = Storage::in_memory();
        let first = load_starter(&storage).await.unwrap();
        let second = load_starter(&storage).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(storage.courses.list_courses().await.unwrap().len(), 6);

        let arithmetic = CourseId::new("arithmetic").unwrap();
        assert_eq!(
            storage.questions.list_questions(&arithmetic).await.unwrap().len(),
            7
        );
    }
}
