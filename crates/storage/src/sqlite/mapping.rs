use quiz_core::model::{
    Course, CourseId, Difficulty, Question, QuestionAttempt, QuestionDraft, QuestionId, StudentId,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn usize_to_i64(field: &'static str, v: usize) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn difficulty_from_i64(v: i64) -> Result<Difficulty, StorageError> {
    Difficulty::new(v).map_err(ser)
}

pub(crate) fn course_id_from_row(row: &SqliteRow, field: &str) -> Result<CourseId, StorageError> {
    CourseId::new(row.try_get::<String, _>(field).map_err(ser)?).map_err(ser)
}

pub(crate) fn student_id_from_row(row: &SqliteRow) -> Result<StudentId, StorageError> {
    StudentId::new(row.try_get::<String, _>("student_id").map_err(ser)?).map_err(ser)
}

pub(crate) fn map_course_row(row: &SqliteRow) -> Result<Course, StorageError> {
    Course::new(
        course_id_from_row(row, "id")?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get::<String, _>("description").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<Question, StorageError> {
    let id = QuestionId::new(row.try_get::<String, _>("id").map_err(ser)?).map_err(ser)?;
    let difficulty = difficulty_from_i64(row.try_get::<i64, _>("difficulty").map_err(ser)?)?;
    let target = u32_from_i64(
        "target_time_secs",
        row.try_get::<i64, _>("target_time_secs").map_err(ser)?,
    )?;

    QuestionDraft::new(
        course_id_from_row(row, "course_id")?,
        row.try_get::<String, _>("statement").map_err(ser)?,
        row.try_get::<String, _>("correct_answer").map_err(ser)?,
    )
    .with_id(id)
    .with_difficulty(i64::from(difficulty.value()))
    .with_target_time(target)
    .validate()
    .map_err(ser)
}

pub(crate) fn map_attempt_row(row: &SqliteRow) -> Result<QuestionAttempt, StorageError> {
    let question_id =
        QuestionId::new(row.try_get::<String, _>("question_id").map_err(ser)?).map_err(ser)?;
    let correct = match row.try_get::<i64, _>("correct").map_err(ser)? {
        0 => false,
        1 => true,
        other => {
            return Err(StorageError::Serialization(format!(
                "invalid correct flag: {other}"
            )));
        }
    };

    Ok(QuestionAttempt::from_persisted(
        question_id,
        correct,
        u32_from_i64(
            "time_taken_secs",
            row.try_get::<i64, _>("time_taken_secs").map_err(ser)?,
        )?,
        difficulty_from_i64(row.try_get::<i64, _>("difficulty").map_err(ser)?)?,
        u32_from_i64(
            "target_time_secs",
            row.try_get::<i64, _>("target_time_secs").map_err(ser)?,
        )?,
    ))
}
