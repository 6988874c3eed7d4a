use chrono::{DateTime, Utc};
use quiz_core::model::{CourseId, DiagnosticResult, StudentId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteRepository;
use super::mapping::{
    conn, course_id_from_row, map_attempt_row, ser, student_id_from_row, usize_to_i64,
};
use crate::repository::{DiagnosticResultRepository, StorageError, StoredResult};

impl SqliteRepository {
    async fn load_stored_result(&self, row: &SqliteRow) -> Result<StoredResult, StorageError> {
        let result_id: i64 = row.try_get("id").map_err(ser)?;
        let course_id = course_id_from_row(row, "course_id")?;
        let student = student_id_from_row(row)?;
        let completed_at: DateTime<Utc> = row.try_get("completed_at").map_err(ser)?;

        let attempt_rows = sqlx::query(
            r"
            SELECT question_id, correct, time_taken_secs, difficulty, target_time_secs
            FROM diagnostic_attempts
            WHERE result_id = ?1
            ORDER BY position ASC
            ",
        )
        .bind(result_id)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let attempts = attempt_rows
            .iter()
            .map(map_attempt_row)
            .collect::<Result<Vec<_>, _>>()?;

        // Aggregate columns are informational; the result is always rescored.
        let result = DiagnosticResult::from_attempts(course_id, attempts).map_err(ser)?;
        Ok(StoredResult {
            student,
            result,
            completed_at,
        })
    }
}

#[async_trait::async_trait]
impl DiagnosticResultRepository for SqliteRepository {
    async fn save_result(
        &self,
        student: &StudentId,
        result: &DiagnosticResult,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let course_exists = sqlx::query("SELECT 1 FROM courses WHERE id = ?1")
            .bind(result.course_id().as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(conn)?
            .is_some();
        if !course_exists {
            return Err(StorageError::NotFound);
        }

        sqlx::query("DELETE FROM diagnostic_results WHERE course_id = ?1 AND student_id = ?2")
            .bind(result.course_id().as_str())
            .bind(student.as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        let res = sqlx::query(
            r"
            INSERT INTO diagnostic_results (
                course_id, student_id, completed_at,
                skill_level, correct_percentage, average_time_secs
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(result.course_id().as_str())
        .bind(student.as_str())
        .bind(completed_at)
        .bind(i64::from(result.skill_level().value()))
        .bind(i64::from(result.correct_percentage()))
        .bind(i64::from(result.average_time_secs()))
        .execute(&mut *tx)
        .await
        .map_err(conn)?;
        let result_id = res.last_insert_rowid();

        for (position, attempt) in result.attempts().iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO diagnostic_attempts (
                    result_id, position, question_id, correct,
                    time_taken_secs, difficulty, target_time_secs
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ",
            )
            .bind(result_id)
            .bind(usize_to_i64("position", position)?)
            .bind(attempt.question_id().as_str())
            .bind(i64::from(attempt.correct()))
            .bind(i64::from(attempt.time_taken_secs()))
            .bind(i64::from(attempt.difficulty().value()))
            .bind(i64::from(attempt.target_time_secs()))
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn get_result(
        &self,
        student: &StudentId,
        course_id: &CourseId,
    ) -> Result<Option<StoredResult>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, course_id, student_id, completed_at
            FROM diagnostic_results
            WHERE course_id = ?1 AND student_id = ?2
            ",
        )
        .bind(course_id.as_str())
        .bind(student.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        match row {
            Some(row) => self.load_stored_result(&row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn list_results(&self, course_id: &CourseId) -> Result<Vec<StoredResult>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, course_id, student_id, completed_at
            FROM diagnostic_results
            WHERE course_id = ?1
            ORDER BY completed_at DESC, student_id ASC
            ",
        )
        .bind(course_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut stored = Vec::with_capacity(rows.len());
        for row in &rows {
            stored.push(self.load_stored_result(row).await?);
        }
        Ok(stored)
    }
}
