use quiz_core::model::{CourseId, Question, QuestionId};

use super::SqliteRepository;
use super::mapping::{conn, map_question_row};
use crate::repository::{QuestionRepository, StorageError};

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let course_exists = sqlx::query("SELECT 1 FROM courses WHERE id = ?1")
            .bind(question.course_id().as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?
            .is_some();
        if !course_exists {
            return Err(StorageError::NotFound);
        }

        sqlx::query(
            r"
            INSERT INTO questions (id, course_id, statement, correct_answer, difficulty, target_time_secs)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                course_id = excluded.course_id,
                statement = excluded.statement,
                correct_answer = excluded.correct_answer,
                difficulty = excluded.difficulty,
                target_time_secs = excluded.target_time_secs
            ",
        )
        .bind(question.id().as_str())
        .bind(question.course_id().as_str())
        .bind(question.statement())
        .bind(question.correct_answer())
        .bind(i64::from(question.difficulty().value()))
        .bind(i64::from(question.target_time_secs()))
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn get_question(&self, id: &QuestionId) -> Result<Option<Question>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, course_id, statement, correct_answer, difficulty, target_time_secs
            FROM questions WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_question_row).transpose()
    }

    async fn list_questions(&self, course_id: &CourseId) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, course_id, statement, correct_answer, difficulty, target_time_secs
            FROM questions
            WHERE course_id = ?1
            ORDER BY difficulty ASC, id ASC
            ",
        )
        .bind(course_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_question_row).collect()
    }

    async fn delete_question(&self, id: &QuestionId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM questions WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
