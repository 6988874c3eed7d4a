use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs the versioned schema migrations.
///
/// Version 1 creates courses, the question bank, and the result store
/// (one row per `(course, student)` plus its ordered attempts).
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS courses (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    description TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS questions (
                    id TEXT PRIMARY KEY,
                    course_id TEXT NOT NULL,
                    statement TEXT NOT NULL,
                    correct_answer TEXT NOT NULL,
                    difficulty INTEGER NOT NULL CHECK (difficulty BETWEEN 1 AND 10),
                    target_time_secs INTEGER NOT NULL CHECK (target_time_secs > 0),
                    FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS diagnostic_results (
                    id INTEGER PRIMARY KEY,
                    course_id TEXT NOT NULL,
                    student_id TEXT NOT NULL,
                    completed_at TEXT NOT NULL,
                    skill_level INTEGER NOT NULL CHECK (skill_level BETWEEN 1 AND 10),
                    correct_percentage INTEGER NOT NULL CHECK (correct_percentage BETWEEN 0 AND 100),
                    average_time_secs INTEGER NOT NULL CHECK (average_time_secs >= 0),
                    UNIQUE (course_id, student_id),
                    FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        // Attempts keep their own copy of difficulty and target time, so no
        // foreign key to `questions`: deleting a question must not rewrite history.
        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS diagnostic_attempts (
                    result_id INTEGER NOT NULL,
                    position INTEGER NOT NULL CHECK (position >= 0),
                    question_id TEXT NOT NULL,
                    correct INTEGER NOT NULL CHECK (correct IN (0, 1)),
                    time_taken_secs INTEGER NOT NULL CHECK (time_taken_secs >= 0),
                    difficulty INTEGER NOT NULL CHECK (difficulty BETWEEN 1 AND 10),
                    target_time_secs INTEGER NOT NULL CHECK (target_time_secs > 0),
                    PRIMARY KEY (result_id, position),
                    FOREIGN KEY (result_id) REFERENCES diagnostic_results(id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_questions_course_difficulty
                    ON questions (course_id, difficulty, id);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_results_course_completed
                    ON diagnostic_results (course_id, completed_at);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}
