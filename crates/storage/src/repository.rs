use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{Course, CourseId, DiagnosticResult, Question, QuestionId, StudentId};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A diagnostic result as kept by the result store, tagged with who took it and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredResult {
    pub student: StudentId,
    pub result: DiagnosticResult,
    pub completed_at: DateTime<Utc>,
}

impl StoredResult {
    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        self.result.course_id()
    }
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Store a course that must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if a course with the same id exists.
    async fn insert_course(&self, course: &Course) -> Result<(), StorageError>;

    /// Persist or update a course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError>;

    /// Fetch a course by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing course is `Ok(None)`.
    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError>;

    /// All courses ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError>;

    /// Delete a course together with its questions and stored results.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the course does not exist.
    async fn delete_course(&self, id: &CourseId) -> Result<(), StorageError>;
}

/// The question bank.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Persist or replace a question by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the question's course does not exist.
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; a missing question is `Ok(None)`.
    async fn get_question(&self, id: &QuestionId) -> Result<Option<Question>, StorageError>;

    /// Questions of one course ordered by difficulty, then id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_questions(&self, course_id: &CourseId) -> Result<Vec<Question>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the question does not exist.
    async fn delete_question(&self, id: &QuestionId) -> Result<(), StorageError>;
}

/// The result store. Holds at most one result per `(course, student)`.
#[async_trait]
pub trait DiagnosticResultRepository: Send + Sync {
    /// Save `result`, replacing any earlier result of `student` in the same course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the result's course does not exist.
    async fn save_result(
        &self,
        student: &StudentId,
        result: &DiagnosticResult,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures; no result is `Ok(None)`.
    async fn get_result(
        &self,
        student: &StudentId,
        course_id: &CourseId,
    ) -> Result<Option<StoredResult>, StorageError>;

    /// Results of every student in a course, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_results(&self, course_id: &CourseId) -> Result<Vec<StoredResult>, StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<Mutex<HashMap<CourseId, Course>>>,
    questions: Arc<Mutex<HashMap<QuestionId, Question>>>,
    results: Arc<Mutex<HashMap<(CourseId, StudentId), StoredResult>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn course_exists(&self, id: &CourseId) -> Result<bool, StorageError> {
        let guard = self
            .courses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.contains_key(id))
    }
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn insert_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut guard = self
            .courses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(course.id()) {
            return Err(StorageError::Conflict);
        }
        guard.insert(course.id().clone(), course.clone());
        Ok(())
    }

    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut guard = self
            .courses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(course.id().clone(), course.clone());
        Ok(())
    }

    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        let guard = self
            .courses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(id).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let guard = self
            .courses
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut courses: Vec<Course> = guard.values().cloned().collect();
        courses.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(courses)
    }

    async fn delete_course(&self, id: &CourseId) -> Result<(), StorageError> {
        {
            let mut guard = self
                .courses
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            guard.remove(id).ok_or(StorageError::NotFound)?;
        }
        self.questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .retain(|_, q| q.course_id() != id);
        self.results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .retain(|(course_id, _), _| course_id != id);
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        if !self.course_exists(question.course_id())? {
            return Err(StorageError::NotFound);
        }
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(question.id().clone(), question.clone());
        Ok(())
    }

    async fn get_question(&self, id: &QuestionId) -> Result<Option<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(id).cloned())
    }

    async fn list_questions(&self, course_id: &CourseId) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut found: Vec<Question> = guard
            .values()
            .filter(|q| q.course_id() == course_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.difficulty()
                .cmp(&b.difficulty())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(found)
    }

    async fn delete_question(&self, id: &QuestionId) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(id).map(|_| ()).ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl DiagnosticResultRepository for InMemoryRepository {
    async fn save_result(
        &self,
        student: &StudentId,
        result: &DiagnosticResult,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        if !self.course_exists(result.course_id())? {
            return Err(StorageError::NotFound);
        }
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            (result.course_id().clone(), student.clone()),
            StoredResult {
                student: student.clone(),
                result: result.clone(),
                completed_at,
            },
        );
        Ok(())
    }

    async fn get_result(
        &self,
        student: &StudentId,
        course_id: &CourseId,
    ) -> Result<Option<StoredResult>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&(course_id.clone(), student.clone())).cloned())
    }

    async fn list_results(&self, course_id: &CourseId) -> Result<Vec<StoredResult>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut found: Vec<StoredResult> = guard
            .iter()
            .filter(|((course, _), _)| course == course_id)
            .map(|(_, stored)| stored.clone())
            .collect();
        found.sort_by(|a, b| {
            b.completed_at
                .cmp(&a.completed_at)
                .then_with(|| a.student.cmp(&b.student))
        });
        Ok(found)
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub courses: Arc<dyn CourseRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub results: Arc<dyn DiagnosticResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let courses: Arc<dyn CourseRepository> = Arc::new(repo.clone());
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let results: Arc<dyn DiagnosticResultRepository> = Arc::new(repo);
        Self {
            courses,
            questions,
            results,
        }
    }
}
