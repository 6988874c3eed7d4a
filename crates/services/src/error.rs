//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{CourseError, CourseId, ParseIdError, QuestionError, QuestionId};
use quiz_core::session::{ConfigError, SessionError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use storage::starter::SeedError;

/// Errors emitted by `CourseService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseServiceError {
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error("course {0} already exists")]
    CourseExists(CourseId),
    #[error("question {0} not found")]
    QuestionNotFound(QuestionId),
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SessionLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionLoopError {
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ResultsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultsServiceError {
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
