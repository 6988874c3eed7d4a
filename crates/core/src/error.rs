use thiserror::Error;

use crate::adaptive::PolicyError;
use crate::model::{CourseError, DifficultyError, ParseIdError, QuestionError};
use crate::scoring::ScoreError;
use crate::session::{ConfigError, SessionError};

/// Any error the core crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error(transparent)]
    Difficulty(#[from] DifficultyError),
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
