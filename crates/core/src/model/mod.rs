mod attempt;
mod course;
mod difficulty;
mod ids;
mod question;
mod result;

pub use attempt::QuestionAttempt;
pub use course::{Course, CourseError};
pub use difficulty::{Difficulty, DifficultyError};
pub use ids::{CourseId, MAX_ID_LEN, ParseIdError, QuestionId, SessionId, StudentId};
pub use question::{Question, QuestionDraft, QuestionError};
pub use result::DiagnosticResult;
