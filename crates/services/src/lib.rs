#![forbid(unsafe_code)]

pub mod app_services;
pub mod course_service;
pub mod error;
pub mod results_service;
pub mod session_loop;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use course_service::CourseService;
pub use error::{AppServicesError, CourseServiceError, ResultsServiceError, SessionLoopError};
pub use results_service::{ResultReport, ResultsService};
pub use session_loop::{SessionAnswerResult, SessionLoopService, StudentSession};
