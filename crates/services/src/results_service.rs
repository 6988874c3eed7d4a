use std::sync::Arc;

use quiz_core::insights::{PerformanceSeries, ResultInsights};
use quiz_core::model::{CourseId, StudentId};
use serde::Serialize;
use storage::repository::{CourseRepository, DiagnosticResultRepository, StoredResult};

use crate::error::ResultsServiceError;

/// A stored result with everything the results screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultReport {
    pub stored: StoredResult,
    pub insights: ResultInsights,
    pub series: PerformanceSeries,
}

impl ResultReport {
    #[must_use]
    pub fn from_stored(stored: StoredResult) -> Self {
        let insights = ResultInsights::from_result(&stored.result);
        let series = PerformanceSeries::from_attempts(stored.result.attempts());
        Self {
            stored,
            insights,
            series,
        }
    }
}

/// Read side of the result store.
#[derive(Clone)]
pub struct ResultsService {
    courses: Arc<dyn CourseRepository>,
    results: Arc<dyn DiagnosticResultRepository>,
}

impl ResultsService {
    #[must_use]
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        results: Arc<dyn DiagnosticResultRepository>,
    ) -> Self {
        Self { courses, results }
    }

    /// The student's latest diagnostic result in a course, if any.
    ///
    /// # Errors
    ///
    /// Returns `ResultsServiceError::CourseNotFound` for an unknown course.
    pub async fn student_report(
        &self,
        student: &StudentId,
        course_id: &CourseId,
    ) -> Result<Option<ResultReport>, ResultsServiceError> {
        self.require_course(course_id).await?;
        let stored = self.results.get_result(student, course_id).await?;
        Ok(stored.map(ResultReport::from_stored))
    }

    /// Every student's result in a course, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `ResultsServiceError::CourseNotFound` for an unknown course.
    pub async fn course_results(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<StoredResult>, ResultsServiceError> {
        self.require_course(course_id).await?;
        Ok(self.results.list_results(course_id).await?)
    }

    async fn require_course(&self, id: &CourseId) -> Result<(), ResultsServiceError> {
        match self.courses.get_course(id).await? {
            Some(_) => Ok(()),
            None => Err(ResultsServiceError::CourseNotFound(id.clone())),
        }
    }
}
