use std::sync::Arc;

use storage::repository::Storage;
use storage::starter::load_starter;

use crate::Clock;
use crate::course_service::CourseService;
use crate::error::AppServicesError;
use crate::results_service::ResultsService;
use crate::session_loop::SessionLoopService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    seeded_on_launch: bool,
    courses: Arc<CourseService>,
    session_loop: Arc<SessionLoopService>,
    results: Arc<ResultsService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// An empty database receives the starter courses and questions.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or seeding fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage, clock).await
    }

    /// Build services over any storage, seeding it when it holds no course.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if seeding fails.
    pub async fn from_storage(storage: Storage, clock: Clock) -> Result<Self, AppServicesError> {
        let seeded_on_launch = if storage.courses.list_courses().await?.is_empty() {
            let summary = load_starter(&storage).await?;
            tracing::info!(
                courses = summary.courses,
                questions = summary.questions,
                "empty database seeded with starter data"
            );
            true
        } else {
            false
        };

        let courses = Arc::new(CourseService::new(
            Arc::clone(&storage.courses),
            Arc::clone(&storage.questions),
        ));
        let session_loop = Arc::new(
            SessionLoopService::new(
                clock,
                Arc::clone(&storage.courses),
                Arc::clone(&storage.questions),
                Arc::clone(&storage.results),
            )
            .with_shuffle(!clock.is_fixed()),
        );
        let results = Arc::new(ResultsService::new(
            Arc::clone(&storage.courses),
            Arc::clone(&storage.results),
        ));

        Ok(Self {
            seeded_on_launch,
            courses,
            session_loop,
            results,
        })
    }

    #[must_use]
    pub fn seeded_on_launch(&self) -> bool {
        self.seeded_on_launch
    }

    #[must_use]
    pub fn courses(&self) -> Arc<CourseService> {
        Arc::clone(&self.courses)
    }

    #[must_use]
    pub fn session_loop(&self) -> Arc<SessionLoopService> {
        Arc::clone(&self.session_loop)
    }

    #[must_use]
    pub fn results(&self) -> Arc<ResultsService> {
        Arc::clone(&self.results)
    }
}
