use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{CourseId, DiagnosticResult, StudentId};
use quiz_core::session::{CompletionReason, SessionError};
use quiz_core::time::fixed_now;
use services::{Clock, ResultsService, SessionLoopError, SessionLoopService};
use storage::repository::{
    DiagnosticResultRepository, InMemoryRepository, Storage, StorageError, StoredResult,
};
use storage::starter::load_starter;

async fn seeded() -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    let storage = Storage {
        courses: Arc::new(repo.clone()),
        questions: Arc::new(repo.clone()),
        results: Arc::new(repo.clone()),
    };
    load_starter(&storage).await.unwrap();
    repo
}

fn loop_service(repo: &InMemoryRepository) -> SessionLoopService {
    SessionLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    )
}

fn arithmetic() -> CourseId {
    CourseId::new("arithmetic").unwrap()
}

fn student() -> StudentId {
    StudentId::new("ada").unwrap()
}

#[tokio::test]
async fn diagnostic_persists_one_result() {
    let repo = seeded().await;
    let svc = loop_service(&repo);

    let mut session = svc
        .start_diagnostic(student(), arithmetic(), Some(4))
        .await
        .unwrap();
    assert_eq!(session.current_question().unwrap().id().as_str(), "arith-4");

    let mut saves = 0;
    while !session.is_complete() {
        let answer = session.current_question().unwrap().correct_answer().to_owned();
        let outcome = svc
            .answer_current_with_time(&mut session, &answer, 5)
            .await
            .unwrap();
        assert!(outcome.step.feedback.starts_with("Correct"));
        if outcome.saved {
            saves += 1;
        }
    }
    assert_eq!(saves, 1);
    assert!(session.is_saved());

    let report = session.report().unwrap();
    assert_eq!(report.reason, CompletionReason::LengthReached);
    assert_eq!(report.attempts.len(), 4);

    let stored = repo
        .get_result(&student(), &arithmetic())
        .await
        .unwrap()
        .expect("result saved");
    assert_eq!(stored.result.correct_percentage(), 100);
    assert_eq!(Some(&stored.result), report.result.as_ref());

    let results = ResultsService::new(Arc::new(repo.clone()), Arc::new(repo.clone()));
    let summary = results
        .student_report(&student(), &arithmetic())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(summary.series.len(), 4);
    assert_eq!(summary.insights.accuracy_remark, "Excellent understanding");
}

#[tokio::test]
async fn timeouts_and_exhaustion_complete_with_partial_result() {
    let repo = seeded().await;
    let svc = loop_service(&repo);
    let calculus = CourseId::new("calculus").unwrap();

    let mut session = svc
        .start_diagnostic(student(), calculus.clone(), None)
        .await
        .unwrap();
    let first = svc.timeout_current(&mut session).await.unwrap();
    assert!(first.step.feedback.starts_with("Incorrect"));
    assert!(!first.step.attempt.correct());

    while !session.is_complete() {
        svc.timeout_current(&mut session).await.unwrap();
    }

    let report = session.report().unwrap();
    assert_eq!(report.reason, CompletionReason::PoolExhausted);
    assert_eq!(report.attempts.len(), 3);
    assert!(session.is_saved());
    let stored = repo.get_result(&student(), &calculus).await.unwrap().unwrap();
    assert_eq!(stored.result.correct_percentage(), 0);
}

#[tokio::test]
async fn practice_and_stopped_sessions_are_not_saved() {
    let repo = seeded().await;
    let svc = loop_service(&repo);
    let algebra = CourseId::new("algebra").unwrap();

    let mut practice = svc.start_practice(student(), algebra.clone()).await.unwrap();
    while !practice.is_complete() {
        let outcome = svc
            .answer_current_with_time(&mut practice, "no idea", 3)
            .await
            .unwrap();
        assert!(!outcome.saved);
    }
    assert!(practice.report().unwrap().result.is_none());

    let mut stopped = svc
        .start_diagnostic(student(), algebra.clone(), None)
        .await
        .unwrap();
    svc.answer_current_with_time(&mut stopped, "5", 3).await.unwrap();
    let report = svc.finish(&mut stopped).await.unwrap();
    assert_eq!(report.reason, CompletionReason::Stopped);
    assert!(report.result.is_some());
    assert!(!stopped.needs_save());

    assert!(repo.get_result(&student(), &algebra).await.unwrap().is_none());
}

#[tokio::test]
async fn start_rejects_unknown_or_empty_course() {
    let repo = seeded().await;
    let svc = loop_service(&repo);

    let err = svc
        .start_diagnostic(student(), CourseId::new("astronomy").unwrap(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionLoopError::CourseNotFound(_)));

    let empty = quiz_core::model::Course::from_name("Topology", "No questions yet").unwrap();
    storage::repository::CourseRepository::upsert_course(&repo, &empty)
        .await
        .unwrap();
    let err = svc
        .start_practice(student(), empty.id().clone())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionLoopError::Session(SessionError::PoolExhausted { .. })
    ));

    let err = svc
        .start_diagnostic(student(), arithmetic(), Some(0))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionLoopError::Config(_)));
}

/// Result store whose first write fails.
struct FlakyResults {
    inner: InMemoryRepository,
    failed_once: AtomicBool,
}

#[async_trait]
impl DiagnosticResultRepository for FlakyResults {
    async fn save_result(
        &self,
        student: &StudentId,
        result: &DiagnosticResult,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        if !self.failed_once.swap(true, Ordering::SeqCst) {
            return Err(StorageError::Connection("disk full".into()));
        }
        self.inner.save_result(student, result, completed_at).await
    }

    async fn get_result(
        &self,
        student: &StudentId,
        course_id: &CourseId,
    ) -> Result<Option<StoredResult>, StorageError> {
        self.inner.get_result(student, course_id).await
    }

    async fn list_results(&self, course_id: &CourseId) -> Result<Vec<StoredResult>, StorageError> {
        self.inner.list_results(course_id).await
    }
}

#[tokio::test]
async fn failed_save_can_be_retried() {
    let repo = seeded().await;
    let svc = SessionLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(FlakyResults {
            inner: repo.clone(),
            failed_once: AtomicBool::new(false),
        }),
    );

    let mut session = svc
        .start_diagnostic(student(), arithmetic(), Some(1))
        .await
        .unwrap();
    let err = svc
        .answer_current_with_time(&mut session, "645", 10)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionLoopError::Storage(_)));
    assert!(session.is_complete());
    assert!(session.needs_save());

    assert!(svc.save_pending(&mut session).await.unwrap());
    assert!(!svc.save_pending(&mut session).await.unwrap());
    assert!(repo.get_result(&student(), &arithmetic()).await.unwrap().is_some());
}
