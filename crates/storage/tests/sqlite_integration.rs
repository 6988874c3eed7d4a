use chrono::Duration;
use quiz_core::model::{
    Course, CourseId, DiagnosticResult, Question, QuestionAttempt, QuestionDraft, QuestionId,
    StudentId,
};
use quiz_core::time::fixed_now;
use storage::repository::{
    CourseRepository, DiagnosticResultRepository, QuestionRepository, Storage, StorageError,
};
use storage::sqlite::SqliteRepository;
use storage::starter::load_starter;

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn course(id: &str) -> Course {
    Course::new(CourseId::new(id).unwrap(), id.to_uppercase(), "Integration course").unwrap()
}

fn question(id: &str, course_id: &CourseId, difficulty: i64, target: u32) -> Question {
    QuestionDraft::new(course_id.clone(), format!("Statement {id}"), "42")
        .with_id(QuestionId::new(id).unwrap())
        .with_difficulty(difficulty)
        .with_target_time(target)
        .validate()
        .unwrap()
}

#[tokio::test]
async fn sqlite_question_bank_roundtrip() {
    let repo = connect("memdb_questions").await;
    let c = course("algebra");
    repo.insert_course(&c).await.unwrap();
    assert!(matches!(
        repo.insert_course(&c).await,
        Err(StorageError::Conflict)
    ));

    let hard = question("alg-hard", c.id(), 8, 120);
    let easy = question("alg-easy", c.id(), 2, 20);
    repo.upsert_question(&hard).await.unwrap();
    repo.upsert_question(&easy).await.unwrap();

    let listed = repo.list_questions(c.id()).await.unwrap();
    assert_eq!(listed, vec![easy.clone(), hard.clone()]);

    let edited = hard.to_draft().with_difficulty(9).validate().unwrap();
    repo.upsert_question(&edited).await.unwrap();
    let fetched = repo.get_question(hard.id()).await.unwrap().unwrap();
    assert_eq!(fetched.difficulty().value(), 9);
    assert_eq!(fetched.target_time_secs(), 120);

    repo.delete_question(easy.id()).await.unwrap();
    assert!(repo.get_question(easy.id()).await.unwrap().is_none());
    assert!(matches!(
        repo.delete_question(easy.id()).await,
        Err(StorageError::NotFound)
    ));

    let orphan = question("orphan", &CourseId::new("nowhere").unwrap(), 3, 30);
    assert!(matches!(
        repo.upsert_question(&orphan).await,
        Err(StorageError::NotFound)
    ));
}

#[tokio::test]
async fn sqlite_result_store_keeps_latest_per_student() {
    let repo = connect("memdb_results").await;
    let c = course("geometry");
    repo.upsert_course(&c).await.unwrap();
    let q1 = question("g-1", c.id(), 4, 30);
    let q2 = question("g-2", c.id(), 5, 45);
    let ada = StudentId::new("ada").unwrap();
    let bob = StudentId::new("bob").unwrap();

    let first = DiagnosticResult::from_attempts(
        c.id().clone(),
        vec![QuestionAttempt::answered(&q1, false, 20)],
    )
    .unwrap();
    let second = DiagnosticResult::from_attempts(
        c.id().clone(),
        vec![
            QuestionAttempt::answered(&q1, true, 12),
            QuestionAttempt::timed_out(&q2),
        ],
    )
    .unwrap();

    repo.save_result(&ada, &first, fixed_now()).await.unwrap();
    repo.save_result(&ada, &second, fixed_now() + Duration::minutes(5))
        .await
        .unwrap();
    repo.save_result(&bob, &first, fixed_now()).await.unwrap();

    let stored = repo.get_result(&ada, c.id()).await.unwrap().unwrap();
    assert_eq!(stored.result, second);
    assert_eq!(stored.completed_at, fixed_now() + Duration::minutes(5));
    assert_eq!(stored.result.attempts()[1].time_taken_secs(), 45);

    let listed = repo.list_results(c.id()).await.unwrap();
    let students: Vec<&str> = listed.iter().map(|r| r.student.as_str()).collect();
    assert_eq!(students, vec!["ada", "bob"]);

    repo.delete_course(c.id()).await.unwrap();
    assert!(repo.get_result(&ada, c.id()).await.unwrap().is_none());
}

#[tokio::test]
async fn storage_sqlite_loads_starter_data() {
    let storage = Storage::sqlite("sqlite:file:memdb_starter?mode=memory&cache=shared")
        .await
        .expect("storage");
    let summary = load_starter(&storage).await.unwrap();
    assert_eq!(summary.courses, 6);

    let calculus = CourseId::new("calculus").unwrap();
    let questions = storage.questions.list_questions(&calculus).await.unwrap();
    let difficulties: Vec<u8> = questions.iter().map(|q| q.difficulty().value()).collect();
    assert_eq!(difficulties, vec![5, 6, 7]);
}
