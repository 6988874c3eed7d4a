use std::sync::Arc;

use quiz_core::model::{Course, CourseId, Difficulty, Question, QuestionDraft, QuestionId};
use storage::repository::{CourseRepository, QuestionRepository, StorageError};

use crate::error::CourseServiceError;

/// Course and question-bank management for teachers.
#[derive(Clone)]
pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl CourseService {
    #[must_use]
    pub fn new(courses: Arc<dyn CourseRepository>, questions: Arc<dyn QuestionRepository>) -> Self {
        Self { courses, questions }
    }

    /// Create a course whose id is derived from its name.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Course` for validation failures and
    /// `CourseServiceError::CourseExists` if the derived id is taken.
    pub async fn create_course(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Course, CourseServiceError> {
        let course = Course::from_name(name, description)?;
        match self.courses.insert_course(&course).await {
            Ok(()) => {
                tracing::info!(course = %course.id(), "course created");
                Ok(course)
            }
            Err(StorageError::Conflict) => Err(CourseServiceError::CourseExists(course.id().clone())),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a course's name and description, keeping its id.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::CourseNotFound` if the course does not exist.
    pub async fn edit_course(
        &self,
        id: &CourseId,
        name: &str,
        description: &str,
    ) -> Result<Course, CourseServiceError> {
        self.require_course(id).await?;
        let course = Course::new(id.clone(), name, description)?;
        self.courses.upsert_course(&course).await?;
        Ok(course)
    }

    /// Delete a course with its questions and results.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::CourseNotFound` if the course does not exist.
    pub async fn delete_course(&self, id: &CourseId) -> Result<(), CourseServiceError> {
        match self.courses.delete_course(id).await {
            Ok(()) => {
                tracing::info!(course = %id, "course deleted");
                Ok(())
            }
            Err(StorageError::NotFound) => Err(CourseServiceError::CourseNotFound(id.clone())),
            Err(e) => Err(e.into()),
        }
    }

    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if repository access fails.
    pub async fn list_courses(&self) -> Result<Vec<Course>, CourseServiceError> {
        Ok(self.courses.list_courses().await?)
    }

    /// Fetch a course by id.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::CourseNotFound` if the course does not exist.
    pub async fn get_course(&self, id: &CourseId) -> Result<Course, CourseServiceError> {
        self.require_course(id).await
    }

    /// Validate and store a new question.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Question` for validation failures and
    /// `CourseServiceError::CourseNotFound` if the draft's course does not exist.
    pub async fn add_question(&self, draft: QuestionDraft) -> Result<Question, CourseServiceError> {
        let question = draft.validate()?;
        self.require_course(question.course_id()).await?;
        self.questions.upsert_question(&question).await?;
        tracing::info!(
            course = %question.course_id(),
            question = %question.id(),
            difficulty = question.difficulty().value(),
            "question added"
        );
        Ok(question)
    }

    /// Replace an existing question. The draft's id is ignored in favor of `id`.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::QuestionNotFound` if no question has `id`,
    /// or validation and storage errors.
    pub async fn edit_question(
        &self,
        id: &QuestionId,
        draft: QuestionDraft,
    ) -> Result<Question, CourseServiceError> {
        if self.questions.get_question(id).await?.is_none() {
            return Err(CourseServiceError::QuestionNotFound(id.clone()));
        }
        let question = draft.with_id(id.clone()).validate()?;
        self.require_course(question.course_id()).await?;
        self.questions.upsert_question(&question).await?;
        Ok(question)
    }

    /// # Errors
    ///
    /// Returns `CourseServiceError::QuestionNotFound` if no question has `id`.
    pub async fn delete_question(&self, id: &QuestionId) -> Result<(), CourseServiceError> {
        match self.questions.delete_question(id).await {
            Ok(()) => Ok(()),
            Err(StorageError::NotFound) => Err(CourseServiceError::QuestionNotFound(id.clone())),
            Err(e) => Err(e.into()),
        }
    }

    /// Questions of a course ordered by difficulty, optionally only one level.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::CourseNotFound` if the course does not exist.
    pub async fn list_questions(
        &self,
        course_id: &CourseId,
        difficulty: Option<Difficulty>,
    ) -> Result<Vec<Question>, CourseServiceError> {
        self.require_course(course_id).await?;
        let mut questions = self.questions.list_questions(course_id).await?;
        if let Some(level) = difficulty {
            questions.retain(|q| q.difficulty() == level);
        }
        Ok(questions)
    }

    async fn require_course(&self, id: &CourseId) -> Result<Course, CourseServiceError> {
        self.courses
            .get_course(id)
            .await?
            .ok_or_else(|| CourseServiceError::CourseNotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::Storage;

    fn service() -> CourseService {
        let storage = Storage::in_memory();
        CourseService::new(storage.courses, storage.questions)
    }

    #[tokio::test]
    async fn create_course_rejects_duplicate_names() {
        let svc = service();
        let course = svc
            .create_course("Linear Algebra", "Vectors and matrices")
            .await
            .unwrap();
        assert_eq!(course.id().as_str(), "linear-algebra");

        let err = svc
            .create_course("linear algebra", "Again")
            .await
            .unwrap_err();
        assert!(matches!(err, CourseServiceError::CourseExists(_)));
    }

    #[tokio::test]
    async fn questions_filter_by_difficulty() {
        let svc = service();
        let course = svc.create_course("Algebra", "Equations").await.unwrap();
        for d in [2, 4, 4, 7] {
            svc.add_question(
                QuestionDraft::new(course.id().clone(), format!("Level {d}"), "x").with_difficulty(d),
            )
            .await
            .unwrap();
        }

        let all = svc.list_questions(course.id(), None).await.unwrap();
        assert_eq!(all.len(), 4);
        let level4 = svc
            .list_questions(course.id(), Some(Difficulty::new(4).unwrap()))
            .await
            .unwrap();
        assert_eq!(level4.len(), 2);
    }

    #[tokio::test]
    async fn edit_and_delete_question() {
        let svc = service();
        let course = svc.create_course("Geometry", "Shapes").await.unwrap();
        let q = svc
            .add_question(QuestionDraft::new(course.id().clone(), "Area of 2x3?", "6"))
            .await
            .unwrap();

        let edited = svc
            .edit_question(
                q.id(),
                QuestionDraft::new(course.id().clone(), "Area of 3x3?", "9").with_target_time(25),
            )
            .await
            .unwrap();
        assert_eq!(edited.id(), q.id());
        assert_eq!(edited.target_time_secs(), 25);

        svc.delete_question(q.id()).await.unwrap();
        assert!(matches!(
            svc.delete_question(q.id()).await,
            Err(CourseServiceError::QuestionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn question_for_unknown_course_is_rejected() {
        let svc = service();
        let err = svc
            .add_question(QuestionDraft::new(CourseId::new("nope").unwrap(), "1+1", "2"))
            .await
            .unwrap_err();
        assert!(matches!(err, CourseServiceError::CourseNotFound(_)));
    }
}
