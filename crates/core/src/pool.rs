use std::collections::HashSet;

use crate::model::{CourseId, Difficulty, Question, QuestionId};

/// In-memory question bank slice for one session.
///
/// Question order is significant: among equally good candidates the earlier
/// one wins, so callers that want variety shuffle before building the pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionPool {
    questions: Vec<Question>,
}

impl QuestionPool {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Keeps only the questions that belong to `course_id`.
    #[must_use]
    pub fn for_course(self, course_id: &CourseId) -> Self {
        Self {
            questions: self
                .questions
                .into_iter()
                .filter(|q| q.course_id() == course_id)
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question closest to `target` that is not in `presented`.
    ///
    /// Exact matches win; otherwise the smallest distance, with ties going to
    /// the easier question, then to pool order.
    #[must_use]
    pub fn nearest_unpresented(
        &self,
        target: Difficulty,
        presented: &HashSet<QuestionId>,
    ) -> Option<&Question> {
        self.questions
            .iter()
            .enumerate()
            .filter(|(_, q)| !presented.contains(q.id()))
            .min_by_key(|(idx, q)| (q.difficulty().distance(target), q.difficulty(), *idx))
            .map(|(_, q)| q)
    }

    /// Number of questions not yet presented.
    #[must_use]
    pub fn remaining(&self, presented: &HashSet<QuestionId>) -> usize {
        self.questions
            .iter()
            .filter(|q| !presented.contains(q.id()))
            .count()
    }
}

impl FromIterator<Question> for QuestionPool {
    fn from_iter<T: IntoIterator<Item = Question>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
