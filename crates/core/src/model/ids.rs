use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest slug accepted for any identifier.
pub const MAX_ID_LEN: usize = 64;

// ─── Slug validation ───────────────────────────────────────────────────────────

/// Error type for parsing an ID from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
    reason: &'static str,
}

impl ParseIdError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.kind, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

fn parse_slug(kind: &'static str, raw: &str) -> Result<String, ParseIdError> {
    let slug = raw.trim().to_lowercase();
    if slug.is_empty() {
        return Err(ParseIdError {
            kind,
            reason: "empty",
        });
    }
    if slug.len() > MAX_ID_LEN {
        return Err(ParseIdError {
            kind,
            reason: "too long",
        });
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ParseIdError {
            kind,
            reason: "only a-z, 0-9, '-' and '_' are allowed",
        });
    }
    Ok(slug)
}

// ─── Identifiers ───────────────────────────────────────────────────────────────

/// Unique identifier for a Course (e.g. `algebra`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseId(String);

impl CourseId {
    /// Parses a course slug.
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the slug is empty, too long or has invalid characters.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ParseIdError> {
        parse_slug("CourseId", raw.as_ref()).map(Self)
    }

    /// Derives a slug from a display name: lowercased, whitespace runs become `-`,
    /// anything else outside the slug alphabet is dropped.
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if nothing usable remains.
    pub fn from_name(name: &str) -> Result<Self, ParseIdError> {
        let joined = name
            .split_whitespace()
            .map(|word| {
                word.chars()
                    .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                    .collect::<String>()
            })
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        Self::new(joined)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for a Question (e.g. `alg-3`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId(String);

impl QuestionId {
    /// Parses a question slug.
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the slug is empty, too long or has invalid characters.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ParseIdError> {
        parse_slug("QuestionId", raw.as_ref()).map(Self)
    }

    /// Fresh id for a question authored without one.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("q-{}", uuid::Uuid::new_v4().simple()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifies the learner a result belongs to.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentId(String);

impl StudentId {
    /// Parses a student handle.
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the handle is empty, too long or has invalid characters.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ParseIdError> {
        parse_slug("StudentId", raw.as_ref()).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifies one run of an adaptive session, mainly for log correlation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    #[must_use]
    pub fn new_random() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    #[must_use]
    pub fn value(&self) -> uuid::Uuid {
        self.0
    }
}

// ─── Debug / Display ───────────────────────────────────────────────────────────

impl fmt::Debug for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CourseId({})", self.0)
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Debug for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StudentId({})", self.0)
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr / serde conversions ───────────────────────────────────────────────

impl FromStr for CourseId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for StudentId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CourseId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for QuestionId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for StudentId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CourseId> for String {
    fn from(value: CourseId) -> Self {
        value.0
    }
}

impl From<QuestionId> for String {
    fn from(value: QuestionId) -> Self {
        value.0
    }
}

impl From<StudentId> for String {
    fn from(value: StudentId) -> Self {
        value.0
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_id_is_normalized() {
        let id: CourseId = "  Algebra ".parse().unwrap();
        assert_eq!(id.as_str(), "algebra");
        assert_eq!(id.to_string(), "algebra");
    }

    #[test]
    fn course_id_from_name_joins_words() {
        let id = CourseId::from_name("Linear  Algebra II").unwrap();
        assert_eq!(id.as_str(), "linear-algebra-ii");
    }

    #[test]
    fn course_id_from_symbol_only_name_fails() {
        assert!(CourseId::from_name("∫ ∑").is_err());
    }

    #[test]
    fn question_id_rejects_spaces() {
        let err = "alg 1".parse::<QuestionId>().unwrap_err();
        assert_eq!(err.kind(), "QuestionId");
    }

    #[test]
    fn empty_ids_are_rejected() {
        assert!(CourseId::new("   ").is_err());
        assert!(StudentId::new("").is_err());
    }

    #[test]
    fn overlong_ids_are_rejected() {
        let raw = "a".repeat(MAX_ID_LEN + 1);
        assert!(QuestionId::new(raw).is_err());
    }

    #[test]
    fn generated_question_ids_are_valid_and_distinct() {
        let a = QuestionId::generate();
        let b = QuestionId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("q-"));
        assert!(QuestionId::new(a.as_str()).is_ok());
    }
}
