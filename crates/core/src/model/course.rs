use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CourseId, ParseIdError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course name cannot be empty")]
    EmptyName,

    #[error("course description cannot be empty")]
    EmptyDescription,

    #[error("invalid course id: {0}")]
    InvalidId(#[source] ParseIdError),
}

/// A subject students can take diagnostics and practice in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCourse")]
pub struct Course {
    id: CourseId,
    name: String,
    description: String,
}

#[derive(Deserialize)]
struct RawCourse {
    id: CourseId,
    name: String,
    description: String,
}

impl TryFrom<RawCourse> for Course {
    type Error = CourseError;

    fn try_from(raw: RawCourse) -> Result<Self, Self::Error> {
        Course::new(raw.id, raw.name, raw.description)
    }
}

impl Course {
    /// Creates a course with trimmed, non-empty name and description.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyName` / `CourseError::EmptyDescription`.
    pub fn new(
        id: CourseId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, CourseError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(CourseError::EmptyName);
        }
        let description = description.into().trim().to_owned();
        if description.is_empty() {
            return Err(CourseError::EmptyDescription);
        }
        Ok(Self {
            id,
            name,
            description,
        })
    }

    /// Creates a course whose id is derived from its name.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if the name or description are empty or the name
    /// yields no usable slug.
    pub fn from_name(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, CourseError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CourseError::EmptyName);
        }
        let id = CourseId::from_name(&name).map_err(CourseError::InvalidId)?;
        Self::new(id, name, description)
    }

    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_requires_name_and_description() {
        let id = CourseId::new("algebra").unwrap();
        assert_eq!(
            Course::new(id.clone(), "  ", "x").unwrap_err(),
            CourseError::EmptyName
        );
        assert_eq!(
            Course::new(id, "Algebra", "").unwrap_err(),
            CourseError::EmptyDescription
        );
    }

    #[test]
    fn course_from_name_derives_slug() {
        let course = Course::from_name("Number Theory", "Primes and divisibility").unwrap();
        assert_eq!(course.id().as_str(), "number-theory");
        assert_eq!(course.name(), "Number Theory");
    }

    #[test]
    fn deserialize_rejects_blank_name() {
        let ok = r#"{"id":"algebra","name":" Algebra ","description":"Equations"}"#;
        assert_eq!(serde_json::from_str::<Course>(ok).unwrap().name(), "Algebra");

        let blank = r#"{"id":"algebra","name":"","description":"Equations"}"#;
        assert!(serde_json::from_str::<Course>(blank).is_err());
    }
}
