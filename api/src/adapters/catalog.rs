//! Static course catalog
//!
//! The school's course list changes rarely enough to live in code.

use async_trait::async_trait;

use crate::domain::entities::{standard_courses, Course, CourseId};
use crate::domain::ports::CourseCatalog;
use crate::error::DomainError;

pub struct StaticCourseCatalog {
    courses: Vec<Course>,
}

impl StaticCourseCatalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// The catalog of courses currently offered
    pub fn standard() -> Self {
        Self::new(standard_courses())
    }
}

#[async_trait]
impl CourseCatalog for StaticCourseCatalog {
    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, DomainError> {
        Ok(self.courses.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Course>, DomainError> {
        Ok(self.courses.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_known_course() {
        let catalog = StaticCourseCatalog::standard();
        let course = catalog.find_by_id(CourseId(5)).await.unwrap().unwrap();
        assert_eq!(course.name, "Veena");
        assert!(catalog.find_by_id(CourseId(42)).await.unwrap().is_none());
    }
}
