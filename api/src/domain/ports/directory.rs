//! Reference data ports
//!
//! The student directory and the course catalog are owned by other systems.
//! The core reads them and never writes.

use async_trait::async_trait;

use crate::domain::entities::{Course, CourseId, StudentId, StudentProfile};
use crate::error::DomainError;

/// Read-only access to student profiles
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    /// Find a student's profile
    async fn find_by_id(&self, id: &StudentId) -> Result<Option<StudentProfile>, DomainError>;
}

/// Read-only access to the course catalog
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// Find a course by ID
    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, DomainError>;

    /// List every course offered
    async fn list(&self) -> Result<Vec<Course>, DomainError>;
}
