//! PostgreSQL adapter for StudentDirectory
//!
//! Reads the `profiles` table kept in sync by the identity provider.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::domain::entities::{StudentId, StudentProfile};
use crate::domain::ports::StudentDirectory;
use crate::entity::profiles;
use crate::error::DomainError;

/// PostgreSQL implementation of StudentDirectory
pub struct PostgresStudentDirectory {
    db: DatabaseConnection,
}

impl PostgresStudentDirectory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudentDirectory for PostgresStudentDirectory {
    async fn find_by_id(&self, id: &StudentId) -> Result<Option<StudentProfile>, DomainError> {
        let result = profiles::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }
}

/// Convert SeaORM model to domain entity
impl From<profiles::Model> for StudentProfile {
    fn from(model: profiles::Model) -> Self {
        StudentProfile {
            id: StudentId(model.id),
            full_name: model.full_name,
            phone_number: model.phone_number,
            age: model.age,
        }
    }
}
