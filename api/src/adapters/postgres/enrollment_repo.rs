//! PostgreSQL adapter for EnrollmentRepository
//!
//! Activation and archive bump the single row in `roster_versions` inside the same
//! transaction that changes the enrollment. Activation only proceeds when the bump
//! matches the caller's snapshot version, which makes accept a compare-and-swap.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IsolationLevel,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    CourseId, DayOfWeek, Enrollment, EnrollmentId, EnrollmentStatus, NewEnrollment,
    PreferredDays, SlotTime, StudentId,
};
use crate::domain::ports::{ActivationOutcome, EnrollmentRepository, RosterSnapshot};
use crate::entity::{enrollments, roster_versions};
use crate::error::DomainError;

const ROSTER_ROW: i32 = 1;

/// PostgreSQL implementation of EnrollmentRepository
pub struct PostgresEnrollmentRepository {
    db: DatabaseConnection,
}

impl PostgresEnrollmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_by_status(&self, status: EnrollmentStatus) -> Result<Vec<Enrollment>, DomainError> {
        let results = enrollments::Entity::find()
            .filter(enrollments::Column::Status.eq(status.to_string()))
            .order_by_asc(enrollments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        to_enrollments(results)
    }
}

#[async_trait]
impl EnrollmentRepository for PostgresEnrollmentRepository {
    async fn find_by_id(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, DomainError> {
        let result = enrollments::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Enrollment::try_from).transpose()
    }

    async fn create(&self, enrollment: &NewEnrollment) -> Result<Enrollment, DomainError> {
        let model = enrollments::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(enrollment.student_id.0),
            course_id: Set(enrollment.course_id.0),
            preferred_days: Set(day_names(&enrollment.preferred_days)),
            preferred_time: Set(enrollment.preferred_start.to_naive_time()),
            status: Set(EnrollmentStatus::Pending.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
            activated_at: Set(None),
            archived_at: Set(None),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.try_into()
    }

    async fn find_pending(&self) -> Result<Vec<Enrollment>, DomainError> {
        self.find_by_status(EnrollmentStatus::Pending).await
    }

    async fn find_active_by_day(&self, day: DayOfWeek) -> Result<Vec<Enrollment>, DomainError> {
        let mut active = self.find_by_status(EnrollmentStatus::Active).await?;
        active.retain(|e| e.meets_on(day));
        active.sort_by_key(|e| e.preferred_start);
        Ok(active)
    }

    async fn find_active_by_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<Enrollment>, DomainError> {
        let results = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id.0))
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .order_by_asc(enrollments::Column::PreferredTime)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        to_enrollments(results)
    }

    async fn active_roster(&self) -> Result<RosterSnapshot, DomainError> {
        // version and rows must come from the same snapshot
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::RepeatableRead), Some(AccessMode::ReadOnly))
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let version = roster_versions::Entity::find_by_id(ROSTER_ROW)
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .map(|row| row.version)
            .unwrap_or(0);

        let results = enrollments::Entity::find()
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .order_by_asc(enrollments::Column::PreferredTime)
            .all(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(RosterSnapshot {
            version,
            enrollments: to_enrollments(results)?,
        })
    }

    async fn activate(
        &self,
        id: &EnrollmentId,
        days: &PreferredDays,
        start: SlotTime,
        expected_version: i64,
    ) -> Result<ActivationOutcome, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        // Concurrent bumps serialize on the row lock; the loser re-reads the row and
        // no longer matches `expected_version`
        let bumped = roster_versions::Entity::update_many()
            .col_expr(
                roster_versions::Column::Version,
                Expr::col(roster_versions::Column::Version).add(1),
            )
            .filter(roster_versions::Column::Id.eq(ROSTER_ROW))
            .filter(roster_versions::Column::Version.eq(expected_version))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if bumped.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
            return Ok(ActivationOutcome::StaleRoster);
        }

        let updated = enrollments::Entity::update_many()
            .col_expr(
                enrollments::Column::PreferredDays,
                Expr::value(day_names(days)),
            )
            .col_expr(
                enrollments::Column::PreferredTime,
                Expr::value(start.to_naive_time()),
            )
            .col_expr(
                enrollments::Column::Status,
                Expr::value(EnrollmentStatus::Active.to_string()),
            )
            .col_expr(
                enrollments::Column::ActivatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(enrollments::Column::Id.eq(id.0))
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Pending.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if updated.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
            return Ok(ActivationOutcome::NotPending);
        }

        let model = enrollments::Entity::find_by_id(id.0)
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound(format!("Enrollment {} not found", id)))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(ActivationOutcome::Activated(model.try_into()?))
    }

    async fn delete_pending(&self, id: &EnrollmentId) -> Result<bool, DomainError> {
        let result = enrollments::Entity::delete_many()
            .filter(enrollments::Column::Id.eq(id.0))
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    async fn archive(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let updated = enrollments::Entity::update_many()
            .col_expr(
                enrollments::Column::Status,
                Expr::value(EnrollmentStatus::Archived.to_string()),
            )
            .col_expr(
                enrollments::Column::ArchivedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(enrollments::Column::Id.eq(id.0))
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if updated.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
            return Ok(None);
        }

        roster_versions::Entity::update_many()
            .col_expr(
                roster_versions::Column::Version,
                Expr::col(roster_versions::Column::Version).add(1),
            )
            .filter(roster_versions::Column::Id.eq(ROSTER_ROW))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let model = enrollments::Entity::find_by_id(id.0)
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound(format!("Enrollment {} not found", id)))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(Some(model.try_into()?))
    }
}

fn day_names(days: &PreferredDays) -> Vec<String> {
    days.iter().map(|d| d.to_string()).collect()
}

fn to_enrollments(models: Vec<enrollments::Model>) -> Result<Vec<Enrollment>, DomainError> {
    models.into_iter().map(Enrollment::try_from).collect()
}

/// Convert SeaORM model to domain entity
///
/// Rows are validated on the way in, so a failure here means the table was edited by hand.
impl TryFrom<enrollments::Model> for Enrollment {
    type Error = DomainError;

    fn try_from(model: enrollments::Model) -> Result<Self, Self::Error> {
        let corrupt =
            |what: String| DomainError::Internal(format!("Enrollment {}: {}", model.id, what));

        let days = model
            .preferred_days
            .iter()
            .map(|d| d.parse::<DayOfWeek>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)?;
        let preferred_days = PreferredDays::new(days).map_err(|e| corrupt(e.to_string()))?;
        let preferred_start =
            SlotTime::try_from(model.preferred_time).map_err(|e| corrupt(e.to_string()))?;
        let status = model
            .status
            .parse::<EnrollmentStatus>()
            .map_err(corrupt)?;

        Ok(Enrollment {
            id: EnrollmentId(model.id),
            student_id: StudentId(model.student_id),
            course_id: CourseId(model.course_id),
            preferred_days,
            preferred_start,
            status,
            created_at: model.created_at.with_timezone(&Utc),
            activated_at: model.activated_at.map(|t| t.with_timezone(&Utc)),
            archived_at: model.archived_at.map(|t| t.with_timezone(&Utc)),
        })
    }
}
