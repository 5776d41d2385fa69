//! PostgreSQL adapter for LedgerRepository

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::domain::entities::{
    CourseId, LedgerEntry, LedgerEntryId, NewLedgerEntry, PaymentId, ReasonKind, ReasonTag,
    StudentId,
};
use crate::domain::ports::LedgerRepository;
use crate::entity::credit_ledger;
use crate::error::DomainError;

/// PostgreSQL implementation of LedgerRepository
pub struct PostgresLedgerRepository {
    db: DatabaseConnection,
}

impl PostgresLedgerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Insert a ledger row on any connection or open transaction
pub(super) async fn insert_entry<C: ConnectionTrait>(
    conn: &C,
    entry: &NewLedgerEntry,
) -> Result<credit_ledger::Model, DbErr> {
    let model = credit_ledger::ActiveModel {
        id: Set(Uuid::new_v4()),
        student_id: Set(entry.student_id.0),
        amount: Set(entry.amount),
        reason_kind: Set(entry.reason.kind.to_string()),
        course_id: Set(entry.reason.course_id.map(|c| c.0)),
        payment_id: Set(entry.reason.payment_id.map(|p| p.0)),
        occurred_on: Set(entry.occurred_on),
        created_at: Set(Utc::now().fixed_offset()),
    };

    model.insert(conn).await
}

/// True when the error is a violated unique index
pub(super) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait]
impl LedgerRepository for PostgresLedgerRepository {
    async fn find_by_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<LedgerEntry>, DomainError> {
        let results = credit_ledger::Entity::find()
            .filter(credit_ledger::Column::StudentId.eq(student_id.0))
            .order_by_asc(credit_ledger::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        to_entries(results)
    }

    async fn balance(&self, student_id: &StudentId) -> Result<i64, DomainError> {
        let stmt = sea_orm::Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT COALESCE(SUM(amount), 0)::BIGINT AS balance FROM credit_ledger WHERE student_id = $1",
            [student_id.0.into()],
        );

        let row = self
            .db
            .query_one(stmt)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        match row {
            Some(row) => row
                .try_get::<i64>("", "balance")
                .map_err(|e| DomainError::Database(e.to_string())),
            None => Ok(0),
        }
    }

    async fn append_attendance(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry, DomainError> {
        // credit_ledger_one_attendance_idx rejects a second row for (student, course, day)
        let model = insert_entry(&self.db, entry).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateAction(format!(
                    "Attendance already marked on {}",
                    entry.occurred_on
                ))
            } else {
                DomainError::Database(e.to_string())
            }
        })?;

        model.try_into()
    }

    async fn find_attendance_on(&self, day: NaiveDate) -> Result<Vec<LedgerEntry>, DomainError> {
        let results = credit_ledger::Entity::find()
            .filter(credit_ledger::Column::ReasonKind.eq(ReasonKind::Attendance.to_string()))
            .filter(credit_ledger::Column::OccurredOn.eq(day))
            .order_by_asc(credit_ledger::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        to_entries(results)
    }
}

fn to_entries(models: Vec<credit_ledger::Model>) -> Result<Vec<LedgerEntry>, DomainError> {
    models.into_iter().map(LedgerEntry::try_from).collect()
}

/// Convert SeaORM model to domain entity
///
/// An unknown reason kind means the row was written outside this service.
impl TryFrom<credit_ledger::Model> for LedgerEntry {
    type Error = DomainError;

    fn try_from(model: credit_ledger::Model) -> Result<Self, Self::Error> {
        let kind = model.reason_kind.parse::<ReasonKind>().map_err(|e| {
            DomainError::Internal(format!("Ledger entry {}: {}", model.id, e))
        })?;

        Ok(LedgerEntry {
            id: LedgerEntryId(model.id),
            student_id: StudentId(model.student_id),
            amount: model.amount,
            reason: ReasonTag {
                kind,
                course_id: model.course_id.map(CourseId),
                payment_id: model.payment_id.map(PaymentId),
            },
            occurred_on: model.occurred_on,
            created_at: model.created_at.with_timezone(&Utc),
        })
    }
}
