//! PostgreSQL adapter for PaymentRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::ledger_repo::{insert_entry, is_unique_violation};
use crate::domain::entities::{
    NewLedgerEntry, NewPayment, Payment, PaymentId, PaymentStatus, StudentId,
};
use crate::domain::ports::PaymentRepository;
use crate::entity::payments;
use crate::error::DomainError;

/// PostgreSQL implementation of PaymentRepository
pub struct PostgresPaymentRepository {
    db: DatabaseConnection,
}

impl PostgresPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        let result = payments::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Payment::try_from).transpose()
    }

    async fn create(&self, payment: &NewPayment) -> Result<Payment, DomainError> {
        let model = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(payment.student_id.0),
            month_for: Set(payment.month_for.clone()),
            amount_paid: Set(payment.amount_paid),
            status: Set(PaymentStatus::Pending.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
            decided_at: Set(None),
        };

        // payments_one_pending_claim_idx backs the service-level duplicate check
        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::DuplicateAction(format!(
                    "A payment for {} is already awaiting review",
                    payment.month_for
                ))
            } else {
                DomainError::Database(e.to_string())
            }
        })?;

        result.try_into()
    }

    async fn find_by_status(&self, status: PaymentStatus) -> Result<Vec<Payment>, DomainError> {
        let results = payments::Entity::find()
            .filter(payments::Column::Status.eq(status.to_string()))
            .order_by_asc(payments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        to_payments(results)
    }

    async fn find_by_student(&self, student_id: &StudentId) -> Result<Vec<Payment>, DomainError> {
        let results = payments::Entity::find()
            .filter(payments::Column::StudentId.eq(student_id.0))
            .order_by_desc(payments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        to_payments(results)
    }

    async fn find_approved_for_month(&self, month_for: &str) -> Result<Vec<Payment>, DomainError> {
        let results = payments::Entity::find()
            .filter(payments::Column::Status.eq(PaymentStatus::Approved.to_string()))
            .filter(payments::Column::MonthFor.eq(month_for))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        to_payments(results)
    }

    async fn decide(
        &self,
        id: &PaymentId,
        status: PaymentStatus,
        credit: Option<&NewLedgerEntry>,
    ) -> Result<Payment, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let updated = payments::Entity::update_many()
            .col_expr(payments::Column::Status, Expr::value(status.to_string()))
            .col_expr(
                payments::Column::DecidedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(payments::Column::Id.eq(id.0))
            .filter(payments::Column::Status.eq(PaymentStatus::Pending.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if updated.rows_affected == 0 {
            let existing = payments::Entity::find_by_id(id.0)
                .one(&txn)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
            txn.rollback()
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;

            return Err(match existing {
                Some(payment) => DomainError::DuplicateAction(format!(
                    "Payment {} is already {}",
                    id, payment.status
                )),
                None => DomainError::NotFound(format!("Payment {} not found", id)),
            });
        }

        if let Some(credit) = credit {
            insert_entry(&txn, credit).await.map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::DuplicateAction(format!("Payment {} was already credited", id))
                } else {
                    DomainError::Database(e.to_string())
                }
            })?;
        }

        let model = payments::Entity::find_by_id(id.0)
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound(format!("Payment {} not found", id)))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        model.try_into()
    }
}

fn to_payments(models: Vec<payments::Model>) -> Result<Vec<Payment>, DomainError> {
    models.into_iter().map(Payment::try_from).collect()
}

/// Convert SeaORM model to domain entity
///
/// An unknown status is reported rather than read as pending, which would make the
/// payment decidable again.
impl TryFrom<payments::Model> for Payment {
    type Error = DomainError;

    fn try_from(model: payments::Model) -> Result<Self, Self::Error> {
        let status = model
            .status
            .parse::<PaymentStatus>()
            .map_err(|e| DomainError::Internal(format!("Payment {}: {}", model.id, e)))?;

        Ok(Payment {
            id: PaymentId(model.id),
            student_id: StudentId(model.student_id),
            month_for: model.month_for,
            amount_paid: model.amount_paid,
            status,
            created_at: model.created_at.with_timezone(&Utc),
            decided_at: model.decided_at.map(|t| t.with_timezone(&Utc)),
        })
    }
}
