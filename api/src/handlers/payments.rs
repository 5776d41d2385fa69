//! Payment handlers
//!
//! Fee claims, their review, and fee reminders.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::{DecisionOutcome, ReminderReport};
use crate::domain::entities::{Notification, Payment, PaymentDecision, PaymentId, StudentId};
use crate::error::AppError;
use crate::AppState;

/// A student's "I have paid" claim
#[derive(Debug, Deserialize)]
pub struct ClaimPaymentRequest {
    pub student_id: Uuid,
    /// Defaults to the current month, e.g. "October 2026"
    pub month_for: Option<String>,
    #[serde(default)]
    pub amount_paid: i64,
}

#[derive(Debug, Deserialize)]
pub struct DecidePaymentRequest {
    pub decision: PaymentDecision,
}

#[derive(Debug, Deserialize)]
pub struct ReminderQuery {
    pub month: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SendRemindersRequest {
    pub month_for: Option<String>,
}

/// POST /payments
pub async fn claim_payment(
    State(state): State<AppState>,
    Json(request): Json<ClaimPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let payment = state
        .payment_service
        .claim(
            StudentId(request.student_id),
            request.month_for,
            request.amount_paid,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

/// GET /payments/pending
pub async fn list_pending_payments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Payment>>, AppError> {
    Ok(Json(state.payment_service.pending().await?))
}

/// POST /payments/:id/decision
///
/// Approve (credits the ledger) or reject (notifies the student) a pending payment.
/// Deciding twice fails with 409.
pub async fn decide_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DecidePaymentRequest>,
) -> Result<Json<DecisionOutcome>, AppError> {
    let outcome = state
        .payment_service
        .decide(&PaymentId(id), request.decision)
        .await?;

    Ok(Json(outcome))
}

/// GET /students/:id/payments
pub async fn list_student_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Payment>>, AppError> {
    Ok(Json(state.payment_service.history(&StudentId(id)).await?))
}

/// GET /payments/reminders?month=
///
/// Preview the fee reminders for a month without sending them.
pub async fn preview_fee_reminders(
    State(state): State<AppState>,
    Query(query): Query<ReminderQuery>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let month = query
        .month
        .unwrap_or_else(|| state.payment_service.current_month());

    Ok(Json(state.payment_service.fee_reminders(&month).await?))
}

/// POST /payments/reminders
pub async fn send_fee_reminders(
    State(state): State<AppState>,
    request: Option<Json<SendRemindersRequest>>,
) -> Result<Json<ReminderReport>, AppError> {
    let Json(request) = request.unwrap_or_default();
    let report = state
        .payment_service
        .send_fee_reminders(request.month_for)
        .await?;

    Ok(Json(report))
}
