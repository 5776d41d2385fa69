//! Ledger handlers
//!
//! Attendance marking and balance lookups.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AttendanceReceipt;
use crate::domain::entities::{CourseId, LedgerEntry, StudentId};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MarkAttendanceRequest {
    pub student_id: Uuid,
    pub course_id: i32,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub student_id: String,
    pub balance: i64,
}

/// POST /attendance
///
/// Mark a student present in a course today, debiting one session.
pub async fn mark_attendance(
    State(state): State<AppState>,
    Json(request): Json<MarkAttendanceRequest>,
) -> Result<Json<AttendanceReceipt>, AppError> {
    let receipt = state
        .ledger_service
        .mark_attendance(StudentId(request.student_id), CourseId(request.course_id))
        .await?;

    Ok(Json(receipt))
}

/// GET /attendance/:date
///
/// Attendance log for a day (YYYY-MM-DD).
pub async fn get_attendance_on(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<LedgerEntry>>, AppError> {
    let day = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date: {}", date)))?;

    Ok(Json(state.ledger_service.attendance_on(day).await?))
}

/// GET /students/:id/balance
pub async fn get_balance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance = state.ledger_service.balance(&StudentId(id)).await?;

    Ok(Json(BalanceResponse {
        student_id: id.to_string(),
        balance,
    }))
}

/// GET /students/:id/ledger
///
/// Every credit and debit of a student, oldest first.
pub async fn get_ledger_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<LedgerEntry>>, AppError> {
    Ok(Json(state.ledger_service.history(&StudentId(id)).await?))
}
