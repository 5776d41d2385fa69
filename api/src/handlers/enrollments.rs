//! Enrollment handlers
//!
//! Endpoints for class requests and their review.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{
    CourseId, DayOfWeek, Enrollment, EnrollmentId, SlotTime, StudentId,
};
use crate::error::AppError;
use crate::AppState;

/// Request to join a class
#[derive(Debug, Deserialize)]
pub struct SubmitEnrollmentRequest {
    pub student_id: Uuid,
    pub course_id: i32,
    /// Two or three distinct weekdays
    pub days: Vec<DayOfWeek>,
    /// Session start, "HH:MM"
    pub start_time: SlotTime,
}

/// A reviewer's final schedule for a request
#[derive(Debug, Deserialize)]
pub struct AcceptEnrollmentRequest {
    pub days: Vec<DayOfWeek>,
    pub start_time: SlotTime,
}

#[derive(Debug, Serialize)]
pub struct EnrollmentResponse {
    pub id: String,
    pub student_id: String,
    pub course_id: i32,
    pub days: Vec<DayOfWeek>,
    pub start_time: String,
    pub status: String,
    pub created_at: String,
    pub activated_at: Option<String>,
    pub archived_at: Option<String>,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(e: Enrollment) -> Self {
        EnrollmentResponse {
            id: e.id.to_string(),
            student_id: e.student_id.to_string(),
            course_id: e.course_id.0,
            days: e.preferred_days.as_slice().to_vec(),
            start_time: e.preferred_start.to_string(),
            status: e.status.to_string(),
            created_at: e.created_at.to_rfc3339(),
            activated_at: e.activated_at.map(|t| t.to_rfc3339()),
            archived_at: e.archived_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// POST /enrollments
///
/// Submit a class request. It stays pending until reviewed.
pub async fn submit_enrollment(
    State(state): State<AppState>,
    Json(request): Json<SubmitEnrollmentRequest>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), AppError> {
    let enrollment = state
        .enrollment_service
        .submit_request(
            StudentId(request.student_id),
            CourseId(request.course_id),
            request.days,
            request.start_time,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(enrollment.into())))
}

/// GET /enrollments/pending
///
/// Requests awaiting review, oldest first.
pub async fn list_pending_enrollments(
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrollmentResponse>>, AppError> {
    let pending = state.enrollment_service.pending().await?;
    Ok(Json(pending.into_iter().map(Into::into).collect()))
}

/// POST /enrollments/:id/accept
///
/// Accept a request with its final days and start time.
/// Fails with 409 if any of the sessions would overlap an active class.
pub async fn accept_enrollment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AcceptEnrollmentRequest>,
) -> Result<Json<EnrollmentResponse>, AppError> {
    let enrollment = state
        .enrollment_service
        .accept(&EnrollmentId(id), request.days, request.start_time)
        .await?;

    Ok(Json(enrollment.into()))
}

/// POST /enrollments/:id/reject
pub async fn reject_enrollment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.enrollment_service.reject(&EnrollmentId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /enrollments/:id/archive
///
/// End an active class. Its slots free up immediately; the ledger is untouched.
pub async fn archive_enrollment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrollmentResponse>, AppError> {
    let archived = state.enrollment_service.archive(&EnrollmentId(id)).await?;
    Ok(Json(archived.into()))
}

/// GET /roster/:day
///
/// Active classes meeting on a weekday, by start time.
pub async fn get_roster_for_day(
    State(state): State<AppState>,
    Path(day): Path<String>,
) -> Result<Json<Vec<EnrollmentResponse>>, AppError> {
    let day: DayOfWeek = day.parse().map_err(AppError::BadRequest)?;
    let roster = state.enrollment_service.active_roster_for_day(day).await?;
    Ok(Json(roster.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_request_parses_days_and_time() {
        let json = r#"{
            "student_id": "6f1c2a56-1f33-4a8e-9a53-7c3f3a1b2c4d",
            "course_id": 3,
            "days": ["Monday", "Thursday"],
            "start_time": "17:30"
        }"#;
        let request: SubmitEnrollmentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.days, vec![DayOfWeek::Monday, DayOfWeek::Thursday]);
        assert_eq!(request.start_time.to_string(), "17:30");
    }

    #[test]
    fn start_time_outside_grid_is_rejected() {
        let json = r#"{"days": ["Monday", "Friday"], "start_time": "17:15"}"#;
        assert!(serde_json::from_str::<AcceptEnrollmentRequest>(json).is_err());

        let json = r#"{"days": ["Monday", "Friday"], "start_time": "20:00"}"#;
        assert!(serde_json::from_str::<AcceptEnrollmentRequest>(json).is_err());
    }
}
