//! Student handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::app::StudentOverview;
use crate::domain::entities::StudentId;
use crate::error::AppError;
use crate::AppState;

/// GET /students/:id/overview
///
/// Balance, classes attended this month, pending payment flag and active schedule.
pub async fn get_student_overview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentOverview>, AppError> {
    Ok(Json(
        state.dashboard_service.student_overview(&StudentId(id)).await?,
    ))
}
