//! Schedule handlers
//!
//! Read-only views of the timetable and the course catalog.

use axum::{extract::State, Json};

use crate::app::{GridRow, TodayClasses};
use crate::domain::entities::Course;
use crate::error::AppError;
use crate::AppState;

/// GET /schedule/grid
///
/// Weekly day x slot occupancy of the active roster.
pub async fn get_schedule_grid(
    State(state): State<AppState>,
) -> Result<Json<Vec<GridRow>>, AppError> {
    Ok(Json(state.enrollment_service.schedule_grid().await?))
}

/// GET /schedule/today
///
/// Today's classes with each student's balance and attendance.
pub async fn get_today_classes(
    State(state): State<AppState>,
) -> Result<Json<TodayClasses>, AppError> {
    Ok(Json(state.dashboard_service.today_classes().await?))
}

/// GET /courses
pub async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    Ok(Json(state.catalog.list().await?))
}
