//! Enrollment service
//!
//! Owns the enrollment lifecycle: requests come in as pending, a reviewer accepts them
//! into the active roster (after a conflict check) or rejects them, and active classes
//! are eventually archived.

use std::sync::Arc;

use crate::app::conflict_resolver::{find_conflict, occupancy_grid, GridRow};
use crate::domain::entities::{
    CourseId, DayOfWeek, Enrollment, EnrollmentId, NewEnrollment, PreferredDays, SlotTime,
    StudentId,
};
use crate::domain::ports::{
    ActivationOutcome, CourseCatalog, EnrollmentRepository, StudentDirectory,
};
use crate::error::{AppError, DomainError};

/// How many times an acceptance re-reads the roster after losing a race
pub const MAX_ACTIVATION_ATTEMPTS: usize = 5;

/// Service for the enrollment state machine
pub struct EnrollmentService<ER, SD, CC>
where
    ER: EnrollmentRepository + ?Sized,
    SD: StudentDirectory + ?Sized,
    CC: CourseCatalog + ?Sized,
{
    enrollments: Arc<ER>,
    directory: Arc<SD>,
    catalog: Arc<CC>,
}

impl<ER, SD, CC> EnrollmentService<ER, SD, CC>
where
    ER: EnrollmentRepository + ?Sized,
    SD: StudentDirectory + ?Sized,
    CC: CourseCatalog + ?Sized,
{
    pub fn new(enrollments: Arc<ER>, directory: Arc<SD>, catalog: Arc<CC>) -> Self {
        Self {
            enrollments,
            directory,
            catalog,
        }
    }

    /// Submit a new class request
    ///
    /// The request is validated in full and stored as pending. It does not hold any slot
    /// until a reviewer accepts it.
    pub async fn submit_request(
        &self,
        student_id: StudentId,
        course_id: CourseId,
        days: Vec<DayOfWeek>,
        start: SlotTime,
    ) -> Result<Enrollment, AppError> {
        let preferred_days = PreferredDays::new(days)?;

        if self.directory.find_by_id(&student_id).await?.is_none() {
            return Err(DomainError::NotFound(format!("Student {} not found", student_id)).into());
        }
        if self.catalog.find_by_id(course_id).await?.is_none() {
            return Err(DomainError::NotFound(format!("Course {} not found", course_id)).into());
        }

        let enrollment = self
            .enrollments
            .create(&NewEnrollment {
                student_id,
                course_id,
                preferred_days,
                preferred_start: start,
            })
            .await?;

        tracing::info!(
            enrollment_id = %enrollment.id,
            student_id = %student_id,
            course_id = %course_id,
            "Enrollment request submitted"
        );

        Ok(enrollment)
    }

    /// Accept a pending request with its final days and start time
    ///
    /// The conflict check and the activation form one optimistic transaction on the roster
    /// version: if another acceptance lands in between, the check is repeated against the
    /// new roster, so two overlapping acceptances can never both succeed.
    pub async fn accept(
        &self,
        id: &EnrollmentId,
        final_days: Vec<DayOfWeek>,
        final_start: SlotTime,
    ) -> Result<Enrollment, AppError> {
        let days = PreferredDays::new(final_days)?;
        let enrollment = self.find_existing(id).await?;
        if !enrollment.is_pending() {
            return Err(DomainError::DuplicateAction(format!(
                "Enrollment {} is already {}",
                id, enrollment.status
            ))
            .into());
        }

        for attempt in 1..=MAX_ACTIVATION_ATTEMPTS {
            let snapshot = self.enrollments.active_roster().await?;

            if let Some(conflict) =
                find_conflict(&days, final_start, &snapshot.enrollments, Some(*id))
            {
                tracing::info!(
                    enrollment_id = %id,
                    slot = %conflict.slot,
                    occupant = %conflict.occupant.id,
                    "Enrollment rejected by slot conflict"
                );
                return Err(DomainError::Conflict(format!(
                    "{} is already taken by enrollment {}",
                    conflict.slot, conflict.occupant.id
                ))
                .into());
            }

            match self
                .enrollments
                .activate(id, &days, final_start, snapshot.version)
                .await?
            {
                ActivationOutcome::Activated(active) => {
                    tracing::info!(
                        enrollment_id = %id,
                        start = %final_start,
                        roster_version = snapshot.version + 1,
                        "Enrollment activated"
                    );
                    return Ok(active);
                }
                ActivationOutcome::StaleRoster => {
                    tracing::warn!(
                        enrollment_id = %id,
                        attempt,
                        "Active roster changed during review, re-checking"
                    );
                }
                ActivationOutcome::NotPending => {
                    return Err(DomainError::DuplicateAction(format!(
                        "Enrollment {} was decided by another reviewer",
                        id
                    ))
                    .into());
                }
            }
        }

        Err(DomainError::Conflict(
            "The schedule is changing too quickly, please review again".to_string(),
        )
        .into())
    }

    /// Reject a pending request, removing it
    pub async fn reject(&self, id: &EnrollmentId) -> Result<(), AppError> {
        let enrollment = self.find_existing(id).await?;
        if !enrollment.is_pending() || !self.enrollments.delete_pending(id).await? {
            return Err(DomainError::DuplicateAction(format!(
                "Enrollment {} is no longer pending",
                id
            ))
            .into());
        }

        tracing::info!(enrollment_id = %id, "Enrollment request rejected");
        Ok(())
    }

    /// Archive an active enrollment, freeing its slots
    pub async fn archive(&self, id: &EnrollmentId) -> Result<Enrollment, AppError> {
        self.find_existing(id).await?;
        let archived = self.enrollments.archive(id).await?.ok_or_else(|| {
            DomainError::Validation(format!("Enrollment {} is not active", id))
        })?;

        tracing::info!(enrollment_id = %id, "Enrollment archived");
        Ok(archived)
    }

    /// Active enrollments meeting on a day, by start time
    pub async fn active_roster_for_day(&self, day: DayOfWeek) -> Result<Vec<Enrollment>, AppError> {
        Ok(self.enrollments.find_active_by_day(day).await?)
    }

    /// Requests awaiting review
    pub async fn pending(&self) -> Result<Vec<Enrollment>, AppError> {
        Ok(self.enrollments.find_pending().await?)
    }

    /// Find an enrollment by ID
    pub async fn find_by_id(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, AppError> {
        Ok(self.enrollments.find_by_id(id).await?)
    }

    /// Weekly occupancy grid of the active roster
    pub async fn schedule_grid(&self) -> Result<Vec<GridRow>, AppError> {
        let snapshot = self.enrollments.active_roster().await?;
        Ok(occupancy_grid(&snapshot.enrollments))
    }

    async fn find_existing(&self, id: &EnrollmentId) -> Result<Enrollment, AppError> {
        self.enrollments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Enrollment {} not found", id)).into())
    }
}
