//! Dashboard service
//!
//! Read-only views assembled from several ports: a student's overview page and the
//! reviewer's list of today's classes.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::app::ledger_service::local_day;
use crate::domain::entities::{
    balance_of, CourseCategory, CourseId, DayOfWeek, EnrollmentId, PaymentStatus, SlotTime,
    StudentId, StudentProfile,
};
use crate::domain::ports::{
    Clock, CourseCatalog, EnrollmentRepository, LedgerRepository, PaymentRepository,
    StudentDirectory,
};
use crate::error::{AppError, DomainError};

/// Everything a student sees on their home page
#[derive(Debug, Clone, Serialize)]
pub struct StudentOverview {
    pub profile: StudentProfile,
    /// Remaining prepaid sessions
    pub balance: i64,
    /// Classes attended in the current month
    pub attended_this_month: usize,
    /// A payment claim is waiting for review
    pub has_pending_payment: bool,
    pub schedule: Vec<ScheduledClass>,
}

/// One active class in a student's schedule
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledClass {
    pub enrollment_id: EnrollmentId,
    pub course_id: CourseId,
    pub course_name: String,
    pub category: Option<CourseCategory>,
    pub days: Vec<DayOfWeek>,
    pub start: SlotTime,
}

/// The reviewer's attendance sheet for today
#[derive(Debug, Clone, Serialize)]
pub struct TodayClasses {
    pub date: NaiveDate,
    pub day: DayOfWeek,
    pub classes: Vec<TodayClass>,
}

/// One class meeting today
#[derive(Debug, Clone, Serialize)]
pub struct TodayClass {
    pub enrollment_id: EnrollmentId,
    pub student_id: StudentId,
    pub student_name: String,
    pub course_id: CourseId,
    pub course_name: String,
    pub start: SlotTime,
    pub balance: i64,
    /// Attendance already marked today
    pub present: bool,
}

/// Service for dashboard views
pub struct DashboardService<ER, LR, PR, SD, CC, CL>
where
    ER: EnrollmentRepository + ?Sized,
    LR: LedgerRepository + ?Sized,
    PR: PaymentRepository + ?Sized,
    SD: StudentDirectory + ?Sized,
    CC: CourseCatalog + ?Sized,
    CL: Clock + ?Sized,
{
    enrollments: Arc<ER>,
    ledger: Arc<LR>,
    payments: Arc<PR>,
    directory: Arc<SD>,
    catalog: Arc<CC>,
    clock: Arc<CL>,
    utc_offset: FixedOffset,
}

impl<ER, LR, PR, SD, CC, CL> DashboardService<ER, LR, PR, SD, CC, CL>
where
    ER: EnrollmentRepository + ?Sized,
    LR: LedgerRepository + ?Sized,
    PR: PaymentRepository + ?Sized,
    SD: StudentDirectory + ?Sized,
    CC: CourseCatalog + ?Sized,
    CL: Clock + ?Sized,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        enrollments: Arc<ER>,
        ledger: Arc<LR>,
        payments: Arc<PR>,
        directory: Arc<SD>,
        catalog: Arc<CC>,
        clock: Arc<CL>,
        utc_offset: FixedOffset,
    ) -> Self {
        Self {
            enrollments,
            ledger,
            payments,
            directory,
            catalog,
            clock,
            utc_offset,
        }
    }

    /// Build a student's overview
    pub async fn student_overview(&self, student_id: &StudentId) -> Result<StudentOverview, AppError> {
        let profile = self
            .directory
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Student {} not found", student_id)))?;

        let today = local_day(self.clock.now(), self.utc_offset);
        let entries = self.ledger.find_by_student(student_id).await?;
        let attended_this_month = entries
            .iter()
            .filter(|e| {
                e.is_attendance()
                    && e.occurred_on.year() == today.year()
                    && e.occurred_on.month() == today.month()
            })
            .count();

        let has_pending_payment = self
            .payments
            .find_by_student(student_id)
            .await?
            .iter()
            .any(|p| p.status == PaymentStatus::Pending);

        let mut schedule = Vec::new();
        for enrollment in self.enrollments.find_active_by_student(student_id).await? {
            let course = self.catalog.find_by_id(enrollment.course_id).await?;
            schedule.push(ScheduledClass {
                enrollment_id: enrollment.id,
                course_id: enrollment.course_id,
                course_name: course
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "Unknown course".to_string()),
                category: course.map(|c| c.category),
                days: enrollment.preferred_days.as_slice().to_vec(),
                start: enrollment.preferred_start,
            });
        }
        schedule.sort_by_key(|c| c.start);

        Ok(StudentOverview {
            profile,
            balance: balance_of(&entries),
            attended_this_month,
            has_pending_payment,
            schedule,
        })
    }

    /// Classes meeting today with each student's balance and attendance
    pub async fn today_classes(&self) -> Result<TodayClasses, AppError> {
        let date = local_day(self.clock.now(), self.utc_offset);
        let day = DayOfWeek::from(date.weekday());

        let marked: HashSet<(StudentId, Option<CourseId>)> = self
            .ledger
            .find_attendance_on(date)
            .await?
            .into_iter()
            .map(|e| (e.student_id, e.reason.course_id))
            .collect();

        let mut classes = Vec::new();
        for enrollment in self.enrollments.find_active_by_day(day).await? {
            let student_name = self
                .directory
                .find_by_id(&enrollment.student_id)
                .await?
                .map(|p| p.full_name)
                .unwrap_or_else(|| "Unknown student".to_string());
            let course_name = self
                .catalog
                .find_by_id(enrollment.course_id)
                .await?
                .map(|c| c.name)
                .unwrap_or_else(|| "Unknown course".to_string());

            classes.push(TodayClass {
                enrollment_id: enrollment.id,
                student_id: enrollment.student_id,
                student_name,
                course_id: enrollment.course_id,
                course_name,
                start: enrollment.preferred_start,
                balance: self.ledger.balance(&enrollment.student_id).await?,
                present: marked.contains(&(enrollment.student_id, Some(enrollment.course_id))),
            });
        }

        Ok(TodayClasses { date, day, classes })
    }
}
