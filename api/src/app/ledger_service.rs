//! Ledger service
//!
//! Reads balances and writes attendance debits. Credits are only ever written by payment
//! approval, through [`credit_entry`].

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use crate::app::credit_policy::ATTENDANCE_DEBIT;
use crate::domain::entities::{
    CourseId, LedgerEntry, NewLedgerEntry, ReasonKind, ReasonTag, StudentId,
};
use crate::domain::ports::{Clock, EnrollmentRepository, LedgerRepository};
use crate::error::{AppError, DomainError};

/// Result of marking a student present
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceReceipt {
    pub entry: LedgerEntry,
    /// Balance after the debit
    pub balance: i64,
    /// True when the student has run out of prepaid sessions
    pub balance_non_positive: bool,
}

/// Calendar day of `now` at the school's UTC offset
pub fn local_day(now: DateTime<Utc>, utc_offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&utc_offset).date_naive()
}

/// Build a validated credit entry
///
/// Credits are strictly positive and must carry a payment reason.
pub fn credit_entry(
    student_id: StudentId,
    amount: i32,
    reason: ReasonTag,
    occurred_on: NaiveDate,
) -> Result<NewLedgerEntry, DomainError> {
    if amount <= 0 {
        return Err(DomainError::Validation(format!(
            "Credit amount must be positive, got {}",
            amount
        )));
    }
    if reason.kind != ReasonKind::PaymentCredit {
        return Err(DomainError::Validation(format!(
            "Credits cannot be granted for {}",
            reason.kind
        )));
    }

    Ok(NewLedgerEntry {
        student_id,
        amount,
        reason,
        occurred_on,
    })
}

/// Service for the credit ledger
pub struct LedgerService<LR, ER, CL>
where
    LR: LedgerRepository + ?Sized,
    ER: EnrollmentRepository + ?Sized,
    CL: Clock + ?Sized,
{
    ledger: Arc<LR>,
    enrollments: Arc<ER>,
    clock: Arc<CL>,
    utc_offset: FixedOffset,
}

impl<LR, ER, CL> LedgerService<LR, ER, CL>
where
    LR: LedgerRepository + ?Sized,
    ER: EnrollmentRepository + ?Sized,
    CL: Clock + ?Sized,
{
    pub fn new(ledger: Arc<LR>, enrollments: Arc<ER>, clock: Arc<CL>, utc_offset: FixedOffset) -> Self {
        Self {
            ledger,
            enrollments,
            clock,
            utc_offset,
        }
    }

    /// The school's current calendar day
    pub fn today(&self) -> NaiveDate {
        local_day(self.clock.now(), self.utc_offset)
    }

    /// Remaining prepaid sessions
    pub async fn balance(&self, student_id: &StudentId) -> Result<i64, AppError> {
        Ok(self.ledger.balance(student_id).await?)
    }

    /// All ledger entries of a student, oldest first
    pub async fn history(&self, student_id: &StudentId) -> Result<Vec<LedgerEntry>, AppError> {
        Ok(self.ledger.find_by_student(student_id).await?)
    }

    /// Attendance entries recorded on a day
    pub async fn attendance_on(&self, day: NaiveDate) -> Result<Vec<LedgerEntry>, AppError> {
        Ok(self.ledger.find_attendance_on(day).await?)
    }

    /// Mark a student present in a course today
    ///
    /// Debits one session. A second mark for the same course on the same day is rejected.
    /// The debit is written even when it takes the balance to zero or below; the receipt
    /// flags that case for follow-up.
    pub async fn mark_attendance(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<AttendanceReceipt, AppError> {
        let enrolled = self
            .enrollments
            .find_active_by_student(&student_id)
            .await?
            .iter()
            .any(|e| e.course_id == course_id);
        if !enrolled {
            return Err(DomainError::Validation(format!(
                "Student {} has no active enrollment in course {}",
                student_id, course_id
            ))
            .into());
        }

        let today = self.today();
        let entry = self
            .ledger
            .append_attendance(&NewLedgerEntry {
                student_id,
                amount: ATTENDANCE_DEBIT,
                reason: ReasonTag::attendance(course_id),
                occurred_on: today,
            })
            .await?;

        let balance = self.ledger.balance(&student_id).await?;
        if balance <= 0 {
            tracing::warn!(
                student_id = %student_id,
                balance,
                "Attendance marked with no prepaid sessions left"
            );
        } else {
            tracing::info!(
                student_id = %student_id,
                course_id = %course_id,
                day = %today,
                balance,
                "Attendance marked"
            );
        }

        Ok(AttendanceReceipt {
            entry,
            balance,
            balance_non_positive: balance <= 0,
        })
    }
}
