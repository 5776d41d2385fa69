//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//!
//! Check-then-act operations (slot activation, attendance, payment decisions) are single
//! repository calls so that the adapter can make them atomic.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::{
    DayOfWeek, Enrollment, EnrollmentId, LedgerEntry, NewEnrollment, NewLedgerEntry, NewPayment,
    Payment, PaymentId, PaymentStatus, PreferredDays, SlotTime, StudentId,
};
use crate::error::DomainError;

/// The active roster as read at a given roster version
#[derive(Debug, Clone)]
pub struct RosterSnapshot {
    /// Incremented on every change to the set of active enrollments
    pub version: i64,
    pub enrollments: Vec<Enrollment>,
}

/// Result of a conditional activation
#[derive(Debug, Clone)]
pub enum ActivationOutcome {
    /// The enrollment is now active
    Activated(Enrollment),
    /// The roster changed since the snapshot was taken; nothing was written
    StaleRoster,
    /// The enrollment left `pending` before the write; nothing was written
    NotPending,
}

/// Repository for Enrollment entities
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Find an enrollment by ID
    async fn find_by_id(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, DomainError>;

    /// Create a new pending enrollment
    async fn create(&self, enrollment: &NewEnrollment) -> Result<Enrollment, DomainError>;

    /// Find enrollments awaiting review, oldest first
    async fn find_pending(&self) -> Result<Vec<Enrollment>, DomainError>;

    /// Find active enrollments meeting on a day, ordered by start time
    async fn find_active_by_day(&self, day: DayOfWeek) -> Result<Vec<Enrollment>, DomainError>;

    /// Find a student's active enrollments
    async fn find_active_by_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<Enrollment>, DomainError>;

    /// Read the full active roster together with its version
    async fn active_roster(&self) -> Result<RosterSnapshot, DomainError>;

    /// Activate a pending enrollment with its final days and start time,
    /// only if the roster is still at `expected_version`
    async fn activate(
        &self,
        id: &EnrollmentId,
        days: &PreferredDays,
        start: SlotTime,
        expected_version: i64,
    ) -> Result<ActivationOutcome, DomainError>;

    /// Remove a pending enrollment. Returns false if it was not pending.
    async fn delete_pending(&self, id: &EnrollmentId) -> Result<bool, DomainError>;

    /// Archive an active enrollment. Returns None if it was not active.
    async fn archive(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, DomainError>;
}

/// Repository for the append-only credit ledger
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// All entries of a student in the order they were written
    async fn find_by_student(&self, student_id: &StudentId)
        -> Result<Vec<LedgerEntry>, DomainError>;

    /// Sum of all entries of a student
    async fn balance(&self, student_id: &StudentId) -> Result<i64, DomainError>;

    /// Append an attendance entry unless one already exists for the same
    /// (student, course, day); fails with `DomainError::DuplicateAction` otherwise
    async fn append_attendance(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry, DomainError>;

    /// All attendance entries written for a day
    async fn find_attendance_on(&self, day: NaiveDate) -> Result<Vec<LedgerEntry>, DomainError>;
}

/// Repository for Payment entities
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Find a payment by ID
    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError>;

    /// Record a new pending payment claim
    async fn create(&self, payment: &NewPayment) -> Result<Payment, DomainError>;

    /// Find payments in a status, oldest first
    async fn find_by_status(&self, status: PaymentStatus) -> Result<Vec<Payment>, DomainError>;

    /// Find a student's payments, newest first
    async fn find_by_student(&self, student_id: &StudentId) -> Result<Vec<Payment>, DomainError>;

    /// Find approved payments covering a month
    async fn find_approved_for_month(&self, month_for: &str) -> Result<Vec<Payment>, DomainError>;

    /// Move a pending payment to `status`, appending `credit` to the ledger in the same
    /// atomic write when given.
    ///
    /// Fails with `DomainError::DuplicateAction` if the payment was already decided and
    /// `DomainError::NotFound` if it does not exist.
    async fn decide(
        &self,
        id: &PaymentId,
        status: PaymentStatus,
        credit: Option<&NewLedgerEntry>,
    ) -> Result<Payment, DomainError>;
}
