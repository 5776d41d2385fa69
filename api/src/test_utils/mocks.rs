//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.
//!
//! Each repository keeps its state behind a single lock so that check-then-act
//! operations are atomic, matching what the database adapters guarantee.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::Barrier;

use crate::domain::entities::{
    DayOfWeek, Enrollment, EnrollmentId, EnrollmentStatus, LedgerEntry, LedgerEntryId,
    NewEnrollment, NewLedgerEntry, NewPayment, Notification, Payment, PaymentId, PaymentStatus,
    PreferredDays, SlotTime, StudentId, StudentProfile,
};
use crate::domain::ports::{
    ActivationOutcome, Clock, EnrollmentRepository, LedgerRepository, NotificationChannel,
    PaymentRepository, RosterSnapshot, StudentDirectory,
};
use crate::error::{DomainError, NotificationError};

// ============================================================================
// In-Memory Enrollment Repository
// ============================================================================

#[derive(Default)]
struct RosterState {
    /// Insertion order doubles as creation order
    enrollments: Vec<Enrollment>,
    version: i64,
}

#[derive(Default)]
pub struct InMemoryEnrollmentRepository {
    state: RwLock<RosterState>,
    forced_stale: AtomicUsize,
    activation_gate: Mutex<Option<Arc<Barrier>>>,
    gated_activations: AtomicUsize,
}

impl InMemoryEnrollmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an enrollment for testing
    pub fn with_enrollment(self, enrollment: Enrollment) -> Self {
        self.state.write().unwrap().enrollments.push(enrollment);
        self
    }

    /// Current roster version
    pub fn roster_version(&self) -> i64 {
        self.state.read().unwrap().version
    }

    /// Make the next `n` activations report a stale roster, as if another reviewer
    /// had just changed it
    pub fn fail_next_activations(&self, n: usize) {
        self.forced_stale.store(n, Ordering::SeqCst);
    }

    /// Hold the next `n` activations until all `n` have arrived
    ///
    /// Every held caller has already read its roster snapshot, so all of them race
    /// on the same version.
    pub fn hold_activations_until(&self, n: usize) {
        *self.activation_gate.lock().unwrap() = Some(Arc::new(Barrier::new(n)));
        self.gated_activations.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryEnrollmentRepository {
    async fn find_by_id(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, DomainError> {
        let state = self.state.read().unwrap();
        Ok(state.enrollments.iter().find(|e| e.id == *id).cloned())
    }

    async fn create(&self, new: &NewEnrollment) -> Result<Enrollment, DomainError> {
        let enrollment = Enrollment {
            id: EnrollmentId::new(),
            student_id: new.student_id,
            course_id: new.course_id,
            preferred_days: new.preferred_days.clone(),
            preferred_start: new.preferred_start,
            status: EnrollmentStatus::Pending,
            created_at: Utc::now(),
            activated_at: None,
            archived_at: None,
        };
        self.state.write().unwrap().enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn find_pending(&self) -> Result<Vec<Enrollment>, DomainError> {
        let state = self.state.read().unwrap();
        Ok(state
            .enrollments
            .iter()
            .filter(|e| e.is_pending())
            .cloned()
            .collect())
    }

    async fn find_active_by_day(&self, day: DayOfWeek) -> Result<Vec<Enrollment>, DomainError> {
        let state = self.state.read().unwrap();
        let mut found: Vec<Enrollment> = state
            .enrollments
            .iter()
            .filter(|e| e.is_active() && e.meets_on(day))
            .cloned()
            .collect();
        found.sort_by_key(|e| e.preferred_start);
        Ok(found)
    }

    async fn find_active_by_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<Enrollment>, DomainError> {
        let state = self.state.read().unwrap();
        Ok(state
            .enrollments
            .iter()
            .filter(|e| e.is_active() && e.student_id == *student_id)
            .cloned()
            .collect())
    }

    async fn active_roster(&self) -> Result<RosterSnapshot, DomainError> {
        let state = self.state.read().unwrap();
        Ok(RosterSnapshot {
            version: state.version,
            enrollments: state
                .enrollments
                .iter()
                .filter(|e| e.is_active())
                .cloned()
                .collect(),
        })
    }

    async fn activate(
        &self,
        id: &EnrollmentId,
        days: &PreferredDays,
        start: SlotTime,
        expected_version: i64,
    ) -> Result<ActivationOutcome, DomainError> {
        let held = self
            .gated_activations
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if held {
            let gate = self.activation_gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                gate.wait().await;
            }
        }

        let forced = self
            .forced_stale
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if forced {
            return Ok(ActivationOutcome::StaleRoster);
        }

        let mut state = self.state.write().unwrap();
        if state.version != expected_version {
            return Ok(ActivationOutcome::StaleRoster);
        }
        let Some(enrollment) = state
            .enrollments
            .iter_mut()
            .find(|e| e.id == *id && e.is_pending())
        else {
            return Ok(ActivationOutcome::NotPending);
        };

        enrollment.preferred_days = days.clone();
        enrollment.preferred_start = start;
        enrollment.status = EnrollmentStatus::Active;
        enrollment.activated_at = Some(Utc::now());
        let activated = enrollment.clone();
        state.version += 1;

        Ok(ActivationOutcome::Activated(activated))
    }

    async fn delete_pending(&self, id: &EnrollmentId) -> Result<bool, DomainError> {
        let mut state = self.state.write().unwrap();
        let before = state.enrollments.len();
        state
            .enrollments
            .retain(|e| !(e.id == *id && e.is_pending()));
        Ok(state.enrollments.len() < before)
    }

    async fn archive(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, DomainError> {
        let mut state = self.state.write().unwrap();
        let Some(enrollment) = state
            .enrollments
            .iter_mut()
            .find(|e| e.id == *id && e.is_active())
        else {
            return Ok(None);
        };

        enrollment.status = EnrollmentStatus::Archived;
        enrollment.archived_at = Some(Utc::now());
        let archived = enrollment.clone();
        state.version += 1;

        Ok(Some(archived))
    }
}

// ============================================================================
// In-Memory Ledger Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryLedgerRepository {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(entries: &mut Vec<LedgerEntry>, new: &NewLedgerEntry) -> LedgerEntry {
        let entry = LedgerEntry {
            id: LedgerEntryId::new(),
            student_id: new.student_id,
            amount: new.amount,
            reason: new.reason,
            occurred_on: new.occurred_on,
            created_at: Utc::now(),
        };
        entries.push(entry.clone());
        entry
    }

    /// Append any entry directly, for seeding credits and for use inside other mocks' locks
    pub fn append_now(&self, new: &NewLedgerEntry) -> LedgerEntry {
        let mut entries = self.entries.write().unwrap();
        Self::insert(&mut entries, new)
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn find_by_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<LedgerEntry>, DomainError> {
        let entries = self.entries.read().unwrap();
        Ok(entries
            .iter()
            .filter(|e| e.student_id == *student_id)
            .cloned()
            .collect())
    }

    async fn balance(&self, student_id: &StudentId) -> Result<i64, DomainError> {
        let entries = self.entries.read().unwrap();
        Ok(entries
            .iter()
            .filter(|e| e.student_id == *student_id)
            .map(|e| i64::from(e.amount))
            .sum())
    }

    async fn append_attendance(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry, DomainError> {
        let course_id = entry.reason.course_id.ok_or_else(|| {
            DomainError::Validation("Attendance entries need a course".to_string())
        })?;

        // check and insert under one write lock
        let mut entries = self.entries.write().unwrap();
        let duplicate = entries.iter().any(|e| {
            e.student_id == entry.student_id && e.is_attendance_for(course_id, entry.occurred_on)
        });
        if duplicate {
            return Err(DomainError::DuplicateAction(format!(
                "Attendance already marked for course {} on {}",
                course_id, entry.occurred_on
            )));
        }

        Ok(Self::insert(&mut entries, entry))
    }

    async fn find_attendance_on(&self, day: NaiveDate) -> Result<Vec<LedgerEntry>, DomainError> {
        let entries = self.entries.read().unwrap();
        Ok(entries
            .iter()
            .filter(|e| e.is_attendance() && e.occurred_on == day)
            .cloned()
            .collect())
    }
}

// ============================================================================
// In-Memory Payment Repository
// ============================================================================

/// Payments backed by memory; approvals credit the shared ledger
pub struct InMemoryPaymentRepository {
    payments: RwLock<Vec<Payment>>,
    ledger: Arc<InMemoryLedgerRepository>,
}

impl InMemoryPaymentRepository {
    pub fn new(ledger: Arc<InMemoryLedgerRepository>) -> Self {
        Self {
            payments: RwLock::new(Vec::new()),
            ledger,
        }
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        let payments = self.payments.read().unwrap();
        Ok(payments.iter().find(|p| p.id == *id).cloned())
    }

    async fn create(&self, new: &NewPayment) -> Result<Payment, DomainError> {
        let payment = Payment {
            id: PaymentId::new(),
            student_id: new.student_id,
            month_for: new.month_for.clone(),
            amount_paid: new.amount_paid,
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
            decided_at: None,
        };
        self.payments.write().unwrap().push(payment.clone());
        Ok(payment)
    }

    async fn find_by_status(&self, status: PaymentStatus) -> Result<Vec<Payment>, DomainError> {
        let payments = self.payments.read().unwrap();
        Ok(payments
            .iter()
            .filter(|p| p.status == status)
            .cloned()
            .collect())
    }

    async fn find_by_student(&self, student_id: &StudentId) -> Result<Vec<Payment>, DomainError> {
        let payments = self.payments.read().unwrap();
        Ok(payments
            .iter()
            .rev()
            .filter(|p| p.student_id == *student_id)
            .cloned()
            .collect())
    }

    async fn find_approved_for_month(&self, month_for: &str) -> Result<Vec<Payment>, DomainError> {
        let payments = self.payments.read().unwrap();
        Ok(payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Approved && p.month_for == month_for)
            .cloned()
            .collect())
    }

    async fn decide(
        &self,
        id: &PaymentId,
        status: PaymentStatus,
        credit: Option<&NewLedgerEntry>,
    ) -> Result<Payment, DomainError> {
        let mut payments = self.payments.write().unwrap();
        let payment = payments
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| DomainError::NotFound(format!("Payment {} not found", id)))?;
        if !payment.is_pending() {
            return Err(DomainError::DuplicateAction(format!(
                "Payment {} is already {}",
                id, payment.status
            )));
        }

        if let Some(credit) = credit {
            self.ledger.append_now(credit);
        }
        payment.status = status;
        payment.decided_at = Some(Utc::now());

        Ok(payment.clone())
    }
}

// ============================================================================
// In-Memory Student Directory
// ============================================================================

#[derive(Default)]
pub struct InMemoryStudentDirectory {
    students: RwLock<HashMap<StudentId, StudentProfile>>,
}

impl InMemoryStudentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a student profile for testing
    pub fn with_student(self, profile: StudentProfile) -> Self {
        self.students.write().unwrap().insert(profile.id, profile);
        self
    }
}

#[async_trait]
impl StudentDirectory for InMemoryStudentDirectory {
    async fn find_by_id(&self, id: &StudentId) -> Result<Option<StudentProfile>, DomainError> {
        Ok(self.students.read().unwrap().get(id).cloned())
    }
}

// ============================================================================
// Recording Notification Channel
// ============================================================================

/// Captures every delivered notification; can be switched to fail every send
#[derive(Default)]
pub struct RecordingNotificationChannel {
    sent: RwLock<Vec<Notification>>,
    failing: AtomicBool,
}

impl RecordingNotificationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A channel whose every delivery fails
    pub fn failing() -> Self {
        let channel = Self::default();
        channel.failing.store(true, Ordering::SeqCst);
        channel
    }

    /// Notifications delivered so far
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.read().unwrap().clone()
    }
}

#[async_trait]
impl NotificationChannel for RecordingNotificationChannel {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotificationError::Rejected {
                status: 503,
                message: "channel unavailable".to_string(),
            });
        }
        self.sent.write().unwrap().push(notification.clone());
        Ok(())
    }
}

// ============================================================================
// Fixed Clock
// ============================================================================

/// A clock that stays where tests put it
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap()
    }
}
