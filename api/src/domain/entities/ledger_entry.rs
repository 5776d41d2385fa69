//! Ledger entry domain entity
//!
//! The credit ledger is append-only. Every change to a student's prepaid session count
//! is a signed entry with a structured reason; the balance is the sum of all entries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::course::CourseId;
use super::payment::PaymentId;
use super::student::StudentId;

/// Unique identifier for a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerEntryId(pub Uuid);

impl LedgerEntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LedgerEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for LedgerEntryId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LedgerEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a ledger entry was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKind {
    /// Student attended a class (-1)
    Attendance,
    /// Credits granted by an approved payment
    PaymentCredit,
}

impl std::fmt::Display for ReasonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReasonKind::Attendance => write!(f, "attendance"),
            ReasonKind::PaymentCredit => write!(f, "payment_credit"),
        }
    }
}

impl std::str::FromStr for ReasonKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "attendance" => Ok(ReasonKind::Attendance),
            "payment_credit" => Ok(ReasonKind::PaymentCredit),
            _ => Err(format!("Unknown ledger reason: {}", s)),
        }
    }
}

/// Structured reason attached to every entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonTag {
    pub kind: ReasonKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<CourseId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<PaymentId>,
}

impl ReasonTag {
    pub fn attendance(course_id: CourseId) -> Self {
        Self {
            kind: ReasonKind::Attendance,
            course_id: Some(course_id),
            payment_id: None,
        }
    }

    pub fn payment_credit(payment_id: PaymentId) -> Self {
        Self {
            kind: ReasonKind::PaymentCredit,
            course_id: None,
            payment_id: Some(payment_id),
        }
    }
}

/// An immutable credit adjustment
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub id: LedgerEntryId,
    pub student_id: StudentId,
    pub amount: i32,
    pub reason: ReasonTag,
    /// School-local calendar day the entry belongs to
    pub occurred_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn is_attendance(&self) -> bool {
        self.reason.kind == ReasonKind::Attendance
    }

    /// Check if this entry records attendance of a course on a given day
    pub fn is_attendance_for(&self, course_id: CourseId, day: NaiveDate) -> bool {
        self.is_attendance() && self.reason.course_id == Some(course_id) && self.occurred_on == day
    }
}

/// Data needed to append a ledger entry
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub student_id: StudentId,
    pub amount: i32,
    pub reason: ReasonTag,
    pub occurred_on: NaiveDate,
}

/// Sum of a sequence of entries
pub fn balance_of<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> i64 {
    entries.into_iter().map(|e| i64::from(e.amount)).sum()
}
