//! Enrollment domain entity
//!
//! An enrollment is a student's recurring weekly class: a course taught on two or three
//! days at the same start time. Requests start out pending and become active once a
//! reviewer has confirmed the slot is free.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::course::CourseId;
use super::student::StudentId;
use super::time_slot::{DayOfWeek, SlotTime};
use crate::error::DomainError;

/// Minimum number of class days per week
pub const MIN_DAYS_PER_WEEK: usize = 2;

/// Maximum number of class days per week
pub const MAX_DAYS_PER_WEEK: usize = 3;

/// Unique identifier for an enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentId(pub Uuid);

impl EnrollmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EnrollmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EnrollmentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Enrollment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Pending,
    Active,
    Archived,
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentStatus::Pending => write!(f, "pending"),
            EnrollmentStatus::Active => write!(f, "active"),
            EnrollmentStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(EnrollmentStatus::Pending),
            "active" => Ok(EnrollmentStatus::Active),
            "archived" => Ok(EnrollmentStatus::Archived),
            _ => Err(format!("Unknown enrollment status: {}", s)),
        }
    }
}

/// The weekly days of an enrollment: two or three distinct weekdays, kept sorted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DayOfWeek>", into = "Vec<DayOfWeek>")]
pub struct PreferredDays(Vec<DayOfWeek>);

impl PreferredDays {
    pub fn new(days: Vec<DayOfWeek>) -> Result<Self, DomainError> {
        let mut sorted = days.clone();
        sorted.sort();
        sorted.dedup();
        if sorted.len() != days.len() {
            return Err(DomainError::Validation(
                "Preferred days must be distinct".to_string(),
            ));
        }
        if !(MIN_DAYS_PER_WEEK..=MAX_DAYS_PER_WEEK).contains(&sorted.len()) {
            return Err(DomainError::Validation(format!(
                "A class must run on {} to {} days per week, got {}",
                MIN_DAYS_PER_WEEK,
                MAX_DAYS_PER_WEEK,
                sorted.len()
            )));
        }
        Ok(Self(sorted))
    }

    pub fn contains(&self, day: DayOfWeek) -> bool {
        self.0.contains(&day)
    }

    pub fn iter(&self) -> impl Iterator<Item = DayOfWeek> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[DayOfWeek] {
        &self.0
    }
}

impl TryFrom<Vec<DayOfWeek>> for PreferredDays {
    type Error = DomainError;

    fn try_from(days: Vec<DayOfWeek>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<PreferredDays> for Vec<DayOfWeek> {
    fn from(days: PreferredDays) -> Self {
        days.0
    }
}

/// A student's recurring class
#[derive(Debug, Clone, Serialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub preferred_days: PreferredDays,
    pub preferred_start: SlotTime,
    pub status: EnrollmentStatus,
    pub created_at: DateTime<Utc>,
    pub activated_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
}

impl Enrollment {
    /// Check if the enrollment currently holds its slots
    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Active
    }

    /// Check if the enrollment is awaiting review
    pub fn is_pending(&self) -> bool {
        self.status == EnrollmentStatus::Pending
    }

    /// Check if the class runs on the given day
    pub fn meets_on(&self, day: DayOfWeek) -> bool {
        self.preferred_days.contains(day)
    }
}

/// Data needed to create a new enrollment request
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub preferred_days: PreferredDays,
    pub preferred_start: SlotTime,
}
