//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::Utc;

use crate::domain::entities::{
    CourseId, DayOfWeek, Enrollment, EnrollmentId, EnrollmentStatus, PreferredDays, SlotTime,
    StudentId, StudentProfile,
};

/// Create a test student profile with default values
pub fn test_student() -> StudentProfile {
    test_student_named("Meera Iyer")
}

/// Create a test student profile with a specific name
pub fn test_student_named(name: &str) -> StudentProfile {
    StudentProfile {
        id: StudentId::new(),
        full_name: name.to_string(),
        phone_number: Some("919800000000".to_string()),
        age: Some(14),
    }
}

/// Create a test enrollment for a random student in course 1
pub fn test_enrollment(
    days: PreferredDays,
    start: SlotTime,
    status: EnrollmentStatus,
) -> Enrollment {
    let now = Utc::now();
    Enrollment {
        id: EnrollmentId::new(),
        student_id: StudentId::new(),
        course_id: CourseId(1),
        preferred_days: days,
        preferred_start: start,
        status,
        created_at: now,
        activated_at: (status != EnrollmentStatus::Pending).then_some(now),
        archived_at: (status == EnrollmentStatus::Archived).then_some(now),
    }
}

/// Create an active enrollment for a given student and course
///
/// Panics on an invalid day list or start time, which is a bug in the test.
pub fn active_enrollment_for(
    student_id: StudentId,
    course_id: CourseId,
    days: &[DayOfWeek],
    start: &str,
) -> Enrollment {
    let days = PreferredDays::new(days.to_vec()).expect("valid test days");
    let start: SlotTime = start.parse().expect("valid test start time");
    Enrollment {
        student_id,
        course_id,
        ..test_enrollment(days, start, EnrollmentStatus::Active)
    }
}
