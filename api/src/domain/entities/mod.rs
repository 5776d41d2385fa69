//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod course;
pub mod enrollment;
pub mod ledger_entry;
pub mod notification;
pub mod payment;
pub mod student;
pub mod time_slot;

pub use course::{standard_courses, Course, CourseCategory, CourseId};
pub use enrollment::{
    Enrollment, EnrollmentId, EnrollmentStatus, NewEnrollment, PreferredDays, MAX_DAYS_PER_WEEK,
    MIN_DAYS_PER_WEEK,
};
pub use ledger_entry::{
    balance_of, LedgerEntry, LedgerEntryId, NewLedgerEntry, ReasonKind, ReasonTag,
};
pub use notification::Notification;
pub use payment::{
    month_label, NewPayment, Payment, PaymentDecision, PaymentId, PaymentStatus,
};
pub use student::{StudentId, StudentProfile};
pub use time_slot::{DayOfWeek, SlotTime, TimeSlot};
