//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod enrollments;
pub mod ledger;
pub mod payments;
pub mod schedule;
pub mod students;

pub use enrollments::{
    accept_enrollment, archive_enrollment, get_roster_for_day, list_pending_enrollments,
    reject_enrollment, submit_enrollment,
};
pub use ledger::{get_attendance_on, get_balance, get_ledger_history, mark_attendance};
pub use payments::{
    claim_payment, decide_payment, list_pending_payments, list_student_payments,
    preview_fee_reminders, send_fee_reminders,
};
pub use schedule::{get_schedule_grid, get_today_classes, list_courses};
pub use students::get_student_overview;
