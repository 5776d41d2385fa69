//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod catalog;
pub mod clock;
pub mod notify;
pub mod postgres;

pub use catalog::StaticCourseCatalog;
pub use clock::SystemClock;
pub use notify::{LogNotificationChannel, WebhookNotificationChannel};
pub use postgres::{
    PostgresEnrollmentRepository, PostgresLedgerRepository, PostgresPaymentRepository,
    PostgresStudentDirectory,
};
