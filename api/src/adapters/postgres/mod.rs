//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod enrollment_repo;
pub mod ledger_repo;
pub mod payment_repo;
pub mod student_directory;

#[cfg(test)]
mod integration_tests;

pub use enrollment_repo::PostgresEnrollmentRepository;
pub use ledger_repo::PostgresLedgerRepository;
pub use payment_repo::PostgresPaymentRepository;
pub use student_directory::PostgresStudentDirectory;
