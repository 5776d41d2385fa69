//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod clock;
pub mod directory;
pub mod notifications;
pub mod repositories;

pub use clock::Clock;
pub use directory::{CourseCatalog, StudentDirectory};
pub use notifications::NotificationChannel;
pub use repositories::{
    ActivationOutcome, EnrollmentRepository, LedgerRepository, PaymentRepository, RosterSnapshot,
};
