//! `SeaORM` Entity, generated from migrations/

pub mod credit_ledger;
pub mod enrollments;
pub mod payments;
pub mod profiles;
pub mod roster_versions;
