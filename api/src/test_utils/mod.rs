//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! The in-memory ports stand in for PostgreSQL in service tests and in router tests
//! built with axum-test, since `AppState` holds its services over trait objects.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
