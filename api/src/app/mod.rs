//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod conflict_resolver;
pub mod credit_policy;
pub mod dashboard_service;
pub mod enrollment_service;
pub mod ledger_service;
pub mod payment_service;

pub use conflict_resolver::{GridCell, GridRow};
pub use credit_policy::CreditGrantPolicy;
pub use dashboard_service::{DashboardService, ScheduledClass, StudentOverview, TodayClass, TodayClasses};
pub use enrollment_service::EnrollmentService;
pub use ledger_service::{AttendanceReceipt, LedgerService};
pub use payment_service::{DecisionOutcome, PaymentService, ReminderReport};
