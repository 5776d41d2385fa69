//! Clock port
//!
//! Attendance and fee months depend on "today"; services read it through this trait.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
