//! Student domain entity
//!
//! Student profiles belong to the directory service; the core only reads them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a student (the identity provider's user id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub Uuid);

impl StudentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StudentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for StudentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Directory profile of a student
#[derive(Debug, Clone, Serialize)]
pub struct StudentProfile {
    pub id: StudentId,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub age: Option<i32>,
}

impl StudentProfile {
    /// First name, used in short notification greetings
    pub fn first_name(&self) -> &str {
        self.full_name
            .split_whitespace()
            .next()
            .unwrap_or(&self.full_name)
    }
}
