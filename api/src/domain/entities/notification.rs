//! Notification payloads
//!
//! The core only decides *what* to tell a student. Delivery is up to the configured
//! notification channel.

use serde::Serialize;

use super::student::{StudentId, StudentProfile};

/// A message addressed to a student
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub target_student_id: StudentId,
    /// Phone number from the directory, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub text: String,
}

impl Notification {
    /// Tell a student their payment claim could not be verified
    pub fn payment_rejected(profile: &StudentProfile, month_for: &str) -> Self {
        Self {
            target_student_id: profile.id,
            phone_number: profile.phone_number.clone(),
            text: format!(
                "Hello {}, we could not verify your Music Class fee payment for {}. \
                 Please check with the school office and submit it again.",
                profile.full_name, month_for
            ),
        }
    }

    /// Remind a student that this month's fee is due
    pub fn fee_reminder(profile: &StudentProfile, month_for: &str) -> Self {
        Self {
            target_student_id: profile.id,
            phone_number: profile.phone_number.clone(),
            text: format!(
                "Hello {}, friendly reminder to pay your Music Class fees for {}.",
                profile.full_name, month_for
            ),
        }
    }
}
