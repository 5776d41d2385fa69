//! Credit configuration
//!
//! Defines the ledger amounts used by attendance and payment approval, and the
//! externally supplied policy deciding how many credits one approved payment grants.

use serde::Serialize;

/// Ledger amount of one attended class
pub const ATTENDANCE_DEBIT: i32 = -1;

/// Credits granted per approved payment when no policy is configured
pub const DEFAULT_CREDITS_PER_PAYMENT: i32 = 12;

/// How many credits an approved payment grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum CreditGrantPolicy {
    /// The same number of credits for every payment
    Flat { credits: i32 },
    /// Credits multiplied by the student's number of active enrollments (at least one)
    PerActiveEnrollment { credits_per_enrollment: i32 },
}

impl CreditGrantPolicy {
    /// Build a policy from its configured name and credit amount
    pub fn from_parts(name: &str, credits: i32) -> Result<Self, String> {
        if credits <= 0 {
            return Err(format!("Credits per payment must be positive, got {}", credits));
        }
        match name.to_lowercase().as_str() {
            "flat" => Ok(CreditGrantPolicy::Flat { credits }),
            "per_active_enrollment" => Ok(CreditGrantPolicy::PerActiveEnrollment {
                credits_per_enrollment: credits,
            }),
            _ => Err(format!("Unknown credit grant policy: {}", name)),
        }
    }

    /// Credits to grant for a student with `active_enrollments` active classes
    pub fn grant_amount(&self, active_enrollments: usize) -> i32 {
        match self {
            CreditGrantPolicy::Flat { credits } => *credits,
            CreditGrantPolicy::PerActiveEnrollment {
                credits_per_enrollment,
            } => {
                let count = i32::try_from(active_enrollments.max(1)).unwrap_or(i32::MAX);
                credits_per_enrollment.saturating_mul(count)
            }
        }
    }
}

impl Default for CreditGrantPolicy {
    fn default() -> Self {
        CreditGrantPolicy::Flat {
            credits: DEFAULT_CREDITS_PER_PAYMENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_debit_is_negative() {
        assert!(ATTENDANCE_DEBIT < 0);
    }

    #[test]
    fn flat_policy_ignores_enrollments() {
        let policy = CreditGrantPolicy::Flat { credits: 12 };
        assert_eq!(policy.grant_amount(0), 12);
        assert_eq!(policy.grant_amount(3), 12);
    }

    #[test]
    fn per_enrollment_policy_multiplies() {
        let policy = CreditGrantPolicy::PerActiveEnrollment {
            credits_per_enrollment: 8,
        };
        assert_eq!(policy.grant_amount(2), 16);
    }

    #[test]
    fn per_enrollment_policy_grants_at_least_one_share() {
        let policy = CreditGrantPolicy::PerActiveEnrollment {
            credits_per_enrollment: 8,
        };
        assert_eq!(policy.grant_amount(0), 8);
    }

    #[test]
    fn from_parts_parses_names() {
        assert_eq!(
            CreditGrantPolicy::from_parts("flat", 10).unwrap(),
            CreditGrantPolicy::Flat { credits: 10 }
        );
        assert_eq!(
            CreditGrantPolicy::from_parts("PER_ACTIVE_ENROLLMENT", 8).unwrap(),
            CreditGrantPolicy::PerActiveEnrollment {
                credits_per_enrollment: 8
            }
        );
        assert!(CreditGrantPolicy::from_parts("tiered", 8).is_err());
    }

    #[test]
    fn from_parts_rejects_non_positive_credits() {
        assert!(CreditGrantPolicy::from_parts("flat", 0).is_err());
        assert!(CreditGrantPolicy::from_parts("flat", -4).is_err());
    }

    #[test]
    fn default_is_flat_twelve() {
        assert_eq!(
            CreditGrantPolicy::default(),
            CreditGrantPolicy::Flat { credits: 12 }
        );
    }
}
