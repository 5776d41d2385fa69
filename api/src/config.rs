use std::env;

use chrono::FixedOffset;

use crate::app::credit_policy::{CreditGrantPolicy, DEFAULT_CREDITS_PER_PAYMENT};

/// India Standard Time, the school's local day
const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// How many credits an approved payment grants
    pub credit_policy: CreditGrantPolicy,
    /// Offset used to decide which calendar day "today" is
    pub utc_offset: FixedOffset,
    /// Where notifications are POSTed; logged only when unset
    pub notify_webhook_url: Option<String>,
    /// HMAC-SHA256 key for signing webhook bodies
    pub notify_webhook_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let credits = get("CREDITS_PER_PAYMENT")
            .map(|v| v.parse::<i32>().expect("CREDITS_PER_PAYMENT must be an integer"))
            .unwrap_or(DEFAULT_CREDITS_PER_PAYMENT);
        let policy_name = get("CREDIT_GRANT_POLICY").unwrap_or_else(|| "flat".to_string());
        let offset_minutes = get("UTC_OFFSET_MINUTES")
            .map(|v| v.parse::<i32>().expect("UTC_OFFSET_MINUTES must be an integer"))
            .unwrap_or(DEFAULT_UTC_OFFSET_MINUTES);

        Self {
            database_url: get("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: get("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
            credit_policy: CreditGrantPolicy::from_parts(&policy_name, credits)
                .expect("Invalid credit grant policy"),
            utc_offset: FixedOffset::east_opt(offset_minutes * 60)
                .expect("UTC_OFFSET_MINUTES out of range"),
            notify_webhook_url: get("NOTIFY_WEBHOOK_URL").filter(|u| !u.is_empty()),
            notify_webhook_secret: get("NOTIFY_WEBHOOK_SECRET").filter(|s| !s.is_empty()),
        }
    }
}
