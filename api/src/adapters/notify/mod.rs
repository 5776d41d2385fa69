//! Notification channel adapters
//!
//! Delivery itself (SMS, WhatsApp, email) is handled downstream; these adapters either
//! log the payload or hand it to a webhook that does the delivery.

pub mod log_channel;
pub mod webhook;

pub use log_channel::LogNotificationChannel;
pub use webhook::WebhookNotificationChannel;
