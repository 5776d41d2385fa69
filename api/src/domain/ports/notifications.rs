//! Notification channel port

use async_trait::async_trait;

use crate::domain::entities::Notification;
use crate::error::NotificationError;

/// Outbound channel for student notifications
///
/// Called only after the state change that produced the notification has been committed.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError>;
}
