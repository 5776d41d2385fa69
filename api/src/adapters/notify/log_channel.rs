//! Notification channel that only logs
//!
//! Used when no webhook is configured, e.g. in local development.

use async_trait::async_trait;

use crate::domain::entities::Notification;
use crate::domain::ports::NotificationChannel;
use crate::error::NotificationError;

pub struct LogNotificationChannel;

#[async_trait]
impl NotificationChannel for LogNotificationChannel {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        tracing::info!(
            student_id = %notification.target_student_id,
            phone = notification.phone_number.as_deref().unwrap_or("-"),
            text = %notification.text,
            "Notification (log channel)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::StudentId;

    #[tokio::test]
    async fn log_channel_always_succeeds() {
        let notification = Notification {
            target_student_id: StudentId::new(),
            phone_number: None,
            text: "Hello".to_string(),
        };
        assert!(LogNotificationChannel.send(&notification).await.is_ok());
    }
}
