//! Webhook notification channel
//!
//! POSTs each notification as JSON. When a secret is configured the body is signed with
//! HMAC-SHA256 and the hex digest sent as `X-Classbook-Signature: sha256=<hex>`, the
//! same scheme Gitea and GitHub use for their webhooks.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;

use crate::domain::entities::Notification;
use crate::domain::ports::NotificationChannel;
use crate::error::NotificationError;

pub const SIGNATURE_HEADER: &str = "X-Classbook-Signature";

type HmacSha256 = Hmac<Sha256>;

/// Sign a payload, returning the header value
pub fn sign_payload(secret: &str, payload: &[u8]) -> Result<String, NotificationError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| NotificationError::InvalidSecret)?;
    mac.update(payload);
    Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

pub struct WebhookNotificationChannel {
    http: Client,
    url: String,
    secret: Option<String>,
}

impl WebhookNotificationChannel {
    pub fn new(url: String, secret: Option<String>) -> Self {
        Self {
            http: Client::new(),
            url,
            secret,
        }
    }
}

#[async_trait]
impl NotificationChannel for WebhookNotificationChannel {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        let body = serde_json::to_vec(notification)?;

        let mut request = self
            .http
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(secret) = &self.secret {
            request = request.header(SIGNATURE_HEADER, sign_payload(secret, &body)?);
        }

        let response = request.body(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(
            student_id = %notification.target_student_id,
            "Notification delivered to webhook"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_matches_known_digest() {
        let signature =
            sign_payload("key", b"The quick brown fox jumps over the lazy dog").unwrap();
        assert_eq!(
            signature,
            "sha256=f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn signature_verifies_with_same_secret() {
        let payload = br#"{"target_student_id":"x","text":"hi"}"#;
        let signature = sign_payload("s3cret", payload).unwrap();
        let hex_digest = signature.strip_prefix("sha256=").unwrap();

        let mut mac = HmacSha256::new_from_slice(b"s3cret").unwrap();
        mac.update(payload);
        assert!(mac.verify_slice(&hex::decode(hex_digest).unwrap()).is_ok());

        let mut other = HmacSha256::new_from_slice(b"other").unwrap();
        other.update(payload);
        assert!(other.verify_slice(&hex::decode(hex_digest).unwrap()).is_err());
    }
}
