use crate::error::{Error, Result};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

/// Delivers password-reset codes to the mail relay configured by
/// `OTP_WEBHOOK_URL`. One attempt per request; there is no outbox.
#[derive(Clone)]
pub struct NotificationService {
    client: Client,
    target_url: Option<String>,
}

impl NotificationService {
    pub fn new(target_url: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, target_url }
    }

    pub fn is_configured(&self) -> bool {
        self.target_url.is_some()
    }

    pub async fn send_reset_code(&self, email: &str, otp: &str, ttl_minutes: i64) -> Result<()> {
        let Some(url) = self.target_url.as_deref() else {
            tracing::warn!(email = %email, "OTP_WEBHOOK_URL not set; reset code not delivered");
            return Ok(());
        };

        let payload = json!({
            "event": "password_reset_otp",
            "email": email,
            "otp": otp,
            "expires_in_minutes": ttl_minutes,
        });

        let resp = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "reset code delivery failed");
                Error::Internal("Failed to send OTP".to_string())
            })?;

        if !resp.status().is_success() {
            tracing::error!(status = %resp.status(), "reset code relay rejected the request");
            return Err(Error::Internal("Failed to send OTP".to_string()));
        }

        tracing::info!(email = %email, "reset code delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_relay_skips_delivery() {
        let svc = NotificationService::new(None);
        assert!(!svc.is_configured());
        tokio_test::assert_ok!(svc.send_reset_code("asha@example.com", "123456", 10).await);
    }

    #[tokio::test]
    async fn unreachable_relay_is_an_internal_error() {
        let svc = NotificationService::new(Some("http://127.0.0.1:1/otp".to_string()));
        let err = svc
            .send_reset_code("asha@example.com", "123456", 10)
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
