//! Webhook 渠道 - 把通知以 JSON POST 到协作方配置的回调地址

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::NotificationSettings;
use crate::notification::channel::NotificationChannel;
use crate::notification::payload::NotificationPayload;
use crate::notification::rate_limiter::{RateLimiter, DEFAULT_RATE_LIMIT_MS};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Webhook 渠道
pub struct WebhookChannel {
    client: Client,
    limiter: RateLimiter,
}

impl WebhookChannel {
    pub fn new(rate_limit_ms: Option<u64>) -> Self {
        Self {
            client: Client::new(),
            limiter: RateLimiter::with_window_ms(rate_limit_ms.unwrap_or(DEFAULT_RATE_LIMIT_MS)),
        }
    }
}

impl Default for WebhookChannel {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    fn id(&self) -> &str {
        "webhook"
    }

    fn display_name(&self) -> &str {
        "Webhook"
    }

    fn description(&self) -> &str {
        "POST notification events to a custom webhook URL"
    }

    fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn is_enabled(&self, settings: &NotificationSettings) -> bool {
        settings.webhook.enabled
    }

    fn is_configured(&self, settings: &NotificationSettings) -> bool {
        let url = settings.webhook.url.trim();
        url.starts_with("http://") || url.starts_with("https://")
    }

    async fn deliver(
        &self,
        payload: &NotificationPayload,
        settings: &NotificationSettings,
    ) -> Result<()> {
        let body = serde_json::json!({
            "title": payload.title,
            "body": payload.body,
            "sessionId": payload.metadata.session_id,
            "project": payload.metadata.project,
            "eventType": payload.metadata.event_type,
            "timestamp": payload.metadata.timestamp,
        });

        let response = self
            .client
            .post(settings.webhook.url.trim())
            .json(&body)
            .timeout(SEND_TIMEOUT)
            .send()
            .await
            .context("webhook request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("webhook returned status {}", status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_configured_requires_http_url() {
        let channel = WebhookChannel::default();
        let mut settings = NotificationSettings::default();

        assert!(!channel.is_configured(&settings));

        settings.webhook.url = "ftp://example.com".to_string();
        assert!(!channel.is_configured(&settings));

        settings.webhook.url = "https://example.com/hook".to_string();
        assert!(channel.is_configured(&settings));

        settings.webhook.url = "  http://localhost:8080/notify ".to_string();
        assert!(channel.is_configured(&settings));
    }

    #[test]
    fn test_enabled_flag_comes_from_settings() {
        let channel = WebhookChannel::default();
        let mut settings = NotificationSettings::default();
        assert!(!channel.is_enabled(&settings));
        settings.webhook.enabled = true;
        assert!(channel.is_enabled(&settings));
    }
}
