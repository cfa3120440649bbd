//! ntfy 推送渠道 - 经 ntfy 主题把通知推到用户手机

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::NotificationSettings;
use crate::notification::channel::NotificationChannel;
use crate::notification::payload::NotificationPayload;
use crate::notification::rate_limiter::{RateLimiter, DEFAULT_RATE_LIMIT_MS};

const DEFAULT_NTFY_SERVER: &str = "https://ntfy.sh";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// ntfy 推送渠道
pub struct NtfyChannel {
    client: Client,
    limiter: RateLimiter,
}

impl NtfyChannel {
    pub fn new(rate_limit_ms: Option<u64>) -> Self {
        Self {
            client: Client::new(),
            limiter: RateLimiter::with_window_ms(rate_limit_ms.unwrap_or(DEFAULT_RATE_LIMIT_MS)),
        }
    }

    fn topic_url(settings: &NotificationSettings) -> String {
        let server = settings
            .ntfy
            .server
            .as_deref()
            .unwrap_or(DEFAULT_NTFY_SERVER);
        format!("{}/{}", server.trim_end_matches('/'), settings.ntfy.topic)
    }

    /// HTTP header 只接受可见 ASCII；标题里的其他字符（会话名、
    /// 项目路径可能带非 ASCII）替换为 '?'，避免整次发送失败
    fn ascii_header_value(s: &str) -> String {
        s.chars()
            .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
            .collect()
    }
}

impl Default for NtfyChannel {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl NotificationChannel for NtfyChannel {
    fn id(&self) -> &str {
        "ntfy"
    }

    fn display_name(&self) -> &str {
        "ntfy push"
    }

    fn description(&self) -> &str {
        "Push notifications to your phone via an ntfy topic"
    }

    fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    async fn is_available(&self) -> bool {
        // 纯 HTTP，无平台依赖
        true
    }

    fn is_enabled(&self, settings: &NotificationSettings) -> bool {
        settings.ntfy.enabled
    }

    fn is_configured(&self, settings: &NotificationSettings) -> bool {
        !settings.ntfy.topic.trim().is_empty()
    }

    async fn deliver(
        &self,
        payload: &NotificationPayload,
        settings: &NotificationSettings,
    ) -> Result<()> {
        let url = Self::topic_url(settings);

        // 错误事件用高优先级；ntfy 的 Tags 会自动附加表情
        let (priority, tags) = if payload.metadata.event_type == "error" {
            ("high", "warning,robot")
        } else {
            ("default", "robot")
        };

        let response = self
            .client
            .post(&url)
            .header("Title", Self::ascii_header_value(&payload.title))
            .header("Priority", priority)
            .header("Tags", tags)
            .timeout(SEND_TIMEOUT)
            .body(payload.body.clone())
            .send()
            .await
            .context("ntfy request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("ntfy returned status {}", status);
        }
        Ok(())
    }
}
