//! 桌面提醒渠道 - 通过系统通知工具弹出本地提醒

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;

use crate::config::NotificationSettings;
use crate::notification::channel::NotificationChannel;
use crate::notification::payload::NotificationPayload;
use crate::notification::rate_limiter::{RateLimiter, DEFAULT_RATE_LIMIT_MS};

#[cfg(target_os = "macos")]
const NOTIFIER_BIN: &str = "osascript";
#[cfg(not(target_os = "macos"))]
const NOTIFIER_BIN: &str = "notify-send";

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// 桌面提醒渠道
pub struct DesktopChannel {
    limiter: RateLimiter,
}

impl DesktopChannel {
    pub fn new(rate_limit_ms: Option<u64>) -> Self {
        Self {
            limiter: RateLimiter::with_window_ms(rate_limit_ms.unwrap_or(DEFAULT_RATE_LIMIT_MS)),
        }
    }

    #[cfg(target_os = "macos")]
    fn notify_command(payload: &NotificationPayload) -> Command {
        // {:?} 的转义与 AppleScript 字符串兼容
        let script = format!(
            "display notification {:?} with title {:?}",
            payload.body, payload.title
        );
        let mut cmd = Command::new(NOTIFIER_BIN);
        cmd.args(["-e", &script]);
        cmd
    }

    #[cfg(not(target_os = "macos"))]
    fn notify_command(payload: &NotificationPayload) -> Command {
        let mut cmd = Command::new(NOTIFIER_BIN);
        cmd.args([payload.title.as_str(), payload.body.as_str()]);
        cmd
    }

    /// 带超时地运行通知命令
    ///
    /// 通知工具可能卡住（例如 D-Bus 无响应），超时以错误返回，
    /// 不会无限挂起；超时后子进程随 future 一起被杀掉。
    async fn run_notifier(mut cmd: Command, timeout: Duration) -> Result<()> {
        cmd.kill_on_drop(true);

        let output = tokio::time::timeout(timeout, cmd.output())
            .await
            .map_err(|_| anyhow::anyhow!("notifier timed out after {}s", timeout.as_secs()))?
            .with_context(|| format!("failed to run {}", NOTIFIER_BIN))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "{} exited with {}: {}",
                NOTIFIER_BIN,
                output.status,
                stderr.trim()
            );
        }
        Ok(())
    }
}

impl Default for DesktopChannel {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl NotificationChannel for DesktopChannel {
    fn id(&self) -> &str {
        "desktop"
    }

    fn display_name(&self) -> &str {
        "Desktop alert"
    }

    fn description(&self) -> &str {
        "Local desktop notification on the machine running the agent"
    }

    fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    async fn is_available(&self) -> bool {
        which::which(NOTIFIER_BIN).is_ok()
    }

    fn is_enabled(&self, settings: &NotificationSettings) -> bool {
        settings.desktop.enabled
    }

    fn is_configured(&self, _settings: &NotificationSettings) -> bool {
        // 无凭据要求，开关即配置
        true
    }

    async fn deliver(
        &self,
        payload: &NotificationPayload,
        _settings: &NotificationSettings,
    ) -> Result<()> {
        Self::run_notifier(Self::notify_command(payload), SEND_TIMEOUT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_configured_always_true() {
        let channel = DesktopChannel::default();
        assert!(channel.is_configured(&NotificationSettings::default()));
    }

    #[test]
    fn test_enabled_flag_comes_from_settings() {
        let channel = DesktopChannel::default();
        let mut settings = NotificationSettings::default();
        assert!(!channel.is_enabled(&settings));
        settings.desktop.enabled = true;
        assert!(channel.is_enabled(&settings));
    }

    #[tokio::test]
    async fn test_is_available_matches_which_lookup() {
        let channel = DesktopChannel::default();
        assert_eq!(channel.is_available().await, which::which(NOTIFIER_BIN).is_ok());
    }

    #[tokio::test]
    async fn test_run_notifier_times_out_hung_command() {
        // 卡住的通知工具必须在超时后以错误返回，不能无限挂起
        let mut cmd = Command::new("sleep");
        cmd.arg("5");

        let result = DesktopChannel::run_notifier(cmd, Duration::from_millis(50)).await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_run_notifier_success_within_timeout() {
        let cmd = Command::new("true");
        let result = DesktopChannel::run_notifier(cmd, Duration::from_secs(5)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_notifier_reports_nonzero_exit() {
        let cmd = Command::new("false");
        let err = DesktopChannel::run_notifier(cmd, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }
}
