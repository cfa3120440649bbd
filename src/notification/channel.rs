//! 通知渠道 trait 定义
//!
//! 限流门控在 trait 的提供方法 `send` 里实现一次，所有具体渠道
//! 共享同一套冷却语义：渠道作者只需要实现投递和配置检查，
//! 不会各自重复（且不一致地）实现限流逻辑。

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::payload::NotificationPayload;
use super::rate_limiter::{RateLimitStatus, RateLimiter};
use crate::config::NotificationSettings;

/// 单个渠道一次发送尝试的结果
///
/// 三种结果互斥：跳过（限流/未启用）是预期的非错误结果，
/// 失败只代表该渠道自身的投递错误。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum NotificationResult {
    /// 发送成功
    Sent,
    /// 主动跳过，未尝试投递
    Skipped { reason: String },
    /// 投递失败
    Failed { error: String },
}

impl NotificationResult {
    pub fn is_sent(&self) -> bool {
        matches!(self, NotificationResult::Sent)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, NotificationResult::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, NotificationResult::Failed { .. })
    }
}

/// 通知渠道 trait
///
/// 每个具体渠道组合一个独立的 `RateLimiter`，通过 `rate_limiter()`
/// 暴露给提供方法使用。
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// 渠道稳定 ID（用于结果映射和日志）
    fn id(&self) -> &str;

    /// 人类可读名称（仅用于展示）
    fn display_name(&self) -> &str;

    /// 渠道描述（仅用于展示）
    fn description(&self) -> &str;

    /// 渠道内嵌的限流器
    fn rate_limiter(&self) -> &RateLimiter;

    /// 平台能力检查 - 与配置无关，可能做运行时探测
    async fn is_available(&self) -> bool;

    /// 配置中该渠道是否被启用
    fn is_enabled(&self, settings: &NotificationSettings) -> bool;

    /// 配置完整性检查 - 纯结构校验，不做网络请求
    fn is_configured(&self, settings: &NotificationSettings) -> bool;

    /// 原始投递，不带限流门控（由 `send`/`send_test` 调用）
    async fn deliver(
        &self,
        payload: &NotificationPayload,
        settings: &NotificationSettings,
    ) -> Result<()>;

    /// 限流门控的发送路径
    ///
    /// 门控判定在进入时同步完成（任何 await 之前）；投递成功后
    /// 才调用 `record_send`，跳过和失败的尝试都不消耗限流窗口。
    /// 投递超时以 `Failed` 返回，同样不记录。
    async fn send(
        &self,
        payload: &NotificationPayload,
        settings: &NotificationSettings,
    ) -> NotificationResult {
        if let Some(secs) = self.rate_limiter().seconds_until_reset() {
            debug!(
                channel = self.id(),
                seconds_until_reset = secs,
                "Send skipped by rate limit"
            );
            return NotificationResult::Skipped {
                reason: format!("rate limited, retry in {}s", secs),
            };
        }

        match self.deliver(payload, settings).await {
            Ok(()) => {
                self.rate_limiter().record_send();
                debug!(channel = self.id(), "Notification sent");
                NotificationResult::Sent
            }
            Err(e) => {
                warn!(channel = self.id(), error = %e, "Channel delivery failed");
                NotificationResult::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// 测试发送 - 完全绕过限流（既不检查也不记录）
    ///
    /// 用于交互式验证配置，投递固定的测试消息。
    async fn send_test(
        &self,
        settings: &NotificationSettings,
        app_url: &str,
    ) -> NotificationResult {
        let payload = NotificationPayload::test_message(app_url);
        match self.deliver(&payload, settings).await {
            Ok(()) => NotificationResult::Sent,
            Err(e) => {
                warn!(channel = self.id(), error = %e, "Test delivery failed");
                NotificationResult::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// 当前限流状态（每次查询重新计算）
    fn rate_limit_status(&self) -> RateLimitStatus {
        self.rate_limiter().status()
    }

    /// 清除限流状态（测试/支持用）
    fn reset_rate_limit(&self) {
        self.rate_limiter().reset();
    }
}
