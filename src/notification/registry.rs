//! 渠道注册表 - 启动时组合的固定渠道集合

use std::sync::Arc;
use tracing::{debug, info};

use super::channel::NotificationChannel;
use super::channels::{DesktopChannel, NtfyChannel, WebhookChannel};
use crate::config::NotificationSettings;

/// 渠道注册表
///
/// 渠道集合在构造时组合完成（不做动态插件加载）。
/// `resolve_enabled` 负责回答"当前哪些渠道可用且已配置"。
pub struct ChannelRegistry {
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// 内建渠道集合，各渠道的限流窗口取自配置
    pub fn with_default_channels(settings: &NotificationSettings) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(NtfyChannel::new(settings.ntfy.rate_limit_ms)));
        registry.register(Arc::new(WebhookChannel::new(settings.webhook.rate_limit_ms)));
        registry.register(Arc::new(DesktopChannel::new(settings.desktop.rate_limit_ms)));
        registry
    }

    /// 注册渠道
    pub fn register(&mut self, channel: Arc<dyn NotificationChannel>) {
        info!(channel = channel.id(), "Registering notification channel");
        self.channels.push(channel);
    }

    /// 已注册的渠道数量
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// 已注册的渠道 ID
    pub fn channel_ids(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.id()).collect()
    }

    /// 按 ID 查找渠道
    pub fn get(&self, id: &str) -> Option<Arc<dyn NotificationChannel>> {
        self.channels.iter().find(|c| c.id() == id).cloned()
    }

    /// 解析当前启用、已配置且平台可用的渠道
    pub async fn resolve_enabled(
        &self,
        settings: &NotificationSettings,
    ) -> Vec<Arc<dyn NotificationChannel>> {
        let mut enabled = Vec::new();
        for channel in &self.channels {
            if !channel.is_enabled(settings) {
                debug!(channel = channel.id(), "Channel disabled, skipping");
                continue;
            }
            if !channel.is_configured(settings) {
                debug!(channel = channel.id(), "Channel not configured, skipping");
                continue;
            }
            if !channel.is_available().await {
                debug!(channel = channel.id(), "Channel unavailable on this platform, skipping");
                continue;
            }
            enabled.push(channel.clone());
        }
        enabled
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
