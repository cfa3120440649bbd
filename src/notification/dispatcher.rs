//! 通知分发器 - 并发扇出到所有启用渠道，聚合互相独立的结果

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info};

use super::channel::{NotificationChannel, NotificationResult};
use super::payload::NotificationPayload;
use super::registry::ChannelRegistry;
use crate::config::NotificationSettings;

/// 通知分发器
///
/// 失败隔离边界：单个渠道的限流跳过或投递失败都只体现在它
/// 自己的结果里，不影响兄弟渠道，也不会让 dispatch 本身报错。
/// 全部失败同样以结果映射返回。核心内不做重试，重试策略归
/// 调用方。
pub struct NotificationDispatcher {
    registry: ChannelRegistry,
}

impl NotificationDispatcher {
    pub fn new(registry: ChannelRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// 解析启用渠道并扇出发送，返回按渠道 ID 键控的结果
    pub async fn dispatch(
        &self,
        payload: &NotificationPayload,
        settings: &NotificationSettings,
    ) -> HashMap<String, NotificationResult> {
        let channels = self.registry.resolve_enabled(settings).await;
        self.dispatch_to(payload, settings, &channels).await
    }

    /// 向指定渠道集合扇出发送
    ///
    /// 所有发送并发进行（渠道之间无顺序保证），统一 await 后
    /// 聚合，不遗留任何任务。
    pub async fn dispatch_to(
        &self,
        payload: &NotificationPayload,
        settings: &NotificationSettings,
        channels: &[Arc<dyn NotificationChannel>],
    ) -> HashMap<String, NotificationResult> {
        if channels.is_empty() {
            debug!("No enabled channels, nothing to dispatch");
            return HashMap::new();
        }

        let sends = channels.iter().map(|channel| {
            let channel = channel.clone();
            async move {
                let result = channel.send(payload, settings).await;
                (channel.id().to_string(), result)
            }
        });

        let results: HashMap<String, NotificationResult> =
            join_all(sends).await.into_iter().collect();

        let sent = results.values().filter(|r| r.is_sent()).count();
        info!(
            channels = results.len(),
            sent = sent,
            event_type = %payload.metadata.event_type,
            "Notification dispatched"
        );
        results
    }
}
