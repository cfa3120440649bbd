//! 通知内容 - 对派发核心不透明，原样传给每个渠道

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 通知消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// 标题
    pub title: String,
    /// 正文
    pub body: String,
    /// 消息元数据
    pub metadata: PayloadMetadata,
}

/// 消息元数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMetadata {
    /// 事件类型（如 "completed"、"waiting_for_input"、"error"、"test"）
    pub event_type: String,
    /// 会话 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// 项目路径
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// 事件时间戳
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl NotificationPayload {
    /// 创建简单消息
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            metadata: PayloadMetadata::default(),
        }
    }

    /// 设置事件类型
    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.metadata.event_type = event_type.into();
        self
    }

    /// 设置会话 ID
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.metadata.session_id = Some(session_id.into());
        self
    }

    /// 设置项目路径
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.metadata.project = Some(project.into());
        self
    }

    /// 设置事件时间戳
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.metadata.timestamp = Some(timestamp);
        self
    }

    /// 交互式配置验证用的固定测试消息
    pub fn test_message(app_url: &str) -> Self {
        Self::new(
            "Test notification",
            format!("Notifications are working. Open {} to manage settings.", app_url),
        )
        .with_event_type("test")
    }
}
