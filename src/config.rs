//! 通知配置 - 协作方持久化的用户设置（格式归协作方所有）

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// ntfy 推送渠道配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NtfySettings {
    pub enabled: bool,
    /// 推送主题（必填）
    pub topic: String,
    /// ntfy 服务器地址，缺省使用官方 ntfy.sh
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    /// 该渠道的限流窗口（毫秒），缺省 60000
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_ms: Option<u64>,
}

/// Webhook 渠道配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebhookSettings {
    pub enabled: bool,
    /// 回调地址（必填，http/https）
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_ms: Option<u64>,
}

/// 桌面提醒渠道配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesktopSettings {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_ms: Option<u64>,
}

/// 所有渠道的配置集合
///
/// 除了各渠道的 `enabled` 开关和限流窗口，字段内容只由对应
/// 渠道的 `is_configured` 解释，派发核心不做其他假设。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub ntfy: NtfySettings,
    pub webhook: WebhookSettings,
    pub desktop: DesktopSettings,
}

impl NotificationSettings {
    /// 默认配置文件路径：~/.config/agent-bridge/settings.json
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/agent-bridge/settings.json"))
    }

    /// 从默认路径加载；文件不存在时返回全默认配置
    pub fn load() -> Result<Self> {
        let path = Self::default_path()
            .context("Cannot determine home directory for settings path")?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// 从指定路径加载
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        Ok(settings)
    }
}
