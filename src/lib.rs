//! Agent Bridge - 跟踪本地 coding agent 进程并向用户分发状态通知
//!
//! 为移动端前台控制本地 agent 的后端提供进程生命周期核心：
//! - `ProcessRegistry`：会话到 agent 进程的内存注册表，回答
//!   "这个会话现在有没有在跑的进程"
//! - 通知子系统：可插拔渠道 + 每渠道独立限流 + 并发分发
//!
//! HTTP 路由、UI 和配置持久化都是外部协作方，本 crate 只在
//! 进程内被调用。

pub mod config;
pub mod notification;
pub mod process;

pub use config::{DesktopSettings, NotificationSettings, NtfySettings, WebhookSettings};
pub use notification::channel::{NotificationChannel, NotificationResult};
pub use notification::channels::{DesktopChannel, NtfyChannel, WebhookChannel};
pub use notification::dispatcher::NotificationDispatcher;
pub use notification::payload::{NotificationPayload, PayloadMetadata};
pub use notification::rate_limiter::{RateLimitStatus, RateLimiter, DEFAULT_RATE_LIMIT_MS};
pub use notification::registry::ChannelRegistry;
pub use process::{ProcessInfo, ProcessRegistry};
