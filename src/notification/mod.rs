//! 通知子系统 - 可插拔渠道、独立限流、并发分发
//!
//! # 设计目标
//! 1. 统一接口：所有渠道实现 `NotificationChannel` trait
//! 2. 限流一次实现：冷却逻辑在 trait 提供方法中，渠道只写投递
//! 3. 失败隔离：`NotificationDispatcher` 聚合各渠道独立结果，
//!    单个渠道失败不影响其他渠道
//! 4. 构造期组合：`ChannelRegistry` 在启动时固定渠道集合
//!
//! # 使用示例
//! ```ignore
//! use agent_bridge::{ChannelRegistry, NotificationDispatcher, NotificationPayload, NotificationSettings};
//!
//! let settings = NotificationSettings::load()?;
//! let dispatcher = NotificationDispatcher::new(ChannelRegistry::with_default_channels(&settings));
//!
//! let payload = NotificationPayload::new("Agent finished", "All tasks complete")
//!     .with_event_type("completed")
//!     .with_session_id("s1");
//! let results = dispatcher.dispatch(&payload, &settings).await;
//! ```

pub mod channel;
pub mod channels;
pub mod dispatcher;
pub mod payload;
pub mod rate_limiter;
pub mod registry;

pub use channel::{NotificationChannel, NotificationResult};
pub use channels::{DesktopChannel, NtfyChannel, WebhookChannel};
pub use dispatcher::NotificationDispatcher;
pub use payload::{NotificationPayload, PayloadMetadata};
pub use rate_limiter::{RateLimitStatus, RateLimiter, DEFAULT_RATE_LIMIT_MS};
pub use registry::ChannelRegistry;
