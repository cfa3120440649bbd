//! 渠道限流器 - 同一渠道两次发送之间的最小时间间隔

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// 默认限流窗口：60 秒
pub const DEFAULT_RATE_LIMIT_MS: u64 = 60_000;

/// 限流状态快照
///
/// 每次查询时根据上次发送时间和窗口重新计算，不单独存储。
/// `seconds_until_reset` 有值当且仅当当前处于限流中。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStatus {
    pub is_limited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_notification_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds_until_reset: Option<u64>,
}

#[derive(Debug, Default)]
struct LimiterState {
    /// 上次成功发送时刻（单调时钟，用于窗口计算）
    last_sent_at: Option<Instant>,
    /// 上次成功发送的墙钟时间（仅用于状态展示）
    last_sent_wall: Option<DateTime<Utc>>,
}

/// 渠道限流器
///
/// 内部用 Mutex 保护，渠道可以通过 `&self` 记录发送。
/// `record_send` 只能在一次真实尝试成功之后调用：跳过和失败的
/// 尝试都不消耗窗口。
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    state: Mutex<LimiterState>,
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: Mutex::new(LimiterState::default()),
        }
    }

    /// 按毫秒窗口构建（窗口必须 > 0，0 会被提升到 1ms）
    pub fn with_window_ms(window_ms: u64) -> Self {
        Self::new(Duration::from_millis(window_ms.max(1)))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn locked(&self) -> MutexGuard<'_, LimiterState> {
        // 持锁期间不会 panic，中毒锁直接取回内部状态
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 当前是否处于限流中（从未发送过则为 false）
    pub fn is_limited(&self) -> bool {
        self.is_limited_at(Instant::now())
    }

    pub(crate) fn is_limited_at(&self, now: Instant) -> bool {
        self.seconds_until_reset_at(now).is_some()
    }

    /// 距离窗口结束还剩多少秒（向上取整，限流期间恒 >= 1）
    ///
    /// 未限流时返回 None，窗口刚好到期的瞬间同样返回 None。
    pub fn seconds_until_reset(&self) -> Option<u64> {
        self.seconds_until_reset_at(Instant::now())
    }

    pub(crate) fn seconds_until_reset_at(&self, now: Instant) -> Option<u64> {
        let state = self.locked();
        let last = state.last_sent_at?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed >= self.window {
            return None;
        }
        let remaining = self.window - elapsed;
        Some(((remaining.as_millis() + 999) / 1000) as u64)
    }

    /// 记录一次成功发送
    pub fn record_send(&self) {
        let mut state = self.locked();
        state.last_sent_at = Some(Instant::now());
        state.last_sent_wall = Some(Utc::now());
    }

    /// 清除限流状态（测试/支持用）
    pub fn reset(&self) {
        let mut state = self.locked();
        state.last_sent_at = None;
        state.last_sent_wall = None;
    }

    /// 当前限流状态快照
    pub fn status(&self) -> RateLimitStatus {
        let seconds_until_reset = self.seconds_until_reset();
        let state = self.locked();
        RateLimitStatus {
            is_limited: seconds_until_reset.is_some(),
            last_notification_time: state.last_sent_wall,
            seconds_until_reset,
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::with_window_ms(DEFAULT_RATE_LIMIT_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_sent_is_not_limited() {
        let limiter = RateLimiter::default();
        assert!(!limiter.is_limited());
        assert!(limiter.seconds_until_reset().is_none());

        let status = limiter.status();
        assert!(!status.is_limited);
        assert!(status.last_notification_time.is_none());
        assert!(status.seconds_until_reset.is_none());
    }

    #[test]
    fn test_limited_immediately_after_record_send() {
        let limiter = RateLimiter::default();
        limiter.record_send();

        assert!(limiter.is_limited());
        let secs = limiter.seconds_until_reset().unwrap();
        // 向上取整到秒，且不超过整个窗口
        assert!(secs >= 1);
        assert!(secs <= 60);

        let status = limiter.status();
        assert!(status.is_limited);
        assert!(status.last_notification_time.is_some());
        assert_eq!(status.seconds_until_reset, Some(secs));
    }

    #[test]
    fn test_not_limited_once_window_elapsed() {
        let limiter = RateLimiter::with_window_ms(60_000);
        limiter.record_send();

        // 用注入时刻推进到窗口之后，避免真实等待
        let after_window = Instant::now() + Duration::from_millis(60_000);
        assert!(!limiter.is_limited_at(after_window));
        assert!(limiter.seconds_until_reset_at(after_window).is_none());
    }

    #[test]
    fn test_seconds_until_reset_rounds_up() {
        let limiter = RateLimiter::with_window_ms(2_500);
        limiter.record_send();

        // 剩余 2.5s 向上取整为 3
        assert_eq!(limiter.seconds_until_reset(), Some(3));

        let near_end = Instant::now() + Duration::from_millis(2_400);
        // 剩余约 100ms 仍然报告 1 秒
        assert_eq!(limiter.seconds_until_reset_at(near_end), Some(1));
    }

    #[test]
    fn test_short_window_expires() {
        let limiter = RateLimiter::with_window_ms(50);
        limiter.record_send();
        assert!(limiter.is_limited());

        std::thread::sleep(Duration::from_millis(100));
        assert!(!limiter.is_limited());
        assert!(limiter.seconds_until_reset().is_none());
    }

    #[test]
    fn test_reset_clears_state() {
        let limiter = RateLimiter::default();
        limiter.record_send();
        assert!(limiter.is_limited());

        limiter.reset();
        assert!(!limiter.is_limited());
        assert!(limiter.status().last_notification_time.is_none());
    }
}
