//! 内建通知渠道实现

pub mod desktop;
pub mod ntfy;
pub mod webhook;

pub use desktop::DesktopChannel;
pub use ntfy::NtfyChannel;
pub use webhook::WebhookChannel;
