//! # 告警通知适配器
//!
//! 实现 `momentum_core::notify::port::AlertNotifier`：
//! - `email`: 通过 SMTP (强制 STARTTLS) 发送 HTML 邮件。
//! - `log`: 未配置 SMTP 时的退化实现，只写日志。

pub mod email;
pub mod log;
