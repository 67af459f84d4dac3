use thiserror::Error;

/// # Summary
/// 通知服务错误枚举。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum NotifyError {
    /// 网络连接或传输错误
    #[error("Network error: {0}")]
    Network(String),

    /// 配置错误 (如非法的发件地址)
    #[error("Configuration error: {0}")]
    Config(String),

    /// 消息构建或平台侧返回的错误
    #[error("Platform error: {0}")]
    Platform(String),
}
