use thiserror::Error;

/// # Summary
/// 行情数据域错误枚举，处理连接、读取与解析问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 所有变体对接入循环而言都不是致命错误。
#[derive(Error, Debug)]
pub enum MarketError {
    // 网络层错误 (建连失败、读帧失败)
    #[error("Network error: {0}")]
    Network(String),
    // 消息解析错误，如 JSON 格式不匹配或价格非法
    #[error("Parse error: {0}")]
    Parse(String),
    // 对端关闭或流已结束
    #[error("Stream closed")]
    Closed,
}

impl MarketError {
    /// # Summary
    /// 判断错误是否需要丢弃当前连接。
    ///
    /// # Logic
    /// 单条消息解析失败不影响连接本身，其余错误均需重连。
    pub fn requires_reconnect(&self) -> bool {
        !matches!(self, MarketError::Parse(_))
    }
}
