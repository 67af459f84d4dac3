use crate::market::entity::{IndicatorSnapshot, Tick};
use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 行情源上的一条活动连接。
///
/// # Invariants
/// - 连接之间不共享状态，断线后由调用方通过 `TickSource::connect` 重建。
/// - 不做去重与缓冲，每条物理消息最多交付一次。
#[async_trait]
pub trait TickConnection: Send {
    /// # Summary
    /// 读取下一笔成交。
    ///
    /// # Logic
    /// 1. 等待对端推送下一帧。
    /// 2. 跳过心跳等非数据帧。
    /// 3. 解析为 `Tick` 返回。
    ///
    /// # Returns
    /// 成功返回 Tick，连接异常返回 `MarketError::Network` / `Closed`，
    /// 单条消息非法返回 `MarketError::Parse`。
    async fn next_tick(&mut self) -> Result<Tick, MarketError>;

    /// 主动关闭连接，重复调用无副作用。
    async fn close(&mut self);
}

/// # Summary
/// 单交易对的逐笔成交数据源。
///
/// # Invariants
/// - 实现者必须是 `Send + Sync`，以便接入循环在后台任务中持有。
#[async_trait]
pub trait TickSource: Send + Sync {
    /// # Summary
    /// 建立到行情端点的新连接。
    ///
    /// # Returns
    /// 成功返回连接句柄，失败返回 `MarketError`。
    async fn connect(&self) -> Result<Box<dyn TickConnection>, MarketError>;
}

/// # Summary
/// 指标快照的只读视图，告警评估通过它读取最新指标。
///
/// # Invariants
/// - `snapshot` 不得触发重算，只返回最近一次计算结果。
pub trait IndicatorSource: Send + Sync {
    fn snapshot(&self) -> IndicatorSnapshot;
}
