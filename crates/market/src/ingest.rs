use crate::engine::IndicatorEngine;
use momentum_core::common::Shutdown;
use momentum_core::market::port::{TickConnection, TickSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 单条连接的读取结果
enum PumpExit {
    // 收到停止信号
    Stopped,
    // 连接不可用，需要重连
    Disconnected,
}

/// # Summary
/// 行情接入循环：维持到行情源的连接，把逐笔成交喂给指标引擎。
///
/// # Invariants
/// - 建连或读取失败都不是致命错误，等待 `retry_delay` 后重连。
/// - 单条消息解析失败只跳过该消息，不断开连接。
/// - 收到停止信号后关闭当前连接并退出读取与重连两层循环。
pub struct TickIngestor {
    source: Arc<dyn TickSource>,
    engine: Arc<IndicatorEngine>,
    retry_delay: Duration,
}

impl TickIngestor {
    pub fn new(
        source: Arc<dyn TickSource>,
        engine: Arc<IndicatorEngine>,
        retry_delay: Duration,
    ) -> Self {
        Self {
            source,
            engine,
            retry_delay,
        }
    }

    /// # Summary
    /// 启动接入循环，直到收到停止信号。
    ///
    /// # Logic
    /// 1. 每轮开始前检查停止信号。
    /// 2. 建连失败则等待重试间隔 (可被停止信号打断) 后重试。
    /// 3. 建连成功后持续读取，直到连接失效或收到停止信号。
    /// 4. 关闭连接；若为停止则退出，否则等待重试间隔后重连。
    pub async fn run(self, mut shutdown: Shutdown) {
        info!(retry_delay = ?self.retry_delay, "Tick ingestion started");

        loop {
            if shutdown.is_triggered() {
                break;
            }

            let connected = tokio::select! {
                biased;
                _ = shutdown.wait() => break,
                connected = self.source.connect() => connected,
            };

            let mut conn = match connected {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "Tick source connection error");
                    if self.pause(&mut shutdown).await {
                        break;
                    }
                    continue;
                }
            };
            info!("Tick source connected");

            let exit = self.pump(conn.as_mut(), &mut shutdown).await;
            conn.close().await;

            match exit {
                PumpExit::Stopped => break,
                PumpExit::Disconnected => {
                    warn!("Tick stream closed. Reconnecting...");
                    if self.pause(&mut shutdown).await {
                        break;
                    }
                }
            }
        }

        info!("Tick ingestion stopped");
    }

    /// 从单条连接持续读取成交并写入引擎
    async fn pump(&self, conn: &mut dyn TickConnection, shutdown: &mut Shutdown) -> PumpExit {
        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown.wait() => return PumpExit::Stopped,
                next = conn.next_tick() => next,
            };

            match next {
                Ok(tick) => {
                    debug!(price = tick.price, ts = tick.timestamp_millis, "Tick received");
                    self.engine.ingest_tick(&tick);
                }
                Err(e) if e.requires_reconnect() => {
                    warn!(error = %e, "Error reading tick");
                    return PumpExit::Disconnected;
                }
                Err(e) => {
                    warn!(error = %e, "Skipping malformed tick message");
                }
            }
        }
    }

    /// 等待重试间隔，期间收到停止信号返回 true
    async fn pause(&self, shutdown: &mut Shutdown) -> bool {
        tokio::select! {
            _ = shutdown.wait() => true,
            _ = tokio::time::sleep(self.retry_delay) => false,
        }
    }
}
