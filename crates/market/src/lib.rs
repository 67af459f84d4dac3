//! # `momentum-market` - 行情聚合与指标引擎
//!
//! - `buffer`: 固定容量滚动缓冲区
//! - `aggregator`: 逐笔成交到分钟 K 线的折叠规则
//! - `indicator`: RSI / EMA / MACD 纯函数
//! - `engine`: 持有窗口与快照的指标引擎
//! - `ingest`: 带重连的行情接入循环

pub mod aggregator;
pub mod buffer;
pub mod engine;
pub mod indicator;
pub mod ingest;
