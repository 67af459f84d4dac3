//! # 行情源适配器
//!
//! 实现 `momentum_core::market::port::TickSource`，目前仅支持 Binance 逐笔成交推送。

pub mod binance;
