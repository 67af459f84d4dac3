//! # 告警存储适配器
//!
//! `SqliteAlertStore` 为生产实现，`MemoryAlertStore` 供测试与无盘运行使用。

pub mod alert;
pub mod config;
pub mod memory;
