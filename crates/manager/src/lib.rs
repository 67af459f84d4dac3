//! # 告警应用服务层
//!
//! - `service`: 告警的创建与查询门面，供 HTTP 层调用。
//! - `monitor`: 周期评估循环，负责状态流转与触发通知。
//! - `queue`: 有界通知队列及其日志消费者。

pub mod monitor;
pub mod queue;
pub mod service;
