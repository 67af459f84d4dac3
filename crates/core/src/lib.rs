//! # `momentum-core` - 领域模型与端口定义
//!
//! 本 crate 只包含实体、错误类型与 Trait 契约，不依赖任何具体基础设施。
//! 行情接入、指标计算、告警存储与通知发送均通过这里定义的端口注入。

pub mod common;
pub mod config;

pub mod alert {
    pub mod entity;
}

pub mod market {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod notify {
    pub mod error;
    pub mod port;
}

pub mod store {
    pub mod error;
    pub mod port;
}
