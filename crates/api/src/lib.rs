//! # `momentum-api` - HTTP API
//!
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收告警的创建与查询请求，转交 `AlertService`
//! - 暴露当前指标快照，供调试与看板使用
//! - 将领域模型转换为 DTO 返回给调用方

pub mod error;
pub mod server;
pub mod types;

pub mod routes {
    pub mod alert;
    pub mod indicator;
}
