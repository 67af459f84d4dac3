//! # DTO (Data Transfer Object) 层
//!
//! 将内部领域模型转化为面向调用方 JSON 输出的轻量结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use momentum_core::alert::entity::{Alert, AlertRequest};
use momentum_core::market::entity::IndicatorSnapshot;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================
//  告警相关 DTO
// ============================================================

/// 创建告警请求体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAlertRequest {
    /// 用户 ID
    #[schema(example = 1)]
    pub user_id: i64,
    /// 触发后通知的邮箱
    #[schema(example = "trader@example.com")]
    pub email: String,
    /// 触发阈值
    #[schema(example = 65.0)]
    pub value: f64,
    /// 方向 (UP / DOWN，大小写不敏感)
    #[schema(example = "UP")]
    pub direction: String,
    /// 指标 (RSI / MACD，大小写不敏感)
    #[schema(example = "RSI")]
    pub indicator: String,
}

/// 告警详情 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlertResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 1)]
    pub user_id: i64,
    #[schema(example = "trader@example.com")]
    pub email: String,
    #[schema(example = 65.0)]
    pub value: f64,
    #[schema(example = "UP")]
    pub direction: String,
    #[schema(example = "RSI")]
    pub indicator: String,
    /// 状态 (pending / active / triggered / completed)
    #[schema(example = "pending")]
    pub status: String,
    /// 创建时间 (RFC 3339)
    #[schema(example = "2024-01-01T00:00:00Z")]
    pub created_at: String,
    /// 最近一次状态变更时间 (RFC 3339)
    #[schema(example = "2024-01-01T00:00:00Z")]
    pub updated_at: String,
}

// ============================================================
//  指标相关 DTO
// ============================================================

/// 指标快照 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IndicatorResponse {
    #[schema(example = 55.3)]
    pub rsi: f64,
    #[schema(example = 12.7)]
    pub macd: f64,
    #[schema(example = 10.1)]
    pub macd_signal: f64,
    #[schema(example = 2.6)]
    pub macd_histogram: f64,
    /// 最近一次重算对应的 K 线时间 (Unix 秒)，尚未重算时为 null
    #[schema(example = 1700000040_i64)]
    pub computed_at: Option<i64>,
}

// ============================================================
//  通用响应 DTO
// ============================================================

/// 统一 API 响应包装器
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T: Serialize + ToSchema> {
    /// 是否成功
    pub success: bool,
    /// 数据载荷 (成功时)
    pub data: Option<T>,
    /// 错误信息 (失败时)
    pub error: Option<String>,
}

impl<T: Serialize + ToSchema> ApiResponse<T> {
    /// 构建成功响应
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// 构建失败响应 (不含泛型载荷)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 false
    pub success: bool,
    /// 错误描述信息
    pub error: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}

// ============================================================
//  领域模型 <-> DTO 惯用转换 (impl From<T>)
// ============================================================

impl From<CreateAlertRequest> for AlertRequest {
    fn from(r: CreateAlertRequest) -> Self {
        Self {
            user_id: r.user_id,
            email: r.email,
            value: r.value,
            direction: r.direction.into(),
            indicator: r.indicator.into(),
        }
    }
}

impl From<&Alert> for AlertResponse {
    fn from(a: &Alert) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            email: a.email.clone(),
            value: a.value,
            direction: a.direction.to_string(),
            indicator: a.indicator.to_string(),
            status: a.status.to_string(),
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.to_rfc3339(),
        }
    }
}

impl From<IndicatorSnapshot> for IndicatorResponse {
    fn from(s: IndicatorSnapshot) -> Self {
        Self {
            rsi: s.rsi,
            macd: s.macd,
            macd_signal: s.macd_signal,
            macd_histogram: s.macd_histogram,
            computed_at: s.computed_at,
        }
    }
}
