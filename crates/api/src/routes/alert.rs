//! # 告警路由控制器
//!
//! 实现 `/api/v1/alerts` 路径下的 REST 接口。

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{AlertResponse, ApiErrorResponse, ApiResponse, CreateAlertRequest};

/// 创建告警
///
/// 新告警状态为 `pending`，由评估循环在下一个周期激活。
/// 无法识别的方向或指标会被原样保存，但该告警永不触发。
#[utoipa::path(
    post,
    path = "/api/v1/alerts",
    tag = "告警 (Alert)",
    request_body = CreateAlertRequest,
    responses(
        (status = 201, description = "告警创建成功", body = ApiResponse<AlertResponse>),
        (status = 400, description = "请求体无法解析", body = ApiErrorResponse),
        (status = 500, description = "存储失败")
    )
)]
pub async fn create_alert(
    State(state): State<AppState>,
    payload: Result<Json<CreateAlertRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AlertResponse>>), ApiError> {
    let Json(req) = payload?;
    let alert = state.alert_service.create_alert(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(AlertResponse::from(&alert))),
    ))
}

/// 获取指定告警
#[utoipa::path(
    get,
    path = "/api/v1/alerts/{id}",
    tag = "告警 (Alert)",
    params(
        ("id" = i64, Path, description = "告警 ID")
    ),
    responses(
        (status = 200, description = "告警详情获取成功", body = ApiResponse<AlertResponse>),
        (status = 400, description = "ID 不是整数"),
        (status = 404, description = "告警不存在")
    )
)]
pub async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AlertResponse>>, ApiError> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid alert id: {}", id)))?;
    let alert = state.alert_service.get_alert(id).await?;
    Ok(Json(ApiResponse::ok(AlertResponse::from(&alert))))
}
