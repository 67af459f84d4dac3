use axum::Json;
use axum::extract::State;

use crate::server::AppState;
use crate::types::{ApiResponse, IndicatorResponse};

/// 获取当前指标快照
///
/// 数据不足时返回默认值 (RSI 50，MACD 0)。
#[utoipa::path(
    get,
    path = "/api/v1/indicators",
    tag = "指标 (Indicator)",
    responses(
        (status = 200, description = "快照获取成功", body = ApiResponse<IndicatorResponse>)
    )
)]
pub async fn get_indicators(State(state): State<AppState>) -> Json<ApiResponse<IndicatorResponse>> {
    Json(ApiResponse::ok(state.indicators.snapshot().into()))
}
