//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 持有并调用。

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use momentum_core::common::Shutdown;
use momentum_core::market::port::IndicatorSource;
use momentum_manager::service::AlertService;

use crate::routes::{alert, indicator};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - 所有字段在服务启动前注入，生命周期与进程等同。
#[derive(Clone)]
pub struct AppState {
    /// 告警服务 (Facade)
    pub alert_service: Arc<AlertService>,
    /// 指标快照来源
    pub indicators: Arc<dyn IndicatorSource>,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Momentum 告警服务 API",
        version = "0.1.0",
        description = "基于 RSI / MACD 的阈值告警服务。提供告警创建、查询与当前指标快照。",
        license(name = "MIT")
    ),
    tags(
        (name = "告警 (Alert)", description = "告警的创建与查询"),
        (name = "指标 (Indicator)", description = "当前指标快照")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// 构建完整的 axum 应用路由树 (含 Swagger UI 与 CORS)。
pub fn build_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(alert::create_alert))
        .routes(routes!(alert::get_alert))
        .routes(routes!(indicator::get_indicators))
        .with_state(state)
        .split_for_parts();

    // 调用方不固定，允许所有来源
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors)
}

/// 在已绑定的监听器上提供服务，收到停止信号后优雅退出。
///
/// # Arguments
/// * `listener` - 已绑定的 TCP 监听器，测试中可绑定 `127.0.0.1:0`
/// * `state` - 共享状态
/// * `shutdown` - 停止信号
///
/// # Returns
/// 服务异常退出时返回 IO 错误。
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    mut shutdown: Shutdown,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("Momentum API Server listening on {}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await
}
