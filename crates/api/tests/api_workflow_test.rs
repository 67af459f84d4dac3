use momentum_api::server::{AppState, serve};
use momentum_api::types::{AlertResponse, ApiErrorResponse, ApiResponse, IndicatorResponse};
use momentum_core::common::shutdown_channel;
use momentum_core::market::entity::IndicatorSnapshot;
use momentum_core::market::port::IndicatorSource;
use momentum_manager::service::AlertService;
use momentum_store::alert::SqliteAlertStore;
use reqwest::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

struct FixedIndicators(IndicatorSnapshot);

impl IndicatorSource for FixedIndicators {
    fn snapshot(&self) -> IndicatorSnapshot {
        self.0
    }
}

/// # Summary
/// 集成测试：告警的创建、查询、错误路径与指标快照接口。
#[tokio::test]
async fn test_full_api_workflow() -> anyhow::Result<()> {
    if let Err(e) = tracing_subscriber::fmt().with_env_filter("debug").try_init() {
        eprintln!("Tracing already initialised: {}", e);
    }

    let tmp_dir = tempfile::tempdir()?;
    let store = Arc::new(SqliteAlertStore::open(&tmp_dir.path().join("alerts.db")).await?);
    let state = AppState {
        alert_service: Arc::new(AlertService::new(store)),
        indicators: Arc::new(FixedIndicators(IndicatorSnapshot {
            computed_at: Some(1_700_000_040),
            ..IndicatorSnapshot::new(61.5, 3.25)
        })),
    };

    // 在随机端口启动测试服务器
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    let (trigger, shutdown) = shutdown_channel();
    let server = tokio::spawn(serve(listener, state, shutdown));

    let client = reqwest::Client::new();

    // ============================================
    // Case 1: 创建告警
    // ============================================
    let res = client
        .post(format!("{}/api/v1/alerts", base_url))
        .json(&json!({
            "user_id": 7,
            "email": "trader@example.com",
            "value": 65.0,
            "direction": "up",
            "indicator": "rsi"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: ApiResponse<AlertResponse> = res.json().await?;
    assert!(body.success);
    let created = body.data.ok_or_else(|| anyhow::anyhow!("missing data"))?;
    assert_eq!(created.status, "pending");
    assert_eq!(created.direction, "UP");
    assert_eq!(created.indicator, "RSI");

    // ============================================
    // Case 2: 按 id 查询
    // ============================================
    let res = client
        .get(format!("{}/api/v1/alerts/{}", base_url, created.id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: ApiResponse<AlertResponse> = res.json().await?;
    let fetched = body.data.ok_or_else(|| anyhow::anyhow!("missing data"))?;
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.email, "trader@example.com");
    assert_eq!(fetched.value, 65.0);

    // ============================================
    // Case 3: 不存在的 id 返回 404
    // ============================================
    let res = client
        .get(format!("{}/api/v1/alerts/999999", base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: ApiErrorResponse = res.json().await?;
    assert!(!body.success);

    // ============================================
    // Case 4: 非数字 id 返回 400
    // ============================================
    let res = client
        .get(format!("{}/api/v1/alerts/abc", base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: ApiErrorResponse = res.json().await?;
    assert!(body.error.contains("abc"));

    // ============================================
    // Case 5: 请求体类型错误或不是 JSON 返回 400 错误信封
    // ============================================
    let res = client
        .post(format!("{}/api/v1/alerts", base_url))
        .json(&json!({ "user_id": "x" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: ApiErrorResponse = res.json().await?;
    assert!(!body.success);
    assert!(body.error.contains("invalid alert data"));

    let res = client
        .post(format!("{}/api/v1/alerts", base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: ApiErrorResponse = res.json().await?;
    assert!(!body.success);

    // ============================================
    // Case 6: 无法识别的指标原样保存
    // ============================================
    let res = client
        .post(format!("{}/api/v1/alerts", base_url))
        .json(&json!({
            "user_id": 7,
            "email": "trader@example.com",
            "value": 10.0,
            "direction": "DOWN",
            "indicator": "stoch"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: ApiResponse<AlertResponse> = res.json().await?;
    assert_eq!(body.data.map(|a| a.indicator), Some("stoch".to_string()));

    // ============================================
    // Case 7: 指标快照
    // ============================================
    let res = client
        .get(format!("{}/api/v1/indicators", base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: ApiResponse<IndicatorResponse> = res.json().await?;
    let snapshot = body.data.ok_or_else(|| anyhow::anyhow!("missing data"))?;
    assert_eq!(snapshot.rsi, 61.5);
    assert_eq!(snapshot.macd, 3.25);
    assert_eq!(snapshot.computed_at, Some(1_700_000_040));

    // ============================================
    // Case 8: OpenAPI 文档
    // ============================================
    let res = client
        .get(format!("{}/api-docs/openapi.json", base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let doc: serde_json::Value = res.json().await?;
    assert!(doc["paths"]["/api/v1/alerts/{id}"].is_object());

    drop(client);
    trigger.trigger();
    server.await??;
    Ok(())
}
