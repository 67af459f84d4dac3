use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use momentum_api::server::{AppState, serve};
use momentum_core::common::{RealTimeProvider, shutdown_channel};
use momentum_core::config::{AppConfig, LogConfig};
use momentum_core::notify::port::AlertNotifier;
use momentum_core::store::port::AlertStore;
use momentum_feed::binance::BinanceTradeSource;
use momentum_manager::monitor::AlertMonitor;
use momentum_manager::queue::{self, run_notification_logger};
use momentum_manager::service::AlertService;
use momentum_market::engine::IndicatorEngine;
use momentum_market::ingest::TickIngestor;
use momentum_notify::email::EmailNotifier;
use momentum_notify::log::LogNotifier;
use momentum_store::alert::SqliteAlertStore;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// 配置文件路径的环境变量名
const CONFIG_PATH_ENV: &str = "MOMENTUM_CONFIG";

/// 停止后等待通知队列排空的上限
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// # Summary
/// 分层加载应用配置。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 为底。
/// 2. 叠加可选的 TOML 文件 (默认 `config.toml`，可由 `MOMENTUM_CONFIG` 指定)。
/// 3. 叠加 `MOMENTUM__` 前缀的环境变量，层级以 `__` 分隔，如 `MOMENTUM__SMTP__HOST`。
fn load_config(path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let path = path.unwrap_or_else(|| PathBuf::from("config.toml"));

    config::Config::builder()
        .add_source(config::Config::try_from(&AppConfig::default())?)
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("MOMENTUM")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

/// # Summary
/// 初始化全局日志。
///
/// # Logic
/// 1. 过滤级别优先取 `RUST_LOG`，否则取配置的 `log.level`。
/// 2. 始终输出到终端；配置了 `log.dir` 时额外写入按天滚动的日志文件。
///
/// # Returns
/// 文件写入线程的守卫，必须持有到进程结束。
fn init_tracing(log: &LogConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let (file_layer, guard) = match &log.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "momentum.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 `Arc<dyn Trait>` 注入到各服务。
///
/// # Logic
/// 1. 加载 `.env`、配置与全局日志。
/// 2. 实例化基础设施层 (Store、Feed、Notifier)。
/// 3. 实例化指标引擎与告警评估循环。
/// 4. 启动行情接入、评估循环、通知消费者与 HTTP 服务。
/// 5. 等待 Ctrl-C，广播停止信号并等待各任务退出。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 配置与日志
    let env_file = dotenvy::dotenv();
    let config = load_config(std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))?;
    let _guard = init_tracing(&config.log);
    match env_file {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) => debug!(error = %e, "No .env loaded"),
    }
    info!("Momentum alert service starting...");

    // websocket 与 SMTP 共用 ring 作为 TLS 加密后端
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("TLS crypto provider already installed");
    }

    // 2. 基础设施层
    momentum_store::config::set_root_dir(PathBuf::from(&config.database.data_dir));
    let store: Arc<dyn AlertStore> = Arc::new(SqliteAlertStore::new().await?);

    let notifier: Arc<dyn AlertNotifier> = match &config.smtp {
        Some(smtp) => {
            info!(host = %smtp.host, port = smtp.port, "Email notifications enabled");
            Arc::new(EmailNotifier::new(smtp)?)
        }
        None => {
            warn!("SMTP not configured, notifications will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let source = Arc::new(BinanceTradeSource::new(config.feed.trade_stream_url()));
    info!(url = %source.url(), "Trade stream configured");

    // 3. 领域实现层
    let engine = Arc::new(IndicatorEngine::new(
        config.indicator.clone(),
        &RealTimeProvider,
    ));
    let (notification_queue, notification_rx) =
        queue::channel(config.alert.queue_capacity, config.alert.queue_policy);
    let monitor = AlertMonitor::new(
        store.clone(),
        engine.clone(),
        notifier,
        notification_queue,
        &config.alert,
    );

    // 4. 启动后台任务
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;
    let state = AppState {
        alert_service: Arc::new(AlertService::new(store)),
        indicators: engine.clone(),
    };

    let (trigger, shutdown) = shutdown_channel();
    let ingestor = TickIngestor::new(
        source,
        engine,
        Duration::from_secs(config.feed.reconnect_delay_secs),
    );
    let ingest_task = tokio::spawn(ingestor.run(shutdown.clone()));
    let monitor_task = tokio::spawn(monitor.run(shutdown.clone()));
    let logger_task = tokio::spawn(run_notification_logger(notification_rx));
    let server_task = tokio::spawn(serve(listener, state, shutdown));

    // 5. 等待外部退出信号
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting...");
    trigger.trigger();

    ingest_task.await?;
    monitor_task.await?;
    server_task.await??;

    // 评估任务全部结束后队列关闭，消费者随之退出
    if tokio::time::timeout(DRAIN_TIMEOUT, logger_task).await.is_err() {
        warn!("Notification queue not drained before timeout");
    }

    info!("Momentum alert service stopped");
    Ok(())
}
