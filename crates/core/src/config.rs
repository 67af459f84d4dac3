use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub feed: FeedConfig,
    pub indicator: IndicatorConfig,
    pub alert: AlertConfig,
    // 未配置时退化为日志通知
    pub smtp: Option<SmtpConfig>,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub data_dir: String,
}

/// # Summary
/// 行情流接入配置。
///
/// # Invariants
/// - `symbol` 为交易对代码，拼接 URL 时统一转为小写。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    // WebSocket 基础地址，例如 wss://stream.binance.com:443
    pub base_url: String,
    // 交易对，例如 BTCUSDT
    pub symbol: String,
    // 断线重连等待秒数
    pub reconnect_delay_secs: u64,
}

/// # Summary
/// 指标引擎参数。
///
/// # Invariants
/// - `macd_slow` 同时决定触发重算所需的最少 K 线根数。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorConfig {
    // 滚动窗口容量
    pub window_capacity: usize,
    // 两次重算之间至少间隔的 K 线时间 (秒)
    pub calc_interval_secs: i64,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

/// 通知队列满载时的处理策略
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QueuePolicy {
    // 生产者等待空位 (背压，不丢失)
    Block,
    // 丢弃并记录告警日志
    Drop,
}

/// # Summary
/// 告警评估调度配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    // 评估周期 (毫秒)
    pub check_interval_ms: u64,
    // 同时运行的单告警评估任务上限
    pub max_concurrency: usize,
    // 通知队列容量
    pub queue_capacity: usize,
    pub queue_policy: QueuePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    // 日志文件目录，为空时只输出到终端
    pub dir: Option<String>,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3030,
            },
            database: DatabaseConfig {
                data_dir: "data".to_string(),
            },
            feed: FeedConfig {
                base_url: "wss://stream.binance.com:443".to_string(),
                symbol: "BTCUSDT".to_string(),
                reconnect_delay_secs: 5,
            },
            indicator: IndicatorConfig {
                window_capacity: 100,
                calc_interval_secs: 60,
                rsi_period: 14,
                macd_fast: 12,
                macd_slow: 26,
                macd_signal: 9,
            },
            alert: AlertConfig {
                check_interval_ms: 1000,
                max_concurrency: 64,
                queue_capacity: 100,
                queue_policy: QueuePolicy::Block,
            },
            smtp: None,
            log: LogConfig {
                dir: None,
                level: "info".to_string(),
            },
        }
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        AppConfig::default().indicator
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        AppConfig::default().alert
    }
}

impl FeedConfig {
    /// 拼接单交易对逐笔成交流地址: `{base_url}/ws/{symbol}@trade`
    pub fn trade_stream_url(&self) -> String {
        format!(
            "{}/ws/{}@trade",
            self.base_url.trim_end_matches('/'),
            self.symbol.to_lowercase()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3030);
        assert_eq!(config.database.data_dir, "data");
        assert_eq!(config.feed.reconnect_delay_secs, 5);
        assert_eq!(config.indicator.window_capacity, 100);
        assert_eq!(config.indicator.calc_interval_secs, 60);
        assert_eq!(config.alert.check_interval_ms, 1000);
        assert_eq!(config.alert.queue_capacity, 100);
        assert_eq!(config.alert.queue_policy, QueuePolicy::Block);
        assert!(config.smtp.is_none());
    }

    #[test]
    fn test_trade_stream_url() {
        let feed = FeedConfig {
            base_url: "wss://stream.binance.com:443/".to_string(),
            symbol: "ETHUSDT".to_string(),
            reconnect_delay_secs: 5,
        };
        assert_eq!(
            feed.trade_stream_url(),
            "wss://stream.binance.com:443/ws/ethusdt@trade"
        );
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let json = r#"{ "alert": { "check_interval_ms": 500, "max_concurrency": 8,
                        "queue_capacity": 10, "queue_policy": "drop" } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.alert.queue_policy, QueuePolicy::Drop);
        assert_eq!(config.alert.max_concurrency, 8);
        assert_eq!(config.feed.symbol, "BTCUSDT");
    }
}
