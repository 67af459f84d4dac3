use serde::{Deserialize, Serialize};

/// 一个 K 线桶覆盖的秒数
pub const BUCKET_SECS: i64 = 60;

/// # Summary
/// 单笔成交事件，由行情适配器产出、被聚合器立即消费，不落库。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    // 交易对代码 (例如: BTCUSDT)
    pub symbol: String,
    // 成交价
    pub price: f64,
    // 成交时间 (Unix 毫秒)
    pub timestamp_millis: i64,
}

impl Tick {
    /// 成交时间折算为 Unix 秒
    pub fn timestamp_secs(&self) -> i64 {
        self.timestamp_millis.div_euclid(1000)
    }
}

/// # Summary
/// 一分钟粒度的 OHLC K 线。
///
/// # Invariants
/// - 所属分钟桶由 `close_time / 60` 唯一确定，滚动窗口内不存在同桶的两根 K 线。
/// - 由逐笔成交生成时 `volume` 恒为 0 (成交流不携带可聚合的成交量)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    // 开盘时间 (Unix 秒)
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    // 收盘时间 (Unix 秒)
    pub close_time: i64,
}

impl Bar {
    /// # Summary
    /// 用单笔成交构造 K 线。
    ///
    /// # Logic
    /// 1. 开高低收均取成交价，单笔 K 线振幅为零。
    /// 2. 开盘与收盘时间均取成交秒级时间戳。
    /// 3. 成交量置 0。
    pub fn from_tick(tick: &Tick) -> Self {
        let ts = tick.timestamp_secs();
        Self {
            open_time: ts,
            open: tick.price,
            high: tick.price,
            low: tick.price,
            close: tick.price,
            volume: 0.0,
            close_time: ts,
        }
    }

    /// K 线所属分钟桶编号
    pub fn bucket(&self) -> i64 {
        self.close_time.div_euclid(BUCKET_SECS)
    }
}

/// # Summary
/// 最新一次计算得到的指标快照，供告警评估读取。
///
/// # Invariants
/// - 首次计算前 `rsi` 为中性值 50，`macd` 相关字段为 0，`computed_at` 为 None。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    // MACD 主线 (快线 EMA - 慢线 EMA)，告警只消费该值
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
    // 最近一次计算对应的 K 线时间 (Unix 秒)
    pub computed_at: Option<i64>,
}

impl IndicatorSnapshot {
    /// 构造只含 RSI 与 MACD 主线的快照，其余字段为默认值
    pub fn new(rsi: f64, macd: f64) -> Self {
        Self {
            rsi,
            macd,
            ..Self::default()
        }
    }
}

impl Default for IndicatorSnapshot {
    fn default() -> Self {
        Self {
            rsi: 50.0,
            macd: 0.0,
            macd_signal: 0.0,
            macd_histogram: 0.0,
            computed_at: None,
        }
    }
}
