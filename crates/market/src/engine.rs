use crate::aggregator::{self, BarUpdate};
use crate::buffer::RollingBuffer;
use crate::indicator;
use momentum_core::common::TimeProvider;
use momentum_core::config::IndicatorConfig;
use momentum_core::market::entity::{Bar, IndicatorSnapshot, Tick};
use momentum_core::market::port::IndicatorSource;
use std::sync::RwLock;
use tracing::debug;

/// 读写锁保护的引擎内部状态
struct EngineState {
    // 按 close_time 升序的滚动窗口
    window: RollingBuffer<Bar>,
    snapshot: IndicatorSnapshot,
    // 上一次重算检查对应的 K 线时间 (Unix 秒)
    last_computed_at: i64,
}

/// # Summary
/// 指标引擎，独占滚动窗口与指标快照。
///
/// # Invariants
/// - 窗口与快照由同一把读写锁保护：`update_bars` 独占写，`snapshot` 可并发读。
/// - 只有 `update_bars` 会触发重算，读操作永不重算。
/// - 锁内不存在 `.await`。
pub struct IndicatorEngine {
    state: RwLock<EngineState>,
    params: IndicatorConfig,
}

impl IndicatorEngine {
    /// # Summary
    /// 创建指标引擎。
    ///
    /// # Logic
    /// 1. 按配置容量分配滚动窗口。
    /// 2. 以时钟当前时间作为首个重算基准，因此首次重算至少在一个计算间隔之后。
    ///
    /// # Arguments
    /// * `params`: 窗口容量、计算间隔与指标周期。
    /// * `clock`: 时间供给器。
    pub fn new(params: IndicatorConfig, clock: &dyn TimeProvider) -> Self {
        Self {
            state: RwLock::new(EngineState {
                window: RollingBuffer::new(params.window_capacity),
                snapshot: IndicatorSnapshot::default(),
                last_computed_at: clock.now().timestamp(),
            }),
            params,
        }
    }

    /// # Summary
    /// 将一根 K 线写入窗口，必要时重算指标。
    ///
    /// # Logic
    /// 1. 与尾部同一分钟桶则原地替换，否则追加 (满载时淘汰最旧一根)。
    /// 2. 若 `bar.close_time - last_computed_at >= calc_interval_secs`：
    ///    窗口不少于 `macd_slow` 根时用全部收盘价重算 RSI 与 MACD；
    ///    无论是否重算都把 `last_computed_at` 推进到 `bar.close_time`。
    ///
    /// # Returns
    /// 本次是否刷新了快照。
    pub fn update_bars(&self, bar: Bar) -> bool {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());

        let close_time = bar.close_time;
        match aggregator::merge(state.window.last(), bar) {
            BarUpdate::Replace(bar) => {
                state.window.replace_last(bar);
            }
            BarUpdate::Append(bar) => {
                state.window.push(bar);
            }
        }

        if close_time - state.last_computed_at < self.params.calc_interval_secs {
            return false;
        }
        state.last_computed_at = close_time;

        if state.window.len() < self.params.macd_slow {
            debug!(
                bars = state.window.len(),
                "Not enough bars for indicators, keeping previous snapshot"
            );
            return false;
        }

        let closes: Vec<f64> = state.window.iter().map(|b| b.close).collect();
        let rsi = indicator::rsi(&closes, self.params.rsi_period);
        let macd = indicator::macd(
            &closes,
            self.params.macd_fast,
            self.params.macd_slow,
            self.params.macd_signal,
        );

        state.snapshot = IndicatorSnapshot {
            rsi,
            macd: macd.line,
            macd_signal: macd.signal,
            macd_histogram: macd.histogram,
            computed_at: Some(close_time),
        };
        debug!(rsi, macd = macd.line, at = close_time, "Indicators recomputed");
        true
    }

    /// 将单笔成交折算为 K 线后写入窗口
    pub fn ingest_tick(&self, tick: &Tick) -> bool {
        self.update_bars(Bar::from_tick(tick))
    }

    /// 读取最新指标快照
    pub fn snapshot(&self) -> IndicatorSnapshot {
        self.state.read().unwrap_or_else(|e| e.into_inner()).snapshot
    }

    /// 按时间升序复制当前窗口
    pub fn bars(&self) -> Vec<Bar> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .window
            .to_vec()
    }

    pub fn len(&self) -> usize {
        self.state.read().unwrap_or_else(|e| e.into_inner()).window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IndicatorSource for IndicatorEngine {
    fn snapshot(&self) -> IndicatorSnapshot {
        IndicatorEngine::snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use momentum_core::common::FakeClockProvider;

    const T0: i64 = 1_700_000_040; // 分钟边界

    fn engine() -> IndicatorEngine {
        IndicatorEngine::new(IndicatorConfig::default(), &FakeClockProvider::at_unix(T0))
    }

    fn tick(price: f64, secs: i64) -> Tick {
        Tick {
            symbol: "BTCUSDT".to_string(),
            price,
            timestamp_millis: secs * 1000,
        }
    }

    #[test]
    fn test_same_bucket_ticks_collapse_into_one_bar() {
        let engine = engine();
        engine.ingest_tick(&tick(100.0, T0 + 1));
        engine.ingest_tick(&tick(105.0, T0 + 30));

        let bars = engine.bars();
        assert_eq!(bars.len(), 1);
        let bar = &bars[0];
        assert_eq!(
            (bar.open, bar.high, bar.low, bar.close),
            (105.0, 105.0, 105.0, 105.0)
        );

        engine.ingest_tick(&tick(106.0, T0 + 60));
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_window_caps_at_capacity_and_evicts_oldest() {
        let engine = engine();
        for i in 0..100 {
            engine.ingest_tick(&tick(100.0 + f64::from(i), T0 + i64::from(i) * 60));
        }
        assert_eq!(engine.len(), 100);

        engine.ingest_tick(&tick(999.0, T0 + 100 * 60));
        let bars = engine.bars();
        assert_eq!(bars.len(), 100);
        assert_eq!(bars[0].close, 101.0);
        assert_eq!(bars[99].close, 999.0);
        assert!(bars.windows(2).all(|w| w[0].close_time < w[1].close_time));
    }

    #[test]
    fn test_snapshot_stays_default_until_enough_bars() {
        let engine = engine();
        for i in 0..25 {
            let recomputed = engine.ingest_tick(&tick(100.0 + f64::from(i), T0 + i64::from(i) * 60));
            assert!(!recomputed);
        }
        assert_eq!(engine.snapshot(), IndicatorSnapshot::default());
    }

    #[test]
    fn test_recompute_on_rising_prices() {
        let engine = engine();
        let mut recomputed = false;
        for i in 0..30 {
            recomputed = engine.ingest_tick(&tick(100.0 + f64::from(i), T0 + i64::from(i) * 60));
        }
        assert!(recomputed);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.rsi, 100.0);
        assert!(snapshot.macd > 0.0);
        assert_eq!(snapshot.computed_at, Some(T0 + 29 * 60));
    }

    #[test]
    fn test_recompute_waits_for_interval_of_bar_time() {
        let engine = engine();
        for i in 0..26 {
            engine.ingest_tick(&tick(100.0 + f64::from(i), T0 + i64::from(i) * 60));
        }
        let computed_at = engine.snapshot().computed_at;
        assert_eq!(computed_at, Some(T0 + 25 * 60));

        // 同一分钟内再来一笔，不足 60 秒，不重算
        assert!(!engine.ingest_tick(&tick(50.0, T0 + 25 * 60 + 30)));
        assert_eq!(engine.snapshot().computed_at, computed_at);
        assert_eq!(engine.bars().last().map(|b| b.close), Some(50.0));
    }

    #[test]
    fn test_first_recompute_baseline_follows_clock() {
        let clock = FakeClockProvider::at_unix(T0);
        clock.advance(30 * 60);
        let engine = IndicatorEngine::new(IndicatorConfig::default(), &clock);

        // K 线时间全部早于基准 + 60 秒，窗口填满 26 根也不重算
        for i in 0..30 {
            assert!(!engine.ingest_tick(&tick(100.0 + f64::from(i), T0 + i64::from(i) * 60)));
        }
        assert_eq!(engine.snapshot(), IndicatorSnapshot::default());

        assert!(engine.ingest_tick(&tick(200.0, T0 + 31 * 60)));
        assert_eq!(engine.snapshot().computed_at, Some(T0 + 31 * 60));
    }
}
