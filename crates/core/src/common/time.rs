use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// # Summary
/// 时钟接口，指标引擎用它确定首次重算的基准时间。
pub trait TimeProvider: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// # Summary
/// 以 Unix 秒计数的手动时钟，只在测试中推进。
///
/// # Invariants
/// - 精度为秒，与 K 线的 `close_time` 一致。
/// - 超出 `DateTime` 表示范围的秒数读出为纪元起点。
pub struct FakeClockProvider {
    secs: AtomicI64,
}

impl FakeClockProvider {
    pub fn at_unix(secs: i64) -> Self {
        Self {
            secs: AtomicI64::new(secs),
        }
    }

    /// 将时钟向后拨动 `secs` 秒 (负数为回拨)
    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl TimeProvider for FakeClockProvider {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.secs.load(Ordering::SeqCst), 0).unwrap_or_default()
    }
}
