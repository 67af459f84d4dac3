use momentum_core::market::entity::{Bar, Tick};

/// # Summary
/// 将一根 K 线折叠进滚动窗口尾部的结果。
#[derive(Debug, Clone, PartialEq)]
pub enum BarUpdate {
    // 与尾部 K 线同一分钟桶，原地替换尾部
    Replace(Bar),
    // 进入新的分钟桶，追加到窗口末尾
    Append(Bar),
}

impl BarUpdate {
    pub fn bar(&self) -> &Bar {
        match self {
            BarUpdate::Replace(bar) | BarUpdate::Append(bar) => bar,
        }
    }
}

/// # Summary
/// 按分钟桶规则折叠一根 K 线。
///
/// # Logic
/// 1. 尾部存在且 `tail.close_time / 60 == bar.close_time / 60` 时替换尾部。
/// 2. 否则追加为新 K 线。
///
/// # Arguments
/// * `tail`: 窗口当前的最后一根 K 线。
/// * `bar`: 新到达的 K 线。
pub fn merge(tail: Option<&Bar>, bar: Bar) -> BarUpdate {
    match tail {
        Some(last) if last.bucket() == bar.bucket() => BarUpdate::Replace(bar),
        _ => BarUpdate::Append(bar),
    }
}

/// # Summary
/// 将单笔成交折叠为 K 线更新。
///
/// # Logic
/// 1. 用成交价构造开高低收相同、成交量为 0 的 K 线。
/// 2. 交给 `merge` 判定替换还是追加。
///
/// 同桶内后到的成交整体覆盖尾部 K 线，桶内不累计高低价。
pub fn aggregate(tail: Option<&Bar>, tick: &Tick) -> BarUpdate {
    merge(tail, Bar::from_tick(tick))
}
