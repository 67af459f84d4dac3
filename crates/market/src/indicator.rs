//! # 动量指标计算
//!
//! 纯函数实现，输入为按时间升序排列的收盘价序列。
//! 数据不足时返回约定的默认值，不视为错误。

/// 数据不足时 RSI 的中性取值
pub const NEUTRAL_RSI: f64 = 50.0;

/// # Summary
/// MACD 三元组。
///
/// # Invariants
/// - `histogram == line - signal`。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Macd {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// 周期长度都很小，转换不会损失精度
fn to_f64(n: usize) -> f64 {
    u32::try_from(n).map(f64::from).unwrap_or(f64::MAX)
}

/// 算术平均，空序列返回 0
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / to_f64(values.len())
}

/// # Summary
/// 计算 Wilder 平滑 RSI。
///
/// # Logic
/// 1. 价格数少于 `period + 1` 时返回中性值 50。
/// 2. 以前 `period` 个价差的平均涨幅、平均跌幅 (取正值) 作为种子。
/// 3. 对其后每个价差执行 `avg = (avg * (period - 1) + x) / period` 平滑，
///    未发生的一侧以 0 参与递推。
/// 4. 平均跌幅为 0 时返回 100，否则返回 `100 - 100 / (1 + 平均涨幅 / 平均跌幅)`。
///
/// # Arguments
/// * `prices`: 收盘价序列。
/// * `period`: 平滑周期，通常为 14。
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return NEUTRAL_RSI;
    }
    let p = to_f64(period);

    let (gains, losses) = prices[..=period]
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold((0.0, 0.0), |(gains, losses), change| {
            if change > 0.0 {
                (gains + change, losses)
            } else {
                (gains, losses - change)
            }
        });

    let mut avg_gain = gains / p;
    let mut avg_loss = losses / p;

    for w in prices[period..].windows(2) {
        let change = w[1] - w[0];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
    }

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// # Summary
/// 逐位置计算 EMA，第 i 项只使用前 i + 1 个值。
///
/// # Logic
/// 1. 前 `period - 1` 项数据不足，记为 0。
/// 2. 第 `period - 1` 项为前 `period` 个值的简单平均。
/// 3. 其后每项按 `ema = (v - ema) * 2 / (period + 1) + ema` 递推。
///
/// 与对每个截断前缀分别调用 `ema` 的结果逐位相同。
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let multiplier = 2.0 / to_f64(period + 1);
    let mut current = average(&values[..period]);
    out[period - 1] = current;

    for (i, value) in values.iter().enumerate().skip(period) {
        current = (value - current) * multiplier + current;
        out[i] = current;
    }
    out
}

/// # Summary
/// 计算整段序列末端的 EMA。
///
/// # Returns
/// 值的个数少于 `period` 时返回 0。
pub fn ema(values: &[f64], period: usize) -> f64 {
    ema_series(values, period).last().copied().unwrap_or(0.0)
}

/// # Summary
/// 计算 MACD 主线、信号线与柱状值。
///
/// # Logic
/// 1. 价格数少于 `slow` 时三者均为 0。
/// 2. 一次遍历得到快慢 EMA 的逐位置序列。
/// 3. 从第 `slow - 1` 个位置起逐位相减得到 MACD 主线序列，无前视。
/// 4. 主线取序列末项，信号线为主线序列的 `signal` 周期 EMA。
///
/// # Arguments
/// * `prices`: 收盘价序列。
/// * `fast` / `slow` / `signal`: 通常为 12 / 26 / 9。
pub fn macd(prices: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    if slow == 0 || prices.len() < slow {
        return Macd::default();
    }

    let fast_series = ema_series(prices, fast);
    let slow_series = ema_series(prices, slow);

    let history: Vec<f64> = fast_series[slow - 1..]
        .iter()
        .zip(&slow_series[slow - 1..])
        .map(|(f, s)| f - s)
        .collect();

    let line = history.last().copied().unwrap_or(0.0);
    let signal = ema(&history, signal);

    Macd {
        line,
        signal,
        histogram: line - signal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + to_f64(i) * 1.5).collect()
    }

    fn falling(n: usize) -> Vec<f64> {
        (0..n).map(|i| 500.0 - to_f64(i) * 2.0).collect()
    }

    /// 确定性的伪随机价格序列
    fn noisy(n: usize) -> Vec<f64> {
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut price = 30_000.0;
        (0..n)
            .map(|_| {
                seed ^= seed << 13;
                seed ^= seed >> 7;
                seed ^= seed << 17;
                let step = f64::from(u32::try_from(seed % 2001).unwrap()) - 1000.0;
                price += step / 10.0;
                price
            })
            .collect()
    }

    #[test]
    fn test_rsi_monotonic_rise_is_100() {
        for n in [15, 16, 40, 100] {
            assert_eq!(rsi(&rising(n), 14), 100.0);
        }
    }

    #[test]
    fn test_rsi_monotonic_fall_is_0() {
        for n in [15, 30, 100] {
            assert_eq!(rsi(&falling(n), 14), 0.0);
        }
    }

    #[test]
    fn test_rsi_short_series_is_neutral() {
        for n in 0..15 {
            assert_eq!(rsi(&noisy(n), 14), NEUTRAL_RSI);
        }
    }

    #[test]
    fn test_rsi_is_bounded() {
        let value = rsi(&noisy(100), 14);
        assert!(value > 0.0 && value < 100.0, "rsi = {}", value);
    }

    #[test]
    fn test_rsi_seed_only_matches_hand_computation() {
        // 前 14 个价差: 7 次 +2, 7 次 -1
        let mut prices = vec![100.0];
        for i in 0..14 {
            let last = prices[i];
            prices.push(if i % 2 == 0 { last + 2.0 } else { last - 1.0 });
        }
        let avg_gain = 14.0 / 14.0;
        let avg_loss = 7.0 / 14.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        assert!((rsi(&prices, 14) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_ema_short_series_is_zero() {
        assert_eq!(ema(&[1.0, 2.0], 3), 0.0);
        assert_eq!(ema(&[], 3), 0.0);
    }

    #[test]
    fn test_ema_seed_and_recurrence() {
        let values = [2.0, 4.0, 6.0, 8.0];
        // 种子 = (2 + 4 + 6) / 3 = 4, multiplier = 0.5
        assert_eq!(ema(&values[..3], 3), 4.0);
        assert_eq!(ema(&values, 3), 6.0);
    }

    #[test]
    fn test_macd_short_series_is_zero() {
        for n in 0..26 {
            assert_eq!(macd(&noisy(n), 12, 26, 9), Macd::default());
        }
    }

    #[test]
    fn test_macd_histogram_is_line_minus_signal() {
        let result = macd(&noisy(100), 12, 26, 9);
        assert_eq!(result.histogram, result.line - result.signal);
        assert_eq!(result.line, ema(&noisy(100), 12) - ema(&noisy(100), 26));
    }

    #[test]
    fn test_macd_signal_matches_prefix_recomputation() {
        let prices = noisy(100);
        let (fast, slow, signal) = (12, 26, 9);

        // 每个位置都从头重算截断前缀的 EMA
        let history: Vec<f64> = (slow..=prices.len())
            .map(|end| ema(&prices[..end], fast) - ema(&prices[..end], slow))
            .collect();
        let expected_signal = ema(&history, signal);

        let result = macd(&prices, fast, slow, signal);
        assert_eq!(result.signal, expected_signal);
    }

    #[test]
    fn test_macd_signal_needs_enough_history() {
        // 26 个价格只产生 1 个主线值，不足 9 个，信号线为 0
        let result = macd(&rising(26), 12, 26, 9);
        assert_eq!(result.signal, 0.0);
        assert_eq!(result.histogram, result.line);
        assert!(result.line > 0.0);
    }
}
