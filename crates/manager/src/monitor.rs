use crate::queue::NotificationQueue;
use momentum_core::alert::entity::{Alert, AlertStatus, Direction, IndicatorKind};
use momentum_core::common::Shutdown;
use momentum_core::config::AlertConfig;
use momentum_core::market::entity::IndicatorSnapshot;
use momentum_core::market::port::IndicatorSource;
use momentum_core::notify::port::AlertNotifier;
use momentum_core::store::port::AlertStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// 单条告警一次评估的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationOutcome {
    // 状态写入失败，本轮跳过，下一轮重新拉取
    Skipped,
    // 条件未满足
    Waiting,
    // 条件满足并已推进到终态，`notified` 表示通知是否发送成功
    Triggered { notified: bool },
}

/// # Summary
/// 按指标选择器从快照中取值。
///
/// # Returns
/// 无法识别的选择器返回 None。
pub fn current_value(kind: &IndicatorKind, snapshot: &IndicatorSnapshot) -> Option<f64> {
    match kind {
        IndicatorKind::Rsi => Some(snapshot.rsi),
        IndicatorKind::Macd => Some(snapshot.macd),
        IndicatorKind::Unknown(_) => None,
    }
}

/// # Summary
/// 判断指标值是否满足告警条件。
///
/// # Logic
/// - `UP`: `value > threshold` 且 `value > 0`。
/// - `DOWN`: `value < threshold` 且 `value > 0`。
/// - 无法识别的方向永不触发。
///
/// 两个方向都要求 `value > 0`，因此 MACD 为负时任何告警都不会触发。
pub fn is_triggered(direction: &Direction, threshold: f64, value: f64) -> bool {
    match direction {
        Direction::Up => value > threshold && value > 0.0,
        Direction::Down => value < threshold && value > 0.0,
        Direction::Unknown(_) => false,
    }
}

/// # Summary
/// 告警评估循环。
///
/// # Invariants
/// - 每轮只读取一次指标快照，本轮所有告警基于同一份快照评估。
/// - 单告警评估任务受信号量约束，同时运行数不超过 `max_concurrency`。
/// - 同一告警可能被相邻两轮同时评估，状态写入以最后一次为准，不做逐告警加锁。
/// - 通知至多发送一次，失败不重试。
pub struct AlertMonitor {
    store: Arc<dyn AlertStore>,
    indicators: Arc<dyn IndicatorSource>,
    notifier: Arc<dyn AlertNotifier>,
    queue: NotificationQueue,
    limiter: Arc<Semaphore>,
    interval: Duration,
}

impl AlertMonitor {
    /// # Summary
    /// 创建评估循环。
    ///
    /// # Arguments
    /// * `store` - 告警存储。
    /// * `indicators` - 指标快照来源。
    /// * `notifier` - 通知发送器。
    /// * `queue` - 已触发告警的通知队列。
    /// * `config` - 评估周期与并发上限，并发上限为 0 时按 1 处理。
    pub fn new(
        store: Arc<dyn AlertStore>,
        indicators: Arc<dyn IndicatorSource>,
        notifier: Arc<dyn AlertNotifier>,
        queue: NotificationQueue,
        config: &AlertConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            indicators,
            notifier,
            queue,
            limiter: Arc::new(Semaphore::new(config.max_concurrency.max(1))),
            interval: Duration::from_millis(config.check_interval_ms.max(1)),
        })
    }

    /// # Summary
    /// 按固定周期执行评估，直到收到停止信号。
    ///
    /// # Logic
    /// 1. 周期计时器错过的节拍顺延，不补发。
    /// 2. 每个节拍派发一轮评估，不等待本轮任务结束。
    /// 3. 收到停止信号后退出，派发过程中同样响应停止信号，已派发的任务继续跑完。
    pub async fn run(self: Arc<Self>, mut shutdown: Shutdown) {
        info!(interval = ?self.interval, "Alert monitor started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.wait() => break,
                _ = ticker.tick() => {
                    let handles = self.spawn_pass(&mut shutdown).await;
                    debug!(spawned = handles.len(), "Evaluation pass dispatched");
                }
            }
        }

        info!("Alert monitor stopped");
    }

    /// # Summary
    /// 派发一轮评估。
    ///
    /// # Logic
    /// 1. 拉取全部未完结告警，失败则记录日志并放弃本轮。
    /// 2. 读取一次指标快照。
    /// 3. 每条告警先获取信号量许可再派生任务，许可随任务结束释放。
    /// 4. 拉取与等待许可期间收到停止信号则不再派发剩余告警。
    ///
    /// # Returns
    /// 本轮派生任务的句柄，调用方可选择等待。
    pub async fn spawn_pass(
        self: &Arc<Self>,
        shutdown: &mut Shutdown,
    ) -> Vec<JoinHandle<EvaluationOutcome>> {
        let fetched = tokio::select! {
            biased;
            _ = shutdown.wait() => return Vec::new(),
            fetched = self.store.fetch_outstanding() => fetched,
        };
        let alerts = match fetched {
            Ok(alerts) => alerts,
            Err(e) => {
                error!(error = %e, "Error fetching alerts");
                return Vec::new();
            }
        };

        let snapshot = self.indicators.snapshot();
        let mut handles = Vec::with_capacity(alerts.len());

        for alert in alerts {
            let acquired = tokio::select! {
                biased;
                _ = shutdown.wait() => {
                    info!(dispatched = handles.len(), "Shutdown during dispatch");
                    break;
                }
                acquired = self.limiter.clone().acquire_owned() => acquired,
            };
            let permit = match acquired {
                Ok(permit) => permit,
                Err(e) => {
                    error!(error = %e, "Evaluation limiter closed");
                    break;
                }
            };
            let monitor = Arc::clone(self);
            handles.push(tokio::spawn(async move {
                let _permit = permit;
                monitor.evaluate(alert, &snapshot).await
            }));
        }

        handles
    }

    /// # Summary
    /// 评估单条告警并推进其状态。
    ///
    /// # Logic
    /// 1. `pending` 先持久化为 `active`，写入失败则本轮跳过。
    /// 2. 按选择器取当前值，无法识别时记录警告并按 0 处理。
    /// 3. 条件不满足返回 `Waiting`。
    /// 4. 满足时持久化 `triggered` (失败则跳过)，投递通知队列，发送通知，
    ///    无论通知成败都持久化 `completed`。
    pub async fn evaluate(&self, mut alert: Alert, snapshot: &IndicatorSnapshot) -> EvaluationOutcome {
        if alert.status == AlertStatus::Pending {
            if let Err(e) = self.store.update_status(alert.id, AlertStatus::Active).await {
                warn!(alert_id = alert.id, error = %e, "Error activating alert");
                return EvaluationOutcome::Skipped;
            }
            alert.status = AlertStatus::Active;
        }

        let value = match current_value(&alert.indicator, snapshot) {
            Some(value) => value,
            None => {
                warn!(alert_id = alert.id, indicator = %alert.indicator, "Unknown indicator");
                0.0
            }
        };

        if !is_triggered(&alert.direction, alert.value, value) {
            if let Direction::Unknown(raw) = &alert.direction {
                debug!(alert_id = alert.id, direction = %raw, "Unknown direction, alert is inert");
            }
            return EvaluationOutcome::Waiting;
        }

        if let Err(e) = self.store.update_status(alert.id, AlertStatus::Triggered).await {
            error!(alert_id = alert.id, error = %e, "Error updating alert status");
            return EvaluationOutcome::Skipped;
        }
        alert.status = AlertStatus::Triggered;
        info!(alert_id = alert.id, value, threshold = alert.value, "Alert condition met");

        self.queue.push(alert.clone()).await;

        let notified = match self.notifier.send(&alert, value).await {
            Ok(()) => true,
            Err(e) => {
                error!(alert_id = alert.id, error = %e, "Error sending notification");
                false
            }
        };

        if let Err(e) = self.store.update_status(alert.id, AlertStatus::Completed).await {
            error!(alert_id = alert.id, error = %e, "Error completing alert");
        }

        EvaluationOutcome::Triggered { notified }
    }
}
