use momentum_core::alert::entity::Alert;
use momentum_core::config::QueuePolicy;
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tracing::{info, warn};

/// # Summary
/// 已触发告警的有界通知队列 (生产端)。
///
/// # Invariants
/// - 容量固定；满载时按 `QueuePolicy` 等待或丢弃，从不无界增长。
/// - 可被多个评估任务克隆并发使用。
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    tx: Sender<Alert>,
    policy: QueuePolicy,
}

/// 创建通知队列，返回生产端与消费端
pub fn channel(capacity: usize, policy: QueuePolicy) -> (NotificationQueue, Receiver<Alert>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (NotificationQueue { tx, policy }, rx)
}

impl NotificationQueue {
    /// # Summary
    /// 投递一条已触发告警。
    ///
    /// # Logic
    /// 1. `Block`: 等待空位，消费端已关闭时放弃。
    /// 2. `Drop`: 队列满或已关闭时立即放弃。
    ///
    /// # Returns
    /// 是否成功入队。放弃时记录警告，不返回错误。
    pub async fn push(&self, alert: Alert) -> bool {
        let id = alert.id;
        match self.policy {
            QueuePolicy::Block => match self.tx.send(alert).await {
                Ok(()) => true,
                Err(_) => {
                    warn!(alert_id = id, "Notification queue closed, dropping alert");
                    false
                }
            },
            QueuePolicy::Drop => match self.tx.try_send(alert) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    warn!(alert_id = id, "Notification queue full, dropping alert");
                    false
                }
                Err(TrySendError::Closed(_)) => {
                    warn!(alert_id = id, "Notification queue closed, dropping alert");
                    false
                }
            },
        }
    }

    pub fn policy(&self) -> QueuePolicy {
        self.policy
    }
}

/// # Summary
/// 通知队列的消费者：逐条记录已触发告警。
///
/// 所有生产端释放后退出。
pub async fn run_notification_logger(mut rx: Receiver<Alert>) {
    while let Some(alert) = rx.recv().await {
        info!(
            alert_id = alert.id,
            user_id = alert.user_id,
            indicator = %alert.indicator,
            direction = %alert.direction,
            threshold = alert.value,
            "Alert triggered"
        );
    }
    info!("Notification queue drained");
}
