use crate::alert::entity::Alert;
use crate::notify::error::NotifyError;
use async_trait::async_trait;

/// # Summary
/// 告警触发后向外部系统发送通知的接口定义。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync` 以支持多个评估任务并发调用。
/// - 收件人取自 `alert.email`。
/// - 调用方对失败只记录日志，不重试 (至多一次投递)。
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    /// # Summary
    /// 发送告警触发通知。
    ///
    /// # Logic
    /// 1. 根据目标平台要求格式化告警内容与当前指标值。
    /// 2. 通过底层传输协议发送消息。
    ///
    /// # Arguments
    /// * `alert` - 已触发的告警。
    /// * `current_value` - 触发时刻的指标值。
    ///
    /// # Returns
    /// * 成功返回 `Ok(())`，失败返回 `Err(NotifyError)`。
    async fn send(&self, alert: &Alert, current_value: f64) -> Result<(), NotifyError>;
}
