use async_trait::async_trait;
use momentum_core::alert::entity::Alert;
use momentum_core::notify::error::NotifyError;
use momentum_core::notify::port::AlertNotifier;
use tracing::info;

/// # Summary
/// 只写日志的通知实现，未配置 SMTP 时使用。
///
/// # Invariants
/// - 永远返回成功。
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl AlertNotifier for LogNotifier {
    async fn send(&self, alert: &Alert, current_value: f64) -> Result<(), NotifyError> {
        info!(
            alert_id = alert.id,
            to = %alert.email,
            indicator = %alert.indicator,
            direction = %alert.direction,
            target = alert.value,
            current = current_value,
            "Alert notification (SMTP not configured)"
        );
        Ok(())
    }
}
