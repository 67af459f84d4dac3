use momentum_core::alert::entity::{Alert, AlertRequest};
use momentum_core::store::error::StoreError;
use momentum_core::store::port::AlertStore;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// # Summary
/// Manager 层的统一错误类型。
#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Alert not found: {0}")]
    NotFound(i64),
}

/// # Summary
/// 告警服务门面，编译期仅依赖 `AlertStore` 端口。
///
/// # Invariants
/// - 新建告警一律为 `pending`，由评估循环推进后续状态。
pub struct AlertService {
    store: Arc<dyn AlertStore>,
}

impl AlertService {
    pub fn new(store: Arc<dyn AlertStore>) -> Self {
        Self { store }
    }

    /// # Summary
    /// 创建一条告警。
    ///
    /// # Arguments
    /// * `request` - 用户提交的告警参数，方向与指标不做校验，无法识别时告警永不触发。
    ///
    /// # Returns
    /// * 存储层分配 id 后的完整告警。
    pub async fn create_alert(&self, request: AlertRequest) -> Result<Alert, ManagerError> {
        let alert = self.store.insert(&request).await?;
        info!(
            alert_id = alert.id,
            user_id = alert.user_id,
            indicator = %alert.indicator,
            direction = %alert.direction,
            threshold = alert.value,
            "Alert created"
        );
        Ok(alert)
    }

    /// # Summary
    /// 按 id 查询告警。
    ///
    /// # Returns
    /// * 不存在时返回 `ManagerError::NotFound`。
    pub async fn get_alert(&self, id: i64) -> Result<Alert, ManagerError> {
        self.store.fetch_by_id(id).await.map_err(|e| match e {
            StoreError::NotFound => ManagerError::NotFound(id),
            other => ManagerError::Store(other),
        })
    }
}
