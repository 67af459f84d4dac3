use super::error::StoreError;
use crate::alert::entity::{Alert, AlertRequest, AlertStatus};
use async_trait::async_trait;

/// # Summary
/// 告警存储接口，负责告警的持久化与状态流转写入。
///
/// # Invariants
/// - 每次调用自身是原子的，调用之间不提供事务保证。
/// - `update_status` 按 id 幂等，并发写入以最后一次为准。
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// # Summary
    /// 新增一条告警。
    ///
    /// # Logic
    /// 1. 以 `pending` 状态写入请求字段。
    /// 2. 回读存储层分配的 id 与时间戳。
    ///
    /// # Arguments
    /// * `request`: 创建请求。
    ///
    /// # Returns
    /// 成功返回完整的告警实体。
    async fn insert(&self, request: &AlertRequest) -> Result<Alert, StoreError>;

    /// # Summary
    /// 按 id 读取告警。
    ///
    /// # Returns
    /// 不存在时返回 `StoreError::NotFound`。
    async fn fetch_by_id(&self, id: i64) -> Result<Alert, StoreError>;

    /// # Summary
    /// 读取全部未完结告警。
    ///
    /// # Logic
    /// 过滤条件为 `status IN (pending, active)`，按 id 升序返回。
    async fn fetch_outstanding(&self) -> Result<Vec<Alert>, StoreError>;

    /// # Summary
    /// 写入告警状态并刷新更新时间。
    ///
    /// # Arguments
    /// * `id`: 告警 id。
    /// * `status`: 目标状态。
    ///
    /// # Returns
    /// id 不存在时返回 `StoreError::NotFound`。
    async fn update_status(&self, id: i64, status: AlertStatus) -> Result<(), StoreError>;
}
