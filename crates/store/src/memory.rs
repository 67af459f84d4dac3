use async_trait::async_trait;
use chrono::Utc;
use momentum_core::alert::entity::{Alert, AlertRequest, AlertStatus};
use momentum_core::store::error::StoreError;
use momentum_core::store::port::AlertStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    alerts: HashMap<i64, Alert>,
}

/// # Summary
/// 基于内存哈希表的告警存储。
///
/// # Invariants
/// - id 从 1 开始单调递增，与 SQLite 自增语义一致。
/// - 进程退出后数据丢失。
#[derive(Default)]
pub struct MemoryAlertStore {
    state: RwLock<MemoryState>,
}

impl MemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前保存的告警条数
    pub async fn len(&self) -> usize {
        self.state.read().await.alerts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn insert(&self, request: &AlertRequest) -> Result<Alert, StoreError> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let now = Utc::now();
        let alert = Alert {
            id: state.next_id,
            user_id: request.user_id,
            email: request.email.clone(),
            value: request.value,
            direction: request.direction.clone(),
            indicator: request.indicator.clone(),
            status: AlertStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.alerts.insert(alert.id, alert.clone());
        Ok(alert)
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Alert, StoreError> {
        self.state
            .read()
            .await
            .alerts
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn fetch_outstanding(&self) -> Result<Vec<Alert>, StoreError> {
        let state = self.state.read().await;
        let mut alerts: Vec<Alert> = state
            .alerts
            .values()
            .filter(|a| a.status.is_outstanding())
            .cloned()
            .collect();
        alerts.sort_by_key(|a| a.id);
        Ok(alerts)
    }

    async fn update_status(&self, id: i64, status: AlertStatus) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let alert = state.alerts.get_mut(&id).ok_or(StoreError::NotFound)?;
        alert.status = status;
        alert.updated_at = Utc::now();
        Ok(())
    }
}
