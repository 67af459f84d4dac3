use async_trait::async_trait;
use chrono::{DateTime, Utc};
use momentum_core::alert::entity::{Alert, AlertRequest, AlertStatus};
use momentum_core::store::error::StoreError;
use momentum_core::store::port::AlertStore;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// 默认告警数据库文件名
const DEFAULT_ALERT_DB: &str = "alerts.db";

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, email, value, direction, indicator, status, created_at, updated_at FROM alerts";

type AlertRow = (
    i64,
    i64,
    String,
    f64,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

/// 将数据库行映射为领域实体，状态文本无法识别时返回 `StoreError::Unknown`
fn into_alert(row: AlertRow) -> Result<Alert, StoreError> {
    let status = row.6.parse::<AlertStatus>().map_err(StoreError::Unknown)?;
    Ok(Alert {
        id: row.0,
        user_id: row.1,
        email: row.2,
        value: row.3,
        direction: row.4.into(),
        indicator: row.5.into(),
        status,
        created_at: row.7,
        updated_at: row.8,
    })
}

/// AlertStore 的 SQLite 实现。
///
/// # Summary
/// 在 `alerts.db` 中保存全部告警，评估循环与 HTTP 接口共享同一连接池。
///
/// # Invariants
/// * 表结构在存储实例创建时初始化。
/// * `direction` / `indicator` 按原始文本保存，读取时再做大小写不敏感解析。
pub struct SqliteAlertStore {
    pool: SqlitePool,
}

impl SqliteAlertStore {
    /// 在配置的数据根目录下打开 `alerts.db`。
    ///
    /// # Logic
    /// 1. 获取数据根目录并确保其存在。
    /// 2. 委托 `open` 完成连接与建表。
    pub async fn new() -> Result<Self, StoreError> {
        let root = crate::config::get_root_dir();
        fs::create_dir_all(&root).map_err(|e| StoreError::InitError(e.to_string()))?;
        Self::open(&root.join(DEFAULT_ALERT_DB)).await
    }

    /// 打开指定路径的数据库文件，不存在时自动创建。
    ///
    /// # Logic
    /// 1. 配置 SQLite 连接选项，开启 `create_if_missing`。
    /// 2. 连接数据库并执行 DDL 初始化 `alerts` 表与状态索引。
    ///
    /// # Arguments
    /// * `path` - 数据库文件路径。
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| StoreError::InitError(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS alerts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                email TEXT NOT NULL,
                value REAL NOT NULL,
                direction TEXT NOT NULL,
                indicator TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_alerts_status ON alerts (status);
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::InitError(e.to_string()))?;

        info!(path = %path.display(), "Alert store opened");
        Ok(Self { pool })
    }
}

#[async_trait]
impl AlertStore for SqliteAlertStore {
    /// # Summary
    /// 插入一条 pending 告警。
    ///
    /// # Logic
    /// 1. 以当前时间作为创建与更新时间写入。
    /// 2. 通过 `last_insert_rowid` 取回自增 id。
    async fn insert(&self, request: &AlertRequest) -> Result<Alert, StoreError> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO alerts (user_id, email, value, direction, indicator, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.user_id)
        .bind(&request.email)
        .bind(request.value)
        .bind(request.direction.to_string())
        .bind(request.indicator.to_string())
        .bind(AlertStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        debug!(alert_id = id, "Alert inserted");

        Ok(Alert {
            id,
            user_id: request.user_id,
            email: request.email.clone(),
            value: request.value,
            direction: request.direction.clone(),
            indicator: request.indicator.clone(),
            status: AlertStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Alert, StoreError> {
        sqlx::query_as::<_, AlertRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(into_alert)
            .transpose()?
            .ok_or(StoreError::NotFound)
    }

    /// # Summary
    /// 读取 pending 与 active 状态的告警。
    ///
    /// # Logic
    /// 按 id 升序返回；任一行状态无法识别则整体失败。
    async fn fetch_outstanding(&self) -> Result<Vec<Alert>, StoreError> {
        let rows = sqlx::query_as::<_, AlertRow>(&format!(
            "{SELECT_COLUMNS} WHERE status IN (?, ?) ORDER BY id"
        ))
        .bind(AlertStatus::Pending.as_str())
        .bind(AlertStatus::Active.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter().map(into_alert).collect()
    }

    /// # Summary
    /// 写入状态并刷新 `updated_at`。
    ///
    /// # Returns
    /// 没有命中任何行时返回 `StoreError::NotFound`。
    async fn update_status(&self, id: i64, status: AlertStatus) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE alerts SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        debug!(alert_id = id, status = %status, "Alert status updated");
        Ok(())
    }
}
