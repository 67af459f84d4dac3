use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 告警生命周期状态。
///
/// # Invariants
/// - 只允许 `Pending -> Active -> Triggered -> Completed` 单向流转。
/// - `Completed` 为终态，不再参与评估。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    // 已创建，尚未被评估轮次观察到
    Pending,
    // 已被评估轮次观察到，等待条件满足
    Active,
    // 条件已满足，通知尚未发出
    Triggered,
    // 通知已尝试发送 (无论成败)
    Completed,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Active => "active",
            AlertStatus::Triggered => "triggered",
            AlertStatus::Completed => "completed",
        }
    }

    /// 是否仍需参与周期评估
    pub fn is_outstanding(&self) -> bool {
        matches!(self, AlertStatus::Pending | AlertStatus::Active)
    }
}

impl FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(AlertStatus::Pending),
            "active" => Ok(AlertStatus::Active),
            "triggered" => Ok(AlertStatus::Triggered),
            "completed" => Ok(AlertStatus::Completed),
            _ => Err(format!("Unknown AlertStatus: {}", s)),
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// # Summary
/// 告警触发方向。
///
/// # Invariants
/// - 解析大小写不敏感；无法识别的取值原样保留在 `Unknown` 中，该告警永不触发。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    Up,
    Down,
    Unknown(String),
}

impl From<String> for Direction {
    fn from(raw: String) -> Self {
        match raw.to_uppercase().as_str() {
            "UP" => Direction::Up,
            "DOWN" => Direction::Down,
            _ => Direction::Unknown(raw),
        }
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        direction.to_string()
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => f.write_str("UP"),
            Direction::Down => f.write_str("DOWN"),
            Direction::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// # Summary
/// 告警监控的指标选择器。
///
/// # Invariants
/// - 解析大小写不敏感；无法识别的取值原样保留在 `Unknown` 中。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IndicatorKind {
    Rsi,
    Macd,
    Unknown(String),
}

impl From<String> for IndicatorKind {
    fn from(raw: String) -> Self {
        match raw.to_uppercase().as_str() {
            "RSI" => IndicatorKind::Rsi,
            "MACD" => IndicatorKind::Macd,
            _ => IndicatorKind::Unknown(raw),
        }
    }
}

impl From<IndicatorKind> for String {
    fn from(kind: IndicatorKind) -> Self {
        kind.to_string()
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndicatorKind::Rsi => f.write_str("RSI"),
            IndicatorKind::Macd => f.write_str("MACD"),
            IndicatorKind::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// # Summary
/// 创建告警的请求体。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRequest {
    pub user_id: i64,
    // 通知收件地址
    pub email: String,
    // 触发阈值
    pub value: f64,
    pub direction: Direction,
    pub indicator: IndicatorKind,
}

/// # Summary
/// 用户定义的指标阈值告警。
///
/// # Invariants
/// - `id` 由存储层分配且全局唯一。
/// - 通知收件人直接取自 `email`，不再按用户二次查询。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub user_id: i64,
    pub email: String,
    pub value: f64,
    pub direction: Direction,
    pub indicator: IndicatorKind,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_are_case_insensitive() {
        assert_eq!(Direction::from("up".to_string()), Direction::Up);
        assert_eq!(Direction::from("Down".to_string()), Direction::Down);
        assert_eq!(IndicatorKind::from("rsi".to_string()), IndicatorKind::Rsi);
        assert_eq!(IndicatorKind::from("MacD".to_string()), IndicatorKind::Macd);
    }

    #[test]
    fn test_unknown_selector_is_preserved() {
        let kind = IndicatorKind::from("stoch".to_string());
        assert_eq!(kind, IndicatorKind::Unknown("stoch".to_string()));
        assert_eq!(kind.to_string(), "stoch");

        let json = serde_json::to_string(&Direction::Unknown("sideways".into())).unwrap();
        assert_eq!(json, "\"sideways\"");
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [
            AlertStatus::Pending,
            AlertStatus::Active,
            AlertStatus::Triggered,
            AlertStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<AlertStatus>(), Ok(status));
        }
        assert!("archived".parse::<AlertStatus>().is_err());
        assert!(AlertStatus::Pending.is_outstanding());
        assert!(!AlertStatus::Triggered.is_outstanding());
    }

    #[test]
    fn test_alert_request_deserializes_from_wire_format() {
        let json = r#"{"user_id":7,"email":"a@b.c","value":65.0,"direction":"up","indicator":"rsi"}"#;
        let req: AlertRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.direction, Direction::Up);
        assert_eq!(req.indicator, IndicatorKind::Rsi);
    }
}
