use serde::{Deserialize, Serialize};

/// Estado de un ping individual. Llega como texto libre; se normaliza en minúsculas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PingStatus {
    Healthy,
    Degraded,
    Critical,
    Timeout,
    Unreachable,
    Error,
    Unknown,
}

impl From<String> for PingStatus {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "healthy" => PingStatus::Healthy,
            "degraded" => PingStatus::Degraded,
            "critical" => PingStatus::Critical,
            "timeout" => PingStatus::Timeout,
            "unreachable" => PingStatus::Unreachable,
            "error" => PingStatus::Error,
            _ => PingStatus::Unknown,
        }
    }
}

impl From<PingStatus> for String {
    fn from(status: PingStatus) -> Self {
        status.as_str().to_string()
    }
}

impl PingStatus {
    /// Nombre en minúsculas, usado también como clase CSS
    pub fn as_str(&self) -> &'static str {
        match self {
            PingStatus::Healthy => "healthy",
            PingStatus::Degraded => "degraded",
            PingStatus::Critical => "critical",
            PingStatus::Timeout => "timeout",
            PingStatus::Unreachable => "unreachable",
            PingStatus::Error => "error",
            PingStatus::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PingStatus::Healthy => "Healthy",
            PingStatus::Degraded => "Degraded",
            PingStatus::Critical => "Critical",
            PingStatus::Timeout => "Timeout",
            PingStatus::Unreachable => "Unreachable",
            PingStatus::Error => "Error",
            PingStatus::Unknown => "Unknown",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PingStatus::Healthy => "✅",
            PingStatus::Degraded => "⚠️",
            PingStatus::Critical => "❌",
            PingStatus::Timeout => "⏱️",
            PingStatus::Unreachable => "🔌",
            PingStatus::Error => "❗",
            PingStatus::Unknown => "❔",
        }
    }

    pub fn badge_class(&self) -> String {
        match self {
            PingStatus::Unknown => "badge bg-secondary".to_string(),
            other => format!("badge {}", other.as_str()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PingResult {
    #[serde(default)]
    pub target_service: String,
    pub status: PingStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub response_time_ms: Option<f64>,
    #[serde(default)]
    pub http_status: Option<u16>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, alias = "success")]
    pub ping_successful: bool,
}

/// Clase CSS según tiempo de respuesta
pub fn response_time_class(response_time_ms: Option<f64>) -> &'static str {
    match response_time_ms {
        None => "",
        Some(ms) if ms <= 0.0 => "",
        Some(ms) if ms < 100.0 => "fast",
        Some(ms) if ms < 500.0 => "slow",
        Some(_) => "very-slow",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OverallStatus {
    Healthy,
    Degraded,
    Critical,
    Unknown,
}

impl From<String> for OverallStatus {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "healthy" => OverallStatus::Healthy,
            "degraded" => OverallStatus::Degraded,
            "critical" => OverallStatus::Critical,
            _ => OverallStatus::Unknown,
        }
    }
}

impl From<OverallStatus> for String {
    fn from(status: OverallStatus) -> Self {
        status.css_class().to_string()
    }
}

impl OverallStatus {
    pub fn css_class(&self) -> &'static str {
        match self {
            OverallStatus::Healthy => "healthy",
            OverallStatus::Degraded => "degraded",
            OverallStatus::Critical => "critical",
            OverallStatus::Unknown => "unknown",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            OverallStatus::Healthy => "Saludable",
            OverallStatus::Degraded => "Degradado",
            OverallStatus::Critical => "Crítico",
            OverallStatus::Unknown => "Desconocido",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrokerStatus {
    #[serde(default)]
    pub redis_connected: bool,
    #[serde(default)]
    pub redis_ping: bool,
    #[serde(default)]
    pub queues: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueInfo {
    pub name: String,
    pub count: u64,
}

impl BrokerStatus {
    /// Colas con su número de tareas; `info` puede ser lista, número u objeto con `length`
    pub fn queue_list(&self) -> Vec<QueueInfo> {
        self.queues
            .iter()
            .map(|(name, info)| {
                let count = match info {
                    serde_json::Value::Array(items) => items.len() as u64,
                    serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
                    serde_json::Value::Object(obj) => obj
                        .get("length")
                        .and_then(|v| v.as_u64())
                        .unwrap_or(0),
                    _ => 0,
                };
                QueueInfo {
                    name: name.clone(),
                    count,
                }
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogisticaStatus {
    #[serde(default)]
    pub service: String,
    pub overall_status: OverallStatus,
    #[serde(default)]
    pub ping_echo: Option<PingResult>,
    #[serde(default)]
    pub broker_status: Option<BrokerStatus>,
    #[serde(default)]
    pub last_check: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_status_is_case_insensitive() {
        let ping: PingResult = serde_json::from_str(
            r#"{"target_service":"logistica","status":"HEALTHY","message":"ok",
                "response_time_ms":12.5,"http_status":200,"timestamp":"2025-01-01T00:00:00",
                "ping_successful":true}"#,
        )
        .unwrap();
        assert_eq!(ping.status, PingStatus::Healthy);
        assert_eq!(ping.http_status, Some(200));
        assert!(ping.ping_successful);
    }

    #[test]
    fn test_unknown_status_does_not_fail_parsing() {
        let ping: PingResult =
            serde_json::from_str(r#"{"status":"flapping","timestamp":"t"}"#).unwrap();
        assert_eq!(ping.status, PingStatus::Unknown);
        assert_eq!(ping.status.badge_class(), "badge bg-secondary");
    }

    #[test]
    fn test_response_time_classes() {
        assert_eq!(response_time_class(None), "");
        assert_eq!(response_time_class(Some(42.0)), "fast");
        assert_eq!(response_time_class(Some(250.0)), "slow");
        assert_eq!(response_time_class(Some(900.0)), "very-slow");
    }

    #[test]
    fn test_queue_list_counts() {
        let status: LogisticaStatus = serde_json::from_str(
            r#"{"service":"logistica","overall_status":"degraded",
                "broker_status":{"redis_connected":true,"redis_ping":true,
                    "queues":{"entregas":[1,2,3],"reportes":{"length":4},"otros":"x"}},
                "recommendations":["Revisar Redis"]}"#,
        )
        .unwrap();
        assert_eq!(status.overall_status.text(), "Degradado");
        let mut queues = status.broker_status.unwrap().queue_list();
        queues.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            queues,
            vec![
                QueueInfo { name: "entregas".to_string(), count: 3 },
                QueueInfo { name: "otros".to_string(), count: 0 },
                QueueInfo { name: "reportes".to_string(), count: 4 },
            ]
        );
    }
}
