// ============================================================================
// CONFIG - Configuración en tiempo de compilación (option_env! + .env)
// ============================================================================

use serde::{Deserialize, Serialize};

const DEFAULT_API_GATEWAY_URL: &str = "http://localhost:8080";
const DEFAULT_POLL_INTERVAL_MS: u32 = 1500;
const DEFAULT_PING_HISTORY_CAP: usize = 20;
const DEFAULT_MESSAGE_TIMEOUT_MS: u32 = 5000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// URL base del API Gateway, única para todos los endpoints
    pub api_gateway_url: String,
    pub monitor_poll_interval_ms: u32,
    pub ping_history_cap: usize,
    pub message_timeout_ms: u32,
    pub enable_logging: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_gateway_url: DEFAULT_API_GATEWAY_URL.to_string(),
            monitor_poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            ping_history_cap: DEFAULT_PING_HISTORY_CAP,
            message_timeout_ms: DEFAULT_MESSAGE_TIMEOUT_MS,
            enable_logging: true,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("API_GATEWAY_URL"),
            option_env!("MONITOR_POLL_INTERVAL_MS"),
            option_env!("PING_HISTORY_CAP"),
            option_env!("MESSAGE_TIMEOUT_MS"),
            option_env!("ENABLE_LOGGING"),
        )
    }

    /// Valores no parseables caen a los defaults
    fn from_values(
        gateway: Option<&str>,
        poll_ms: Option<&str>,
        history_cap: Option<&str>,
        message_ms: Option<&str>,
        logging: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            api_gateway_url: gateway
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.api_gateway_url),
            monitor_poll_interval_ms: poll_ms
                .and_then(|v| v.trim().parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.monitor_poll_interval_ms),
            ping_history_cap: history_cap
                .and_then(|v| v.trim().parse().ok())
                .filter(|cap| *cap > 0)
                .unwrap_or(defaults.ping_history_cap),
            message_timeout_ms: message_ms
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.message_timeout_ms),
            enable_logging: logging
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.enable_logging),
        }
    }

    /// URL completa para un path del gateway
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_gateway_url, path)
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_values(None, None, None, None, None);
        assert_eq!(config.api_gateway_url, "http://localhost:8080");
        assert_eq!(config.monitor_poll_interval_ms, 1500);
        assert_eq!(config.ping_history_cap, 20);
        assert!(config.enable_logging);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = AppConfig::from_values(
            Some("  "),
            Some("abc"),
            Some("0"),
            Some("-1"),
            Some("maybe"),
        );
        assert_eq!(config.api_gateway_url, "http://localhost:8080");
        assert_eq!(config.monitor_poll_interval_ms, 1500);
        assert_eq!(config.ping_history_cap, 20);
        assert_eq!(config.message_timeout_ms, 5000);
        assert!(config.enable_logging);
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = AppConfig::from_values(Some("http://gw:9000/"), Some("500"), Some("50"), None, Some("false"));
        assert_eq!(config.endpoint("/api/v1/monitor/ping-logistica"), "http://gw:9000/api/v1/monitor/ping-logistica");
        assert_eq!(config.monitor_poll_interval_ms, 500);
        assert_eq!(config.ping_history_cap, 50);
        assert!(!config.enable_logging);
    }
}
