// Formato de fechas y firmas para la UI

use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// Marca de tiempo actual (RFC 3339, UTC)
pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

/// "HH:MM:SS" local para un timestamp RFC 3339 o ISO sin zona.
/// Si no se puede interpretar se devuelve tal cual.
pub fn format_time(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.with_timezone(&Local).format("%H:%M:%S").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%H:%M:%S").to_string();
    }
    timestamp.to_string()
}

/// Prefijo de la firma para mostrar en tablas y mensajes
pub fn short_signature(firma: &str) -> String {
    const VISIBLE: usize = 16;
    if firma.chars().count() <= VISIBLE {
        firma.to_string()
    } else {
        format!("{}…", firma.chars().take(VISIBLE).collect::<String>())
    }
}

/// "123.4 ms" / "N/A"
pub fn format_response_time(ms: Option<f64>) -> String {
    match ms {
        Some(ms) => format!("{:.1} ms", ms),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_naive_and_garbage() {
        assert_eq!(format_time("2025-01-01T10:20:30.123456"), "10:20:30");
        assert_eq!(format_time("2025-01-01T10:20:30"), "10:20:30");
        assert_eq!(format_time("ayer"), "ayer");
    }

    #[test]
    fn test_short_signature() {
        assert_eq!(short_signature("abcd"), "abcd");
        assert_eq!(short_signature("0123456789abcdef0123"), "0123456789abcdef…");
    }

    #[test]
    fn test_response_time() {
        assert_eq!(format_response_time(Some(12.345)), "12.3 ms");
        assert_eq!(format_response_time(None), "N/A");
    }
}
