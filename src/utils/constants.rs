// Paths del API Gateway (la URL base viene de CONFIG)

pub const LOGIN_PATH: &str = "/api/v1/autorizador/login";
pub const SIGNUP_PATH: &str = "/api/v1/autorizador/signup";
pub const SIGN_DATA_PATH: &str = "/api/v1/autorizador/sign-data";
pub const VALIDATE_SIGNATURE_PATH: &str = "/api/v1/autorizador/validate-signature";

pub const ENTREGAS_PATH: &str = "/api/v1/logistica/entregas";
pub const TAREAS_PATH: &str = "/api/v1/logistica/tareas";

pub const PING_LOGISTICA_PATH: &str = "/api/v1/monitor/ping-logistica";
pub const LOGISTICA_STATUS_PATH: &str = "/api/v1/monitor/logistica-status";

/// Clave de localStorage donde vive el bearer token
pub const TOKEN_STORAGE_KEY: &str = "auth_token";

/// Status con el que el backend rechaza una confirmación manipulada
pub const FORBIDDEN_STATUS: u16 = 403;

pub fn entrega_path(id: i64) -> String {
    format!("/api/v1/logistica/entrega/{}", id)
}

pub fn confirmar_entrega_path(id: i64) -> String {
    format!("/api/v1/logistica/entrega/{}/confirmar", id)
}
