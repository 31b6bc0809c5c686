// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO tiene lógica de negocio, solo hace requests HTTP contra el API Gateway.
// `GatewayApi` es la costura que usan las pruebas de seguridad, para poder
// ejercitarlas contra un gateway falso.
// ============================================================================

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::CONFIG;
use crate::models::{
    Entrega, LoginRequest, LoginResponse, LogisticaStatus, NuevaEntrega, PingResult, SignRequest,
    SignatureResponse, SignupRequest, SignupResponse, TareaRequest, TareaResponse, ValidateRequest,
    ValidationResponse,
};
use crate::utils::{
    confirmar_entrega_path, entrega_path, ENTREGAS_PATH, LOGIN_PATH, LOGISTICA_STATUS_PATH,
    PING_LOGISTICA_PATH, SIGNUP_PATH, SIGN_DATA_PATH, TAREAS_PATH, VALIDATE_SIGNATURE_PATH,
};

/// Campos donde el backend deja su mensaje de error, en orden de prioridad
const MESSAGE_FIELDS: &[&str] = &["mensaje", "error", "message", "msg"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Fallo de transporte: no hubo respuesta
    #[error("Network error: {0}")]
    Network(String),
    /// No se pudo construir/serializar la petición
    #[error("Request build error: {0}")]
    Request(String),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Mensaje legible para la UI (sin prefijo técnico en errores HTTP)
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Mejor esfuerzo para sacar el mensaje del backend de un cuerpo de error
pub fn extract_backend_message(body: &str, status_text: &str) -> String {
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = MESSAGE_FIELDS.iter().find_map(|field| {
            obj.get(*field)
                .and_then(|v| v.as_str())
                .filter(|msg| !msg.trim().is_empty())
        }) {
            return msg.to_string();
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    if status_text.trim().is_empty() {
        "Error desconocido".to_string()
    } else {
        status_text.to_string()
    }
}

/// Cuerpo de una respuesta 2xx que puede venir vacío o no ser JSON
pub fn parse_body_text(body: &str) -> Value {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}

/// Confirmación aceptada: el éxito lo decide el status, no el cuerpo
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub status: u16,
    pub body: Value,
}

/// Operaciones del API Gateway consumidas por el front
#[allow(async_fn_in_trait)]
pub trait GatewayApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError>;
    async fn sign_data(&self, token: &str, payload: &Value) -> Result<SignatureResponse, ApiError>;
    async fn validate_signature(
        &self,
        token: &str,
        payload: &Value,
        firma: &str,
    ) -> Result<ValidationResponse, ApiError>;

    async fn list_entregas(&self) -> Result<Vec<Entrega>, ApiError>;
    async fn get_entrega(&self, id: i64) -> Result<Entrega, ApiError>;
    async fn create_entrega(&self, entrega: &NuevaEntrega) -> Result<Entrega, ApiError>;
    async fn enqueue_tarea(
        &self,
        token: Option<&str>,
        tarea: &TareaRequest,
    ) -> Result<TareaResponse, ApiError>;
    async fn confirm_entrega(
        &self,
        id: i64,
        token: &str,
        body: &Value,
    ) -> Result<Confirmation, ApiError>;

    async fn ping_logistica(&self) -> Result<PingResult, ApiError>;
    async fn logistica_status(&self) -> Result<LogisticaStatus, ApiError>;
}

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone, Default)]
pub struct ApiClient;

impl ApiClient {
    pub fn new() -> Self {
        Self
    }

    fn url(&self, path: &str) -> String {
        CONFIG.endpoint(path)
    }

    fn with_bearer(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = Request::get(&self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_response(response).await
    }

    async fn send_post<B>(&self, path: &str, token: Option<&str>, body: &B) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = Self::with_bearer(Request::post(&self.url(path)), token)
            .json(body)
            .map_err(|e| ApiError::Request(e.to_string()))?;
        request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    async fn post_json<B, T>(&self, path: &str, token: Option<&str>, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send_post(path, token, body).await?;
        Self::read_response(response).await
    }

    async fn ensure_ok(response: Response) -> Result<Response, ApiError> {
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        let status_text = response.status_text();
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Http {
            status,
            message: extract_backend_message(&body, &status_text),
        })
    }

    async fn read_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        Self::ensure_ok(response)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

impl GatewayApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        log::info!("🔐 [API] Login para usuario: {}", request.nombre);
        self.post_json(LOGIN_PATH, None, request).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError> {
        log::info!("📝 [API] Signup para usuario: {}", request.nombre);
        self.post_json(SIGNUP_PATH, None, request).await
    }

    async fn sign_data(&self, token: &str, payload: &Value) -> Result<SignatureResponse, ApiError> {
        self.post_json(SIGN_DATA_PATH, Some(token), &SignRequest { payload })
            .await
    }

    async fn validate_signature(
        &self,
        token: &str,
        payload: &Value,
        firma: &str,
    ) -> Result<ValidationResponse, ApiError> {
        self.post_json(
            VALIDATE_SIGNATURE_PATH,
            Some(token),
            &ValidateRequest { payload, firma },
        )
        .await
    }

    async fn list_entregas(&self) -> Result<Vec<Entrega>, ApiError> {
        self.get_json(ENTREGAS_PATH).await
    }

    async fn get_entrega(&self, id: i64) -> Result<Entrega, ApiError> {
        self.get_json(&entrega_path(id)).await
    }

    async fn create_entrega(&self, entrega: &NuevaEntrega) -> Result<Entrega, ApiError> {
        log::info!("📦 [API] Creando entrega para pedido: {}", entrega.pedido_id);
        self.post_json(ENTREGAS_PATH, None, entrega).await
    }

    async fn enqueue_tarea(
        &self,
        token: Option<&str>,
        tarea: &TareaRequest,
    ) -> Result<TareaResponse, ApiError> {
        log::info!("⚙️ [API] Encolando tarea {} para entrega {}", tarea.tipo, tarea.entrega_id);
        self.post_json(TAREAS_PATH, token, tarea).await
    }

    async fn confirm_entrega(
        &self,
        id: i64,
        token: &str,
        body: &Value,
    ) -> Result<Confirmation, ApiError> {
        let response = self
            .send_post(&confirmar_entrega_path(id), Some(token), body)
            .await?;
        let response = Self::ensure_ok(response).await?;
        let status = response.status();
        // 204 o texto plano también son una confirmación aceptada
        let text = response.text().await.unwrap_or_default();
        Ok(Confirmation {
            status,
            body: parse_body_text(&text),
        })
    }

    async fn ping_logistica(&self) -> Result<PingResult, ApiError> {
        self.get_json(PING_LOGISTICA_PATH).await
    }

    async fn logistica_status(&self) -> Result<LogisticaStatus, ApiError> {
        self.get_json(LOGISTICA_STATUS_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_known_fields() {
        assert_eq!(
            extract_backend_message(r#"{"mensaje":"Nombre de usuario o contraseña incorrectos"}"#, "UNAUTHORIZED"),
            "Nombre de usuario o contraseña incorrectos"
        );
        assert_eq!(
            extract_backend_message(r#"{"error":"Body JSON requerido"}"#, "BAD REQUEST"),
            "Body JSON requerido"
        );
        assert_eq!(
            extract_backend_message(r#"{"msg":"Missing Authorization Header"}"#, ""),
            "Missing Authorization Header"
        );
    }

    #[test]
    fn test_message_falls_back_to_body_then_status() {
        assert_eq!(extract_backend_message("Bad Gateway", "BAD GATEWAY"), "Bad Gateway");
        assert_eq!(
            extract_backend_message(r#"{"mensaje":"","error":"Firma inválida"}"#, "FORBIDDEN"),
            "Firma inválida"
        );
        assert_eq!(extract_backend_message(r#"{"mensaje":""}"#, "FORBIDDEN"), r#"{"mensaje":""}"#);
        assert_eq!(extract_backend_message("   ", "FORBIDDEN"), "FORBIDDEN");
        assert_eq!(extract_backend_message("", ""), "Error desconocido");
    }

    #[test]
    fn test_success_body_without_json() {
        assert_eq!(parse_body_text(""), Value::Null);
        assert_eq!(parse_body_text("  \n"), Value::Null);
        assert_eq!(parse_body_text("OK"), Value::String("OK".to_string()));
        assert_eq!(
            parse_body_text(r#"{"mensaje":"Entrega confirmada"}"#)["mensaje"],
            "Entrega confirmada"
        );
    }

    #[test]
    fn test_api_error_status_and_message() {
        let err = ApiError::Http {
            status: 403,
            message: "Firma inválida".to_string(),
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.user_message(), "Firma inválida");
        assert_eq!(err.to_string(), "HTTP 403: Firma inválida");

        let net = ApiError::Network("connection refused".to_string());
        assert_eq!(net.status(), None);
        assert_eq!(net.user_message(), "Network error: connection refused");
    }
}
