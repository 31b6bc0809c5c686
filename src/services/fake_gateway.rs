// Gateway en memoria para las pruebas de seguridad.
// Firma = hash FNV-1a del payload canonicalizado (claves ordenadas).

use std::cell::{Cell, RefCell};

use serde_json::{json, Map, Value};

use crate::models::{
    Entrega, LoginRequest, LoginResponse, LogisticaStatus, NuevaEntrega, PingResult,
    SignatureResponse, SignupRequest, SignupResponse, TareaRequest, TareaResponse, ValidationResponse,
};
use crate::models::entrega::PedidoId;
use crate::services::api_client::{ApiError, Confirmation, GatewayApi};
use crate::services::entrega_flow::SIGNATURE_FIELD;
use crate::services::token_codec::test_tokens::token_with_claims;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfirmMode {
    /// Verifica firma contra payload
    Enforcing,
    AcceptAll,
    RejectAll(u16),
    /// Solo comprueba que el payload fue firmado alguna vez, ignora la firma
    PayloadOnly,
}

pub struct FakeGateway {
    credentials: Vec<(String, String)>,
    confirm_mode: ConfirmMode,
    encrypt_at_rest: bool,
    normalize_on_sign: bool,
    fail_create: bool,
    subject_id: bool,
    /// Confirmación aceptada sin cuerpo (204)
    empty_confirm: bool,
    next_id: Cell<i64>,
    stored: RefCell<Vec<(Entrega, String)>>,
    signed_payloads: RefCell<Vec<Value>>,
    confirmed: RefCell<Vec<i64>>,
    calls: RefCell<Vec<&'static str>>,
    login_attempts: RefCell<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            credentials: vec![("admin".to_string(), "admin".to_string())],
            confirm_mode: ConfirmMode::Enforcing,
            encrypt_at_rest: false,
            normalize_on_sign: false,
            fail_create: false,
            subject_id: true,
            empty_confirm: false,
            next_id: Cell::new(1),
            stored: RefCell::new(Vec::new()),
            signed_payloads: RefCell::new(Vec::new()),
            confirmed: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            login_attempts: RefCell::new(Vec::new()),
        }
    }

    pub fn with_credentials(mut self, credentials: &[(&str, &str)]) -> Self {
        self.credentials = credentials
            .iter()
            .map(|(u, p)| (u.to_string(), p.to_string()))
            .collect();
        self
    }

    pub fn with_confirm_mode(mut self, mode: ConfirmMode) -> Self {
        self.confirm_mode = mode;
        self
    }

    pub fn encrypting(mut self) -> Self {
        self.encrypt_at_rest = true;
        self
    }

    pub fn normalizing_signer(mut self) -> Self {
        self.normalize_on_sign = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn without_subject_id(mut self) -> Self {
        self.subject_id = false;
        self
    }

    pub fn confirming_without_body(mut self) -> Self {
        self.empty_confirm = true;
        self
    }

    pub fn token_for_user(&self, id: i64) -> String {
        if self.subject_id {
            token_with_claims(&json!({"sub": {"id": id, "nombre": "admin", "roles": "Admin"}}))
        } else {
            token_with_claims(&json!({"sub": {"nombre": "admin"}}))
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    pub fn login_attempts(&self) -> Vec<String> {
        self.login_attempts.borrow().clone()
    }

    pub fn confirmed_ids(&self) -> Vec<i64> {
        self.confirmed.borrow().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.borrow_mut().push(call);
    }

    fn forbidden() -> ApiError {
        ApiError::Http {
            status: 403,
            message: "Firma inválida".to_string(),
        }
    }

    fn canonical(value: &Value) -> Value {
        match value {
            Value::Object(obj) => {
                let mut keys: Vec<&String> = obj.keys().collect();
                keys.sort();
                let mut out = Map::new();
                for key in keys {
                    out.insert(key.clone(), Self::canonical(&obj[key]));
                }
                Value::Object(out)
            }
            Value::Array(items) => Value::Array(items.iter().map(Self::canonical).collect()),
            other => other.clone(),
        }
    }

    fn fnv1a(seed: u64, bytes: &[u8]) -> u64 {
        bytes.iter().fold(seed, |hash, b| {
            (hash ^ u64::from(*b)).wrapping_mul(0x0000_0100_0000_01b3)
        })
    }

    pub fn signature_for(payload: &Value) -> String {
        let text = Self::canonical(payload).to_string();
        format!(
            "{:016x}{:016x}",
            Self::fnv1a(0xcbf2_9ce4_8422_2325, text.as_bytes()),
            Self::fnv1a(0x8422_2325_cbf2_9ce4, text.as_bytes())
        )
    }
}

impl GatewayApi for FakeGateway {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.record("login");
        self.login_attempts.borrow_mut().push(request.nombre.clone());
        let valid = self
            .credentials
            .iter()
            .any(|(u, p)| *u == request.nombre && *p == request.contrasena);
        if valid {
            Ok(LoginResponse {
                mensaje: Some("Inicio de sesión exitoso".to_string()),
                token: Some(self.token_for_user(1)),
            })
        } else {
            Err(ApiError::Http {
                status: 401,
                message: "Nombre de usuario o contraseña incorrectos".to_string(),
            })
        }
    }

    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError> {
        self.record("signup");
        Ok(SignupResponse {
            mensaje: Some("Usuario creado exitosamente".to_string()),
            usuario: Some(json!({"nombre": request.nombre})),
            token: None,
        })
    }

    async fn sign_data(&self, _token: &str, payload: &Value) -> Result<SignatureResponse, ApiError> {
        self.record("sign_data");
        let mut signed = payload.clone();
        if self.normalize_on_sign {
            if let Some(obj) = signed.as_object_mut() {
                obj.insert("normalizado".to_string(), Value::Bool(true));
            }
        }
        self.signed_payloads.borrow_mut().push(Self::canonical(&signed));
        Ok(SignatureResponse {
            firma: Self::signature_for(&signed),
            payload: signed,
            timestamp: Some("2025-01-01T00:00:00".to_string()),
        })
    }

    async fn validate_signature(
        &self,
        _token: &str,
        payload: &Value,
        firma: &str,
    ) -> Result<ValidationResponse, ApiError> {
        self.record("validate_signature");
        Ok(ValidationResponse {
            payload: Some(payload.clone()),
            firma: Some(firma.to_string()),
            timestamp: None,
            firma_valida: Self::signature_for(payload) == firma,
        })
    }

    async fn list_entregas(&self) -> Result<Vec<Entrega>, ApiError> {
        self.record("list_entregas");
        Ok(self.stored.borrow().iter().map(|(e, _)| e.clone()).collect())
    }

    async fn get_entrega(&self, id: i64) -> Result<Entrega, ApiError> {
        self.record("get_entrega");
        self.stored
            .borrow()
            .iter()
            .find(|(e, _)| e.id == id)
            .map(|(e, plain)| Entrega {
                direccion: plain.clone(),
                ..e.clone()
            })
            .ok_or(ApiError::Http {
                status: 404,
                message: "Entrega no encontrada".to_string(),
            })
    }

    async fn create_entrega(&self, entrega: &NuevaEntrega) -> Result<Entrega, ApiError> {
        self.record("create_entrega");
        if self.fail_create {
            return Err(ApiError::Http {
                status: 500,
                message: "Error interno".to_string(),
            });
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let direccion = if self.encrypt_at_rest {
            let hex: String = entrega.direccion.bytes().map(|b| format!("{:02x}", b)).collect();
            format!("gAAAAB:{}", hex)
        } else {
            entrega.direccion.clone()
        };
        let stored = Entrega {
            id,
            direccion,
            pedido_id: Some(PedidoId::Texto(entrega.pedido_id.clone())),
            estado: Some(entrega.estado.clone()),
            tiempo_entrega: None,
            task_id: None,
        };
        self.stored
            .borrow_mut()
            .push((stored.clone(), entrega.direccion.clone()));
        Ok(stored)
    }

    async fn enqueue_tarea(
        &self,
        _token: Option<&str>,
        tarea: &TareaRequest,
    ) -> Result<TareaResponse, ApiError> {
        self.record("enqueue_tarea");
        Ok(TareaResponse {
            task_id: Some(format!("task-{}", tarea.entrega_id)),
            estado: Some("PENDING".to_string()),
            message: None,
        })
    }

    async fn confirm_entrega(
        &self,
        id: i64,
        _token: &str,
        body: &Value,
    ) -> Result<Confirmation, ApiError> {
        self.record("confirm");
        let mut payload = body.as_object().cloned().unwrap_or_default();
        let firma = payload
            .remove(SIGNATURE_FIELD)
            .and_then(|v| v.as_str().map(|s| s.to_string()))
            .unwrap_or_default();
        let payload = Value::Object(payload);

        let accepted = match self.confirm_mode {
            ConfirmMode::AcceptAll => true,
            ConfirmMode::RejectAll(status) => {
                return Err(ApiError::Http {
                    status,
                    message: "Rechazado".to_string(),
                })
            }
            ConfirmMode::Enforcing => Self::signature_for(&payload) == firma,
            ConfirmMode::PayloadOnly => self
                .signed_payloads
                .borrow()
                .contains(&Self::canonical(&payload)),
        };
        if !accepted {
            return Err(Self::forbidden());
        }
        self.confirmed.borrow_mut().push(id);
        if self.empty_confirm {
            return Ok(Confirmation {
                status: 204,
                body: Value::Null,
            });
        }
        Ok(Confirmation {
            status: 200,
            body: json!({"mensaje": "Entrega confirmada", "entrega_id": id}),
        })
    }

    async fn ping_logistica(&self) -> Result<PingResult, ApiError> {
        self.record("ping");
        Err(ApiError::Network("sin monitor".to_string()))
    }

    async fn logistica_status(&self) -> Result<LogisticaStatus, ApiError> {
        self.record("status");
        Err(ApiError::Network("sin monitor".to_string()))
    }
}
