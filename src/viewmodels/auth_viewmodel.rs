// ============================================================================
// AUTH VIEWMODEL - Login, registro, firma y validación
// ============================================================================

use wasm_bindgen_futures::spawn_local;

use crate::models::{LoginRequest, SignupRequest, SubjectId};
use crate::services::entrega_flow::{build_business_payload, ConfirmationData};
use crate::services::{ApiClient, GatewayApi};
use crate::state::{parse_payload, AppState, AuthPanel, Message, Route};

/// Entrega usada por el payload de ejemplo
const EXAMPLE_ENTREGA_ID: i64 = 1;

#[derive(Clone)]
pub struct AuthViewModel {
    state: AppState,
    api_client: ApiClient,
}

impl AuthViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            api_client: ApiClient::new(),
        }
    }

    fn fail(&self, text: impl Into<String>) {
        self.state.auth.set_message(Message::error(text));
        self.state.notify_changes();
    }

    /// Marca loading; false si ya había una petición en curso
    fn begin(&self) -> bool {
        let auth = &self.state.auth;
        if *auth.loading.borrow() {
            return false;
        }
        *auth.loading.borrow_mut() = true;
        *auth.message.borrow_mut() = None;
        self.state.notify_changes();
        true
    }

    pub fn show_panel(&self, panel: AuthPanel) {
        self.state.auth.set_panel(panel);
        self.state.notify_changes();
    }

    pub fn login(&self) {
        let auth = self.state.auth.clone();
        let nombre = auth.login_nombre.borrow().trim().to_string();
        let contrasena = auth.login_contrasena.borrow().clone();
        if nombre.is_empty() || contrasena.is_empty() {
            self.fail("Usuario y contraseña son obligatorios");
            return;
        }
        if !self.begin() {
            return;
        }

        let state = self.state.clone();
        let api = self.api_client.clone();
        spawn_local(async move {
            let message = match api.login(&LoginRequest::new(&nombre, &contrasena)).await {
                Ok(response) => match response.token {
                    Some(token) => match state.session.establish(&token) {
                        Ok(session) => {
                            log::info!("✅ [AUTH] Sesión iniciada para {:?}", session.user_name);
                            auth.clear_credentials();
                            Message::success(
                                response
                                    .mensaje
                                    .unwrap_or_else(|| "Inicio de sesión exitoso".to_string()),
                            )
                        }
                        Err(e) => Message::error(e),
                    },
                    None => Message::error("El servidor no devolvió un token"),
                },
                Err(e) => {
                    log::warn!("⚠️ [AUTH] Login rechazado: {}", e);
                    Message::error(e.user_message())
                }
            };
            *auth.loading.borrow_mut() = false;
            auth.set_message(message);
            state.notify_route(Route::Auth);
        });
    }

    pub fn signup(&self) {
        let auth = self.state.auth.clone();
        let request = SignupRequest {
            nombre: auth.signup_nombre.borrow().trim().to_string(),
            contrasena: auth.signup_contrasena.borrow().clone(),
            roles: auth.signup_roles.borrow().trim().to_string(),
        };
        if request.nombre.is_empty() || request.contrasena.is_empty() {
            self.fail("Usuario y contraseña son obligatorios");
            return;
        }
        if !self.begin() {
            return;
        }

        let state = self.state.clone();
        let api = self.api_client.clone();
        spawn_local(async move {
            match api.signup(&request).await {
                Ok(response) => {
                    log::info!("📝 [AUTH] Usuario registrado: {}", request.nombre);
                    *auth.login_nombre.borrow_mut() = request.nombre.clone();
                    auth.clear_credentials();
                    auth.set_panel(AuthPanel::Login);
                    auth.set_message(Message::success(
                        response
                            .mensaje
                            .unwrap_or_else(|| "Usuario creado, ya puedes iniciar sesión".to_string()),
                    ));
                }
                Err(e) => auth.set_message(Message::error(e.user_message())),
            }
            *auth.loading.borrow_mut() = false;
            state.notify_route(Route::Auth);
        });
    }

    pub fn logout(&self) {
        log::info!("👋 [AUTH] Cerrando sesión");
        *self.state.auth.last_signature.borrow_mut() = None;
        *self.state.auth.last_validation.borrow_mut() = None;
        self.state.auth.set_panel(AuthPanel::Login);
        self.state.auth.set_message(Message::info("Sesión cerrada"));
        // logout notifica vía la sesión
        self.state.session.logout();
    }

    /// Rellena el payload de firma con el payload de negocio de ejemplo
    pub fn fill_example_payload(&self) {
        let usuario_id = self
            .state
            .session
            .get()
            .user_id
            .unwrap_or(SubjectId::Numero(1));
        let payload = build_business_payload(&ConfirmationData::default(), &usuario_id, EXAMPLE_ENTREGA_ID);
        *self.state.auth.sign_payload_text.borrow_mut() =
            serde_json::to_string_pretty(&payload).unwrap_or_default();
        self.state.notify_changes();
    }

    pub fn sign(&self) {
        let auth = self.state.auth.clone();
        let token = match self.state.session.token() {
            Some(token) => token,
            None => return self.fail("Debes iniciar sesión para firmar"),
        };
        let payload = match parse_payload(&auth.sign_payload_text.borrow()) {
            Ok(payload) => payload,
            Err(e) => return self.fail(e),
        };
        if !self.begin() {
            return;
        }

        let state = self.state.clone();
        let api = self.api_client.clone();
        spawn_local(async move {
            match api.sign_data(&token, &payload).await {
                Ok(signature) => {
                    log::info!("🔐 [AUTH] Payload firmado");
                    *auth.last_signature.borrow_mut() = Some(signature);
                    auth.set_message(Message::success("Payload firmado"));
                }
                Err(e) => auth.set_message(Message::error(e.user_message())),
            }
            *auth.loading.borrow_mut() = false;
            state.notify_route(Route::Auth);
        });
    }

    pub fn use_last_signature(&self) {
        if !self.state.auth.use_last_signature() {
            self.state.auth.set_message(Message::error("Todavía no hay ninguna firma"));
        }
        self.state.notify_changes();
    }

    pub fn validate(&self) {
        let auth = self.state.auth.clone();
        let token = match self.state.session.token() {
            Some(token) => token,
            None => return self.fail("Debes iniciar sesión para validar"),
        };
        let payload = match parse_payload(&auth.validate_payload_text.borrow()) {
            Ok(payload) => payload,
            Err(e) => return self.fail(e),
        };
        let firma = auth.validate_firma.borrow().trim().to_string();
        if firma.is_empty() {
            return self.fail("La firma es obligatoria");
        }
        if !self.begin() {
            return;
        }

        let state = self.state.clone();
        let api = self.api_client.clone();
        spawn_local(async move {
            match api.validate_signature(&token, &payload, &firma).await {
                Ok(validation) => {
                    let message = if validation.firma_valida {
                        Message::success("La firma es válida")
                    } else {
                        Message::error("La firma NO es válida")
                    };
                    *auth.last_validation.borrow_mut() = Some(validation);
                    auth.set_message(message);
                }
                Err(e) => auth.set_message(Message::error(e.user_message())),
            }
            *auth.loading.borrow_mut() = false;
            state.notify_route(Route::Auth);
        });
    }
}
