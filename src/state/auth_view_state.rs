// ============================================================================
// AUTH VIEW STATE - Formularios de login/registro/firma/validación
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::models::{SignatureResponse, ValidationResponse};
use crate::state::Message;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthPanel {
    #[default]
    Login,
    Signup,
    Signature,
    Validation,
}

impl AuthPanel {
    pub const ALL: [AuthPanel; 4] = [
        AuthPanel::Login,
        AuthPanel::Signup,
        AuthPanel::Signature,
        AuthPanel::Validation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AuthPanel::Login => "Iniciar sesión",
            AuthPanel::Signup => "Registrarse",
            AuthPanel::Signature => "Firmar payload",
            AuthPanel::Validation => "Validar firma",
        }
    }

    /// Firmar y validar necesitan un token
    pub fn requires_session(&self) -> bool {
        matches!(self, AuthPanel::Signature | AuthPanel::Validation)
    }
}

/// Texto de payload -> JSON. Solo se aceptan objetos.
pub fn parse_payload(text: &str) -> Result<Value, String> {
    if text.trim().is_empty() {
        return Err("El payload está vacío".to_string());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err("El payload debe ser un objeto JSON".to_string()),
        Err(e) => Err(format!("JSON inválido: {}", e)),
    }
}

#[derive(Clone)]
pub struct AuthViewState {
    pub panel: Rc<RefCell<AuthPanel>>,

    pub login_nombre: Rc<RefCell<String>>,
    pub login_contrasena: Rc<RefCell<String>>,

    pub signup_nombre: Rc<RefCell<String>>,
    pub signup_contrasena: Rc<RefCell<String>>,
    pub signup_roles: Rc<RefCell<String>>,

    pub sign_payload_text: Rc<RefCell<String>>,
    pub last_signature: Rc<RefCell<Option<SignatureResponse>>>,

    pub validate_payload_text: Rc<RefCell<String>>,
    pub validate_firma: Rc<RefCell<String>>,
    pub last_validation: Rc<RefCell<Option<ValidationResponse>>>,

    pub loading: Rc<RefCell<bool>>,
    pub message: Rc<RefCell<Option<Message>>>,
}

impl AuthViewState {
    pub fn new() -> Self {
        Self {
            panel: Rc::new(RefCell::new(AuthPanel::default())),
            login_nombre: Rc::new(RefCell::new(String::new())),
            login_contrasena: Rc::new(RefCell::new(String::new())),
            signup_nombre: Rc::new(RefCell::new(String::new())),
            signup_contrasena: Rc::new(RefCell::new(String::new())),
            signup_roles: Rc::new(RefCell::new("user".to_string())),
            sign_payload_text: Rc::new(RefCell::new(String::new())),
            last_signature: Rc::new(RefCell::new(None)),
            validate_payload_text: Rc::new(RefCell::new(String::new())),
            validate_firma: Rc::new(RefCell::new(String::new())),
            last_validation: Rc::new(RefCell::new(None)),
            loading: Rc::new(RefCell::new(false)),
            message: Rc::new(RefCell::new(None)),
        }
    }

    pub fn set_panel(&self, panel: AuthPanel) {
        *self.panel.borrow_mut() = panel;
        *self.message.borrow_mut() = None;
    }

    pub fn set_message(&self, message: Message) {
        *self.message.borrow_mut() = Some(message);
    }

    /// Copia la última firma (y su payload devuelto) al panel de validación
    pub fn use_last_signature(&self) -> bool {
        let last = self.last_signature.borrow().clone();
        match last {
            Some(signature) => {
                *self.validate_payload_text.borrow_mut() =
                    serde_json::to_string_pretty(&signature.payload).unwrap_or_default();
                *self.validate_firma.borrow_mut() = signature.firma;
                *self.last_validation.borrow_mut() = None;
                self.set_panel(AuthPanel::Validation);
                true
            }
            None => false,
        }
    }

    pub fn clear_credentials(&self) {
        self.login_contrasena.borrow_mut().clear();
        self.signup_contrasena.borrow_mut().clear();
    }
}

impl Default for AuthViewState {
    fn default() -> Self {
        Self::new()
    }
}
