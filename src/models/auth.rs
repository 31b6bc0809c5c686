use serde::{Deserialize, Serialize};
use std::fmt;

/// Identificador de usuario: el autorizador lo emite como número,
/// pero se tolera string para no romper con otros emisores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubjectId {
    Numero(i64),
    Texto(String),
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectId::Numero(n) => write!(f, "{}", n),
            SubjectId::Texto(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: SubjectId,
    pub nombre: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub nombre: String,
    pub contrasena: String,
}

impl LoginRequest {
    pub fn new(nombre: &str, contrasena: &str) -> Self {
        Self {
            nombre: nombre.to_string(),
            contrasena: contrasena.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub mensaje: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub nombre: String,
    pub contrasena: String,
    pub roles: String,
}

/// El usuario creado viene como objeto libre: el backend no garantiza su forma
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub mensaje: Option<String>,
    #[serde(default)]
    pub usuario: Option<serde_json::Value>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SignRequest<'a> {
    pub payload: &'a serde_json::Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignatureResponse {
    /// Payload tal como lo firmó el autorizador (posiblemente normalizado)
    pub payload: serde_json::Value,
    pub firma: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidateRequest<'a> {
    pub payload: &'a serde_json::Value,
    pub firma: &'a str,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationResponse {
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
    #[serde(default)]
    pub firma: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    pub firma_valida: bool,
}
