// ============================================================================
// ENTREGA FLOW - Payload de confirmación firmado
// ============================================================================
// Crear entrega -> firmar payload de negocio -> confirmar con firma_payload.
// Lo usan la prueba de integridad y la demo del monitor.
// ============================================================================

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::models::{Entrega, NuevaEntrega, SubjectId};
use crate::services::api_client::{ApiError, Confirmation, GatewayApi};
use crate::services::token_codec::user_id_from_token;

/// Campo que transporta la firma dentro del cuerpo de confirmación
pub const SIGNATURE_FIELD: &str = "firma_payload";

/// Datos de negocio de la confirmación (fuera de los ids)
#[derive(Clone, Debug, PartialEq)]
pub struct ConfirmationData {
    pub direccion: String,
    pub nombre_recibe: String,
    pub firma_recibe: String,
    pub pedido_id: String,
}

impl Default for ConfirmationData {
    fn default() -> Self {
        Self {
            direccion: "Calle 123 #45-67, Bogotá".to_string(),
            nombre_recibe: "Juan Pérez".to_string(),
            firma_recibe: "Firma digital del receptor".to_string(),
            pedido_id: "PED-001".to_string(),
        }
    }
}

impl ConfirmationData {
    pub fn nueva_entrega(&self) -> NuevaEntrega {
        NuevaEntrega::pendiente(&self.direccion, &self.pedido_id)
    }
}

/// Payload exacto que valida el backend. El orden de campos no importa:
/// el autorizador canonicaliza antes de firmar.
pub fn build_business_payload(data: &ConfirmationData, usuario_id: &SubjectId, entrega_id: i64) -> Value {
    json!({
        "direccion": data.direccion,
        "nombre_recibe": data.nombre_recibe,
        "firma_recibe": data.firma_recibe,
        "pedido_id": data.pedido_id,
        "usuario_id": usuario_id,
        "entrega_id": entrega_id,
    })
}

/// `{...payload, firma_payload}`; None si el payload no es un objeto
pub fn confirmation_body(payload: &Value, firma: &str) -> Option<Value> {
    let mut body: Map<String, Value> = payload.as_object()?.clone();
    body.insert(SIGNATURE_FIELD.to_string(), Value::String(firma.to_string()));
    Some(Value::Object(body))
}

/// Payload y firma tal como los devolvió el autorizador
#[derive(Clone, Debug, PartialEq)]
pub struct SignedPayload {
    pub payload: Value,
    pub firma: String,
    pub timestamp: Option<String>,
}

/// Firma el payload y se queda con el payload devuelto (no el original)
pub async fn sign_payload<G: GatewayApi>(api: &G, token: &str, payload: &Value) -> Result<SignedPayload, ApiError> {
    let response = api.sign_data(token, payload).await?;
    Ok(SignedPayload {
        payload: response.payload,
        firma: response.firma,
        timestamp: response.timestamp,
    })
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowError {
    #[error("No se pudo crear la entrega: {0}")]
    Create(ApiError),
    #[error("No se pudo extraer usuario_id del token (sub.id)")]
    MissingSubjectId,
    #[error("Error generando firma: {0}")]
    Sign(ApiError),
    #[error("El autorizador devolvió un payload que no es un objeto JSON")]
    InvalidSignedPayload,
    #[error("Confirmación rechazada: {0}")]
    Confirm(ApiError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlowOutcome {
    pub entrega: Entrega,
    pub firma: String,
    pub confirmation: Confirmation,
}

/// Crea una entrega y la confirma con una firma real del autorizador
pub async fn create_and_confirm<G: GatewayApi>(
    api: &G,
    token: &str,
    data: &ConfirmationData,
) -> Result<FlowOutcome, FlowError> {
    let usuario_id = user_id_from_token(token).ok_or(FlowError::MissingSubjectId)?;

    let entrega = api
        .create_entrega(&data.nueva_entrega())
        .await
        .map_err(FlowError::Create)?;
    log::info!("📦 [FLOW] Entrega creada: {}", entrega.id);

    let payload = build_business_payload(data, &usuario_id, entrega.id);
    let signed = sign_payload(api, token, &payload)
        .await
        .map_err(FlowError::Sign)?;
    let body = confirmation_body(&signed.payload, &signed.firma).ok_or(FlowError::InvalidSignedPayload)?;

    let confirmation = api
        .confirm_entrega(entrega.id, token, &body)
        .await
        .map_err(FlowError::Confirm)?;
    log::info!("✅ [FLOW] Entrega {} confirmada ({})", entrega.id, confirmation.status);

    Ok(FlowOutcome {
        entrega,
        firma: signed.firma,
        confirmation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fake_gateway::FakeGateway;
    use futures::executor::block_on;

    #[test]
    fn test_business_payload_fields() {
        let payload = build_business_payload(&ConfirmationData::default(), &SubjectId::Numero(5), 9);
        let obj = payload.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["direccion", "entrega_id", "firma_recibe", "nombre_recibe", "pedido_id", "usuario_id"]
        );
        assert_eq!(obj["usuario_id"], json!(5));
        assert_eq!(obj["entrega_id"], json!(9));
    }

    #[test]
    fn test_confirmation_body_appends_signature() {
        let body = confirmation_body(&json!({"a": 1}), "abcd").unwrap();
        assert_eq!(body, json!({"a": 1, "firma_payload": "abcd"}));
        assert!(confirmation_body(&json!([1, 2]), "abcd").is_none());
    }

    #[test]
    fn test_create_and_confirm_against_enforcing_gateway() {
        let gateway = FakeGateway::new();
        let token = gateway.token_for_user(1);
        let outcome = block_on(create_and_confirm(&gateway, &token, &ConfirmationData::default())).unwrap();
        assert_eq!(outcome.entrega.id, 1);
        assert_eq!(outcome.confirmation.status, 200);
        assert_eq!(gateway.confirmed_ids(), vec![1]);
    }

    #[test]
    fn test_create_and_confirm_accepts_empty_success_body() {
        let gateway = FakeGateway::new().confirming_without_body();
        let token = gateway.token_for_user(1);
        let outcome = block_on(create_and_confirm(&gateway, &token, &ConfirmationData::default())).unwrap();
        assert_eq!(outcome.confirmation.status, 204);
        assert_eq!(outcome.confirmation.body, Value::Null);
    }

    #[test]
    fn test_create_and_confirm_requires_subject_id() {
        let gateway = FakeGateway::new();
        let result = block_on(create_and_confirm(&gateway, "a.b.c", &ConfirmationData::default()));
        assert_eq!(result.unwrap_err(), FlowError::MissingSubjectId);
        // Sin usuario no se crea nada
        assert!(gateway.calls().is_empty());
    }
}
