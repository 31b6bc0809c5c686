use serde::{Deserialize, Serialize};
use std::fmt;

/// `pedido_id` llega como entero desde la BD, pero los formularios envían texto
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PedidoId {
    Numero(i64),
    Texto(String),
}

impl fmt::Display for PedidoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PedidoId::Numero(n) => write!(f, "{}", n),
            PedidoId::Texto(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entrega {
    pub id: i64,
    #[serde(default)]
    pub direccion: String,
    #[serde(default)]
    pub pedido_id: Option<PedidoId>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub tiempo_entrega: Option<String>,
    /// Tarea de procesamiento encolada desde esta vista (solo local)
    #[serde(default, skip_serializing)]
    pub task_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NuevaEntrega {
    pub direccion: String,
    pub estado: String,
    pub pedido_id: String,
}

impl NuevaEntrega {
    /// Toda entrega nace PENDIENTE
    pub fn pendiente(direccion: &str, pedido_id: &str) -> Self {
        Self {
            direccion: direccion.to_string(),
            estado: "PENDIENTE".to_string(),
            pedido_id: pedido_id.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TareaRequest {
    pub tipo: String,
    pub entrega_id: i64,
}

impl TareaRequest {
    pub fn procesar_entrega(entrega_id: i64) -> Self {
        Self {
            tipo: "procesar_entrega".to_string(),
            entrega_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TareaResponse {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entrega_accepts_numeric_and_text_pedido() {
        let json = r#"[
            {"id": 1, "direccion": "Calle 1", "pedido_id": 42, "estado": "PENDIENTE", "tiempo_entrega": null},
            {"id": 2, "direccion": "Calle 2", "pedido_id": "PED-001", "estado": "ENTREGADA"}
        ]"#;
        let entregas: Vec<Entrega> = serde_json::from_str(json).unwrap();
        assert_eq!(entregas[0].pedido_id, Some(PedidoId::Numero(42)));
        assert_eq!(entregas[1].pedido_id, Some(PedidoId::Texto("PED-001".to_string())));
        assert!(entregas.iter().all(|e| e.task_id.is_none()));
    }

    #[test]
    fn test_task_id_is_not_sent_to_backend() {
        let entrega = Entrega {
            id: 7,
            direccion: "Calle 7".to_string(),
            pedido_id: None,
            estado: None,
            tiempo_entrega: None,
            task_id: Some("abc".to_string()),
        };
        let value = serde_json::to_value(&entrega).unwrap();
        assert!(value.get("task_id").is_none());
    }
}
