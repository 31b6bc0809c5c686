// ============================================================================
// ENTREGAS STATE - Listado + formulario de creación
// ============================================================================

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::models::{Entrega, TareaResponse};
use crate::state::Message;

#[derive(Clone)]
pub struct EntregasState {
    pub items: Rc<RefCell<Vec<Entrega>>>,
    pub loading: Rc<RefCell<bool>>,
    pub creating: Rc<RefCell<bool>>,
    /// Entregas con una petición de procesamiento en vuelo
    pub processing: Rc<RefCell<HashSet<i64>>>,
    pub form_direccion: Rc<RefCell<String>>,
    pub form_pedido_id: Rc<RefCell<String>>,
    pub message: Rc<RefCell<Option<Message>>>,
}

impl EntregasState {
    pub fn new() -> Self {
        Self {
            items: Rc::new(RefCell::new(Vec::new())),
            loading: Rc::new(RefCell::new(false)),
            creating: Rc::new(RefCell::new(false)),
            processing: Rc::new(RefCell::new(HashSet::new())),
            form_direccion: Rc::new(RefCell::new(String::new())),
            form_pedido_id: Rc::new(RefCell::new(String::new())),
            message: Rc::new(RefCell::new(None)),
        }
    }

    pub fn set_message(&self, message: Message) {
        *self.message.borrow_mut() = Some(message);
    }

    /// Inserta la entrega recién creada al principio del listado
    pub fn add_created(&self, entrega: Entrega) {
        self.items.borrow_mut().insert(0, entrega);
        self.form_direccion.borrow_mut().clear();
        self.form_pedido_id.borrow_mut().clear();
    }

    /// Guarda task_id/estado devueltos por la cola. Devuelve false si la entrega ya no está.
    pub fn record_task(&self, entrega_id: i64, response: &TareaResponse) -> bool {
        let mut items = self.items.borrow_mut();
        match items.iter_mut().find(|e| e.id == entrega_id) {
            Some(entrega) => {
                entrega.task_id = response.task_id.clone();
                if let Some(estado) = &response.estado {
                    entrega.estado = Some(estado.clone());
                }
                true
            }
            None => false,
        }
    }

    pub fn is_processing(&self, entrega_id: i64) -> bool {
        self.processing.borrow().contains(&entrega_id)
    }

    /// Valida el formulario de creación: (direccion, pedido_id) sin espacios sobrantes
    pub fn form_values(&self) -> Result<(String, String), String> {
        let direccion = self.form_direccion.borrow().trim().to_string();
        let pedido_id = self.form_pedido_id.borrow().trim().to_string();
        if direccion.is_empty() || pedido_id.is_empty() {
            return Err("Dirección y pedido son obligatorios".to_string());
        }
        Ok((direccion, pedido_id))
    }
}

impl Default for EntregasState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entrega(id: i64) -> Entrega {
        Entrega {
            id,
            direccion: format!("Calle {}", id),
            pedido_id: None,
            estado: Some("PENDIENTE".to_string()),
            tiempo_entrega: None,
            task_id: None,
        }
    }

    #[test]
    fn test_record_task() {
        let state = EntregasState::new();
        *state.items.borrow_mut() = vec![entrega(1), entrega(2)];
        let response = TareaResponse {
            task_id: Some("abc".to_string()),
            estado: Some("EN_COLA".to_string()),
            message: None,
        };
        assert!(state.record_task(2, &response));
        assert!(!state.record_task(9, &response));

        let items = state.items.borrow();
        assert_eq!(items[1].task_id.as_deref(), Some("abc"));
        assert_eq!(items[1].estado.as_deref(), Some("EN_COLA"));
        assert_eq!(items[0].task_id, None);
    }

    #[test]
    fn test_form_values_and_add_created() {
        let state = EntregasState::new();
        assert!(state.form_values().is_err());

        *state.form_direccion.borrow_mut() = "  Calle 9 ".to_string();
        *state.form_pedido_id.borrow_mut() = "PED-9".to_string();
        assert_eq!(
            state.form_values().unwrap(),
            ("Calle 9".to_string(), "PED-9".to_string())
        );

        *state.items.borrow_mut() = vec![entrega(1)];
        state.add_created(entrega(2));
        assert_eq!(state.items.borrow()[0].id, 2);
        assert!(state.form_direccion.borrow().is_empty());
    }
}
