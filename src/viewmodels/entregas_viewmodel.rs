// ============================================================================
// ENTREGAS VIEWMODEL - Listado, creación y procesamiento
// ============================================================================

use wasm_bindgen_futures::spawn_local;

use crate::models::{NuevaEntrega, TareaRequest};
use crate::services::{ApiClient, GatewayApi};
use crate::state::{AppState, Message, Route};

#[derive(Clone)]
pub struct EntregasViewModel {
    state: AppState,
    api_client: ApiClient,
}

impl EntregasViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            api_client: ApiClient::new(),
        }
    }

    pub fn load(&self) {
        let entregas = self.state.entregas.clone();
        if *entregas.loading.borrow() {
            return;
        }
        *entregas.loading.borrow_mut() = true;

        let state = self.state.clone();
        let api = self.api_client.clone();
        spawn_local(async move {
            match api.list_entregas().await {
                Ok(items) => {
                    log::info!("📦 [ENTREGAS] {} entregas cargadas", items.len());
                    *entregas.items.borrow_mut() = items;
                }
                Err(e) => {
                    log::error!("❌ [ENTREGAS] Error cargando entregas: {}", e);
                    entregas.set_message(Message::error(format!(
                        "No se pudieron cargar las entregas: {}",
                        e.user_message()
                    )));
                }
            }
            *entregas.loading.borrow_mut() = false;
            state.notify_route(Route::Entregas);
        });
    }

    pub fn create(&self) {
        let entregas = self.state.entregas.clone();
        let (direccion, pedido_id) = match entregas.form_values() {
            Ok(values) => values,
            Err(e) => {
                entregas.set_message(Message::error(e));
                self.state.notify_changes();
                return;
            }
        };
        *entregas.creating.borrow_mut() = true;
        self.state.notify_changes();

        let state = self.state.clone();
        let api = self.api_client.clone();
        spawn_local(async move {
            let nueva = NuevaEntrega::pendiente(&direccion, &pedido_id);
            match api.create_entrega(&nueva).await {
                Ok(entrega) => {
                    entregas.set_message(Message::success(format!("Entrega {} creada", entrega.id)));
                    entregas.add_created(entrega);
                }
                Err(e) => {
                    log::error!("❌ [ENTREGAS] Error creando entrega: {}", e);
                    entregas.set_message(Message::error(e.user_message()));
                }
            }
            *entregas.creating.borrow_mut() = false;
            state.notify_route(Route::Entregas);
        });
    }

    /// Encola `procesar_entrega` y guarda el task_id devuelto
    pub fn process(&self, entrega_id: i64) {
        let entregas = self.state.entregas.clone();
        if !entregas.processing.borrow_mut().insert(entrega_id) {
            return;
        }
        self.state.notify_changes();

        let token = self.state.session.token();
        let state = self.state.clone();
        let api = self.api_client.clone();
        spawn_local(async move {
            let tarea = TareaRequest::procesar_entrega(entrega_id);
            match api.enqueue_tarea(token.as_deref(), &tarea).await {
                Ok(response) => {
                    log::info!("⚙️ [ENTREGAS] Tarea encolada: {:?}", response.task_id);
                    entregas.record_task(entrega_id, &response);
                    let text = match &response.task_id {
                        Some(task_id) => format!("Entrega {} en proceso (tarea {})", entrega_id, task_id),
                        None => format!("Entrega {} enviada a procesar", entrega_id),
                    };
                    entregas.set_message(Message::success(text));
                }
                Err(e) => {
                    log::error!("❌ [ENTREGAS] Error procesando entrega {}: {}", entrega_id, e);
                    entregas.set_message(Message::error(e.user_message()));
                }
            }
            entregas.processing.borrow_mut().remove(&entrega_id);
            state.notify_route(Route::Entregas);
        });
    }
}
