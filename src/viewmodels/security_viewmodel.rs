// ============================================================================
// SECURITY VIEWMODEL - Ejecuta las pruebas de cifrado e integridad
// ============================================================================

use gloo_timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;

use crate::config::CONFIG;
use crate::models::{TestResult, TestType};
use crate::services::encryption_check::run_encryption_check;
use crate::services::entrega_flow::ConfirmationData;
use crate::services::integrity_check::run_integrity_check;
use crate::services::ApiClient;
use crate::state::{AppState, Message, Route};
use crate::utils::now_iso;

#[derive(Clone)]
pub struct SecurityViewModel {
    state: AppState,
    api_client: ApiClient,
}

impl SecurityViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            api_client: ApiClient::new(),
        }
    }

    /// Mensaje que se borra solo tras `message_timeout_ms`
    pub fn show_message(&self, message: Message) {
        let security = self.state.security.clone();
        *security.message.borrow_mut() = Some(message);

        let state = self.state.clone();
        let message_slot = security.message.clone();
        let timer = Timeout::new(CONFIG.message_timeout_ms, move || {
            *message_slot.borrow_mut() = None;
            state.notify_route(Route::SecurityValidation);
        });
        // Reemplazar el timer anterior lo cancela
        *security.message_timer.borrow_mut() = Some(timer);
    }

    pub fn run(&self, test_id: &str) {
        let test_type = match self.state.security.start(test_id) {
            Ok(test_type) => test_type,
            Err(e) => {
                log::warn!("⚠️ [SECURITY] {}", e);
                return;
            }
        };
        log::info!("🛡️ [SECURITY] Ejecutando {}", test_id);
        self.state.notify_changes();

        let vm = self.clone();
        let test_id = test_id.to_string();
        spawn_local(async move {
            let data = ConfirmationData::default();
            let (passed, result) = match test_type {
                TestType::Encryption => match run_encryption_check(&vm.api_client, &data).await {
                    Ok(report) => (report.is_valid, TestResult::Encryption(report)),
                    Err(e) => (false, TestResult::Error { message: e.user_message() }),
                },
                TestType::Integrity => match run_integrity_check(&vm.api_client, &data).await {
                    Ok(report) => (report.is_valid, TestResult::Integrity(report)),
                    Err(e) => (false, TestResult::Error { message: e.to_string() }),
                },
            };

            let name = vm
                .state
                .security
                .get(&test_id)
                .map(|t| t.name)
                .unwrap_or_else(|| test_id.clone());
            if let Err(e) = vm.state.security.finish(&test_id, passed, result, now_iso()) {
                log::error!("❌ [SECURITY] {}", e);
            }

            let message = if passed {
                log::info!("✅ [SECURITY] {} superada", name);
                Message::success(format!("{}: prueba superada", name))
            } else {
                log::warn!("❌ [SECURITY] {} fallida", name);
                Message::error(format!("{}: prueba fallida", name))
            };
            vm.show_message(message);
            vm.state.notify_route(Route::SecurityValidation);
        });
    }

    pub fn reset(&self, test_id: &str) {
        if let Err(e) = self.state.security.reset(test_id) {
            log::warn!("⚠️ [SECURITY] {}", e);
        }
        self.state.notify_changes();
    }
}
