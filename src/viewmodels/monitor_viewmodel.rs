// ============================================================================
// MONITOR VIEWMODEL - Polling de ping + estado del servicio de logística
// ============================================================================
// Cada tick lanza dos peticiones independientes. Una falla no detiene la otra
// ni el polling. Soltar el Interval cancela el polling; las peticiones en
// vuelo terminan pero ya no re-renderizan fuera de la vista de monitor.
// ============================================================================

use gloo_timers::callback::Interval;
use wasm_bindgen_futures::spawn_local;

use crate::config::CONFIG;
use crate::services::entrega_flow::{create_and_confirm, ConfirmationData};
use crate::services::{ApiClient, GatewayApi};
use crate::state::{AppState, Message, Route};
use crate::utils::{now_iso, short_signature};

#[derive(Clone)]
pub struct MonitorViewModel {
    state: AppState,
    api_client: ApiClient,
}

impl MonitorViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            api_client: ApiClient::new(),
        }
    }

    /// Arranca el polling (idempotente) con un primer tick inmediato
    pub fn start_polling(&self) {
        if self.state.monitor.is_polling() {
            return;
        }
        log::info!(
            "📡 [MONITOR] Iniciando polling cada {} ms",
            CONFIG.monitor_poll_interval_ms
        );
        self.tick();

        let vm = self.clone();
        let interval = Interval::new(CONFIG.monitor_poll_interval_ms, move || vm.tick());
        *self.state.monitor.polling.borrow_mut() = Some(interval);
    }

    pub fn stop_polling(&self) {
        if self.state.monitor.polling.borrow_mut().take().is_some() {
            log::info!("⏹️ [MONITOR] Polling detenido");
        }
    }

    fn tick(&self) {
        self.ping_now();
        self.refresh_status();
    }

    pub fn ping_now(&self) {
        let monitor = self.state.monitor.clone();
        let state = self.state.clone();
        let api = self.api_client.clone();
        *monitor.ping_in_progress.borrow_mut() = true;

        spawn_local(async move {
            match api.ping_logistica().await {
                Ok(result) => {
                    log::debug!("🏓 [MONITOR] Ping {}: {}", result.status.as_str(), result.message);
                    monitor.record_ping(result, now_iso());
                }
                Err(e) => log::warn!("⚠️ [MONITOR] Ping falló: {}", e),
            }
            *monitor.ping_in_progress.borrow_mut() = false;
            state.notify_route(Route::Monitor);
        });
    }

    pub fn refresh_status(&self) {
        let monitor = self.state.monitor.clone();
        let state = self.state.clone();
        let api = self.api_client.clone();
        *monitor.status_in_progress.borrow_mut() = true;

        spawn_local(async move {
            match api.logistica_status().await {
                Ok(status) => monitor.record_status(status, now_iso()),
                Err(e) => log::warn!("⚠️ [MONITOR] Estado de logística no disponible: {}", e),
            }
            *monitor.status_in_progress.borrow_mut() = false;
            state.notify_route(Route::Monitor);
        });
    }

    pub fn clear_history(&self) {
        self.state.monitor.clear_history();
        self.state.notify_changes();
    }

    /// Demo: crear una entrega y confirmarla con una firma real
    pub fn run_demo(&self) {
        let monitor = self.state.monitor.clone();
        if *monitor.demo_running.borrow() {
            return;
        }
        let token = match self.state.session.token() {
            Some(token) => token,
            None => {
                *monitor.demo_message.borrow_mut() =
                    Some(Message::error("Inicia sesión para ejecutar la demo"));
                self.state.notify_changes();
                return;
            }
        };

        *monitor.demo_running.borrow_mut() = true;
        *monitor.demo_message.borrow_mut() = Some(Message::info("Creando y confirmando entrega..."));
        self.state.notify_changes();

        let state = self.state.clone();
        let api = self.api_client.clone();
        spawn_local(async move {
            let message = match create_and_confirm(&api, &token, &ConfirmationData::default()).await {
                Ok(outcome) => Message::success(format!(
                    "Entrega {} confirmada (firma {})",
                    outcome.entrega.id,
                    short_signature(&outcome.firma)
                )),
                Err(e) => {
                    log::error!("❌ [MONITOR] Demo falló: {}", e);
                    Message::error(e.to_string())
                }
            };
            *monitor.demo_message.borrow_mut() = Some(message);
            *monitor.demo_running.borrow_mut() = false;
            state.notify_route(Route::Monitor);
        });
    }
}
