// ============================================================================
// APP - Aplicación principal: estado, render y navegación
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{
    append_child, current_hash, get_element_by_id, set_inner_html, take_listeners, ListenerSet,
};
use crate::services::LocalTokenStorage;
use crate::state::{AppState, Route};
use crate::viewmodels::{EntregasViewModel, MonitorViewModel};
use crate::views::render_app;

/// Aplicación principal
pub struct App {
    state: AppState,
    root: Element,
    /// Listeners del árbol montado; se sustituyen en cada render
    listeners: ListenerSet,
}

impl App {
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id("app").ok_or_else(|| JsValue::from_str("No #app element found"))?;

        let state = AppState::new(Rc::new(LocalTokenStorage::new()));
        state.session.restore();
        state.set_route(Route::from_hash(&current_hash()));

        // Varios notify seguidos -> un solo re-render en el próximo tick
        let scheduled = Rc::new(Cell::new(false));
        state.subscribe_to_changes(move || {
            if scheduled.replace(true) {
                return;
            }
            let scheduled = scheduled.clone();
            Timeout::new(0, move || {
                scheduled.set(false);
                crate::rerender_app();
            })
            .forget();
        });

        let app = Self {
            state,
            root,
            listeners: ListenerSet::default(),
        };
        app.enter_route(app.state.current_route());
        Ok(app)
    }

    pub fn render(&mut self) -> Result<(), JsValue> {
        let route = self.state.current_route();
        log::debug!("🎬 [APP] Render de {}", route.path());

        self.sync_polling(route);

        set_inner_html(&self.root, "");
        let view = render_app(&self.state);
        let released = self.listeners.replace(take_listeners());
        log::debug!("🎬 [APP] {} listeners liberados", released);
        append_child(&self.root, &view?)
    }

    /// El polling del monitor solo vive mientras su vista está activa
    fn sync_polling(&self, route: Route) {
        let vm = MonitorViewModel::new(&self.state);
        if route == Route::Monitor {
            vm.start_polling();
        } else {
            vm.stop_polling();
        }
    }

    /// Efectos al entrar en una ruta
    fn enter_route(&self, route: Route) {
        if route == Route::Entregas {
            EntregasViewModel::new(&self.state).load();
        }
    }

    /// `hashchange`: cambia de ruta y re-renderiza
    pub fn navigate(&mut self, hash: &str) -> Result<(), JsValue> {
        let route = Route::from_hash(hash);
        let changed = self.state.set_route(route);
        if changed {
            log::info!("🧭 [APP] Navegando a {}", route.path());
            self.enter_route(route);
        }
        self.render()
    }
}
