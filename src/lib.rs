// ============================================================================
// ENTREGAS PWA - FRONTEND MVVM (RUST PURO)
// ============================================================================
// - Views: funciones que construyen DOM (sin lógica)
// - ViewModels: lógica de UI
// - Services: comunicación con el API Gateway + pruebas de seguridad
// - State: Rc<RefCell> + notificaciones
// - Models: estructuras compartidas con el backend
// ============================================================================

mod app;
mod config;
mod dom;
mod models;
mod services;
mod state;
mod utils;
mod viewmodels;
mod views;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::config::CONFIG;
use crate::dom::{current_hash, on_window_event};

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let level = if CONFIG.enable_logging {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("🚀 [APP] Entregas PWA - gateway {}", CONFIG.api_gateway_url);

    let mut app = App::new()?;
    app.render()?;
    APP.with(|cell| *cell.borrow_mut() = Some(app));

    // Listener global: se registra una sola vez aquí
    on_window_event("hashchange", |_e| {
        APP.with(|cell| {
            if let Some(app) = cell.borrow_mut().as_mut() {
                if let Err(e) = app.navigate(&current_hash()) {
                    log::error!("❌ [APP] Error navegando: {:?}", e);
                }
            }
        });
    })?;

    Ok(())
}

/// Re-render completo de la app
pub fn rerender_app() {
    APP.with(|cell| match cell.try_borrow_mut() {
        Ok(mut app) => {
            if let Some(app) = app.as_mut() {
                if let Err(e) = app.render() {
                    log::error!("❌ [RERENDER] Error re-renderizando: {:?}", e);
                }
            }
        }
        Err(_) => log::warn!("⚠️ [RERENDER] App ocupada, render omitido"),
    });
}

/// Re-render llamable desde JavaScript
#[wasm_bindgen]
pub fn rerender_app_wasm() {
    rerender_app();
}
