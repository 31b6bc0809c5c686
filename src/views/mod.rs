// ============================================================================
// VIEWS - Funciones que construyen DOM a partir del estado (sin lógica)
// ============================================================================

pub mod auth;
pub mod entregas;
pub mod monitor;
pub mod navigation;
pub mod security;
pub mod shared;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::ElementBuilder;
use crate::state::{AppState, Route};

pub use auth::render_auth;
pub use entregas::render_entregas;
pub use monitor::render_monitor;
pub use navigation::render_navigation;
pub use security::render_security;

/// Shell completo: navegación + cabecera de página + vista de la ruta activa
pub fn render_app(state: &AppState) -> Result<Element, JsValue> {
    let route = state.current_route();

    let content = match route {
        Route::Monitor => render_monitor(state)?,
        Route::Auth => render_auth(state)?,
        Route::Entregas => render_entregas(state)?,
        Route::SecurityValidation => render_security(state)?,
    };

    let header = ElementBuilder::new("header")?
        .class("page-header mb-4")
        .child(
            ElementBuilder::new("h1")?
                .text(&format!("{} {}", route.icon(), route.title()))
                .build(),
        )?
        .child(
            ElementBuilder::new("p")?
                .class("text-muted")
                .text(route.description())
                .build(),
        )?
        .build();

    let main = ElementBuilder::new("main")?
        .class("container py-4")
        .child(header)?
        .child(content)?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("app-shell")
        .child(render_navigation(state)?)?
        .child(main)?
        .build())
}
