// ============================================================================
// NAVIGATION - Barra superior con rutas, menú colapsable y sesión
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, ElementBuilder};
use crate::state::{AppState, Route};
use crate::viewmodels::AuthViewModel;
use crate::views::shared::render_button;

pub fn render_navigation(state: &AppState) -> Result<Element, JsValue> {
    let current = state.current_route();
    let menu_open = *state.menu_open.borrow();

    let brand = ElementBuilder::new("a")?
        .class("navbar-brand")
        .attr("href", &Route::default().hash())?
        .text("🚚 Entregas")
        .build();

    let toggle = {
        let state = state.clone();
        render_button("☰", "navbar-toggler", false, move || state.toggle_menu())?
    };
    toggle.set_attribute("aria-expanded", if menu_open { "true" } else { "false" })?;

    let links = ElementBuilder::new("ul")?.class("navbar-nav me-auto").build();
    for route in Route::ALL {
        let class = if route == current { "nav-link active" } else { "nav-link" };
        let mut link = ElementBuilder::new("a")?
            .class(class)
            .attr("href", &route.hash())?
            .attr("title", route.description())?
            .text(&format!("{} {}", route.icon(), route.title()));
        if route == current {
            link = link.attr("aria-current", "page")?;
        }
        let item = ElementBuilder::new("li")?
            .class("nav-item")
            .child(link.build())?
            .build();
        append_child(&links, &item)?;
    }

    let collapse = ElementBuilder::new("div")?
        .class(if menu_open { "navbar-collapse collapse show" } else { "navbar-collapse collapse" })
        .child(links)?
        .child(render_session_badge(state)?)?
        .build();

    let inner = ElementBuilder::new("div")?
        .class("container-fluid")
        .child(brand)?
        .child(toggle)?
        .child(collapse)?
        .build();

    Ok(ElementBuilder::new("nav")?
        .class("navbar navbar-expand-lg navbar-dark bg-dark")
        .child(inner)?
        .build())
}

fn render_session_badge(state: &AppState) -> Result<Element, JsValue> {
    let badge = ElementBuilder::new("div")?.class("navbar-text session-badge").build();

    if state.session.is_logged_in() {
        let text = match state.session.user() {
            Some(user) if user.roles.is_empty() => format!("{} #{}", user.nombre, user.id),
            Some(user) => format!("{} #{} ({})", user.nombre, user.id, user.roles.join(", ")),
            None => "Sesión sin usuario".to_string(),
        };
        let icon = if state.session.has_role("admin") { "👑" } else { "👤" };
        let label = ElementBuilder::new("span")?
            .class("me-2")
            .text(&format!("{} {}", icon, text))
            .build();
        let vm = AuthViewModel::new(state);
        let logout = render_button("Salir", "btn btn-sm btn-outline-light", false, move || vm.logout())?;
        append_child(&badge, &label)?;
        append_child(&badge, &logout)?;
    } else {
        let login = ElementBuilder::new("a")?
            .class("btn btn-sm btn-outline-light")
            .attr("href", &Route::Auth.hash())?
            .text("Iniciar sesión")
            .build();
        append_child(&badge, &login)?;
    }
    Ok(badge)
}
