// ============================================================================
// ENTREGAS VIEW - Formulario de creación + tabla con "Procesar"
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_submit, ElementBuilder};
use crate::models::Entrega;
use crate::state::AppState;
use crate::viewmodels::EntregasViewModel;
use crate::views::shared::{render_button, render_field, render_message, render_submit};

pub fn render_entregas(state: &AppState) -> Result<Element, JsValue> {
    let vm = EntregasViewModel::new(state);
    let entregas = &state.entregas;

    let refresh = {
        let vm = vm.clone();
        let loading = *entregas.loading.borrow();
        render_button(
            if loading { "Cargando..." } else { "🔄 Recargar" },
            "btn btn-outline-secondary mb-3",
            loading,
            move || vm.load(),
        )?
    };

    ElementBuilder::new("div")?
        .class("entregas-view")
        .child(render_message(entregas.message.borrow().as_ref())?)?
        .child(render_create_form(state, &vm)?)?
        .child(refresh)?
        .child(render_table(state, &vm)?)
        .map(|b| b.build())
}

fn render_create_form(state: &AppState, vm: &EntregasViewModel) -> Result<Element, JsValue> {
    let entregas = &state.entregas;
    let form = ElementBuilder::new("form")?
        .class("card card-body mb-4 entrega-form")
        .child(ElementBuilder::new("h5")?.text("Nueva entrega").build())?
        .child(render_field("Dirección", "text", "Calle 123 #45-67", entregas.form_direccion.clone())?)?
        .child(render_field("Pedido", "text", "PED-001", entregas.form_pedido_id.clone())?)?
        .child(render_submit("Crear entrega", *entregas.creating.borrow())?)?
        .build();

    let vm = vm.clone();
    on_submit(&form, move || vm.create())?;
    Ok(form)
}

fn render_table(state: &AppState, vm: &EntregasViewModel) -> Result<Element, JsValue> {
    let items = state.entregas.items.borrow();
    if items.is_empty() {
        return Ok(ElementBuilder::new("p")?
            .class("text-muted")
            .text("No hay entregas registradas")
            .build());
    }

    let head_row = ElementBuilder::new("tr")?.build();
    for title in ["ID", "Dirección", "Pedido", "Estado", "Tarea", ""] {
        append_child(&head_row, &ElementBuilder::new("th")?.text(title).build())?;
    }

    let body = ElementBuilder::new("tbody")?.build();
    for entrega in items.iter() {
        let processing = state.entregas.is_processing(entrega.id);
        append_child(&body, &render_row(entrega, processing, vm)?)?;
    }

    ElementBuilder::new("table")?
        .class("table table-striped entregas-table")
        .child(ElementBuilder::new("thead")?.child(head_row)?.build())?
        .child(body)
        .map(|b| b.build())
}

fn render_row(entrega: &Entrega, processing: bool, vm: &EntregasViewModel) -> Result<Element, JsValue> {
    let text_cell = |text: &str| -> Result<Element, JsValue> { Ok(ElementBuilder::new("td")?.text(text).build()) };

    let estado = entrega.estado.clone().unwrap_or_else(|| "-".to_string());
    let estado_cell = ElementBuilder::new("td")?
        .child(
            ElementBuilder::new("span")?
                .class(&format!("badge estado-{}", estado.to_lowercase()))
                .text(&estado)
                .build(),
        )?
        .build();

    let id = entrega.id;
    let vm = vm.clone();
    let process = render_button(
        if processing { "Procesando..." } else { "⚙️ Procesar" },
        "btn btn-sm btn-primary",
        processing,
        move || vm.process(id),
    )?;

    ElementBuilder::new("tr")?
        .child(text_cell(&entrega.id.to_string())?)?
        .child(text_cell(&entrega.direccion)?)?
        .child(text_cell(
            &entrega.pedido_id.as_ref().map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
        )?)?
        .child(estado_cell)?
        .child(text_cell(entrega.task_id.as_deref().unwrap_or("-"))?)?
        .child(ElementBuilder::new("td")?.child(process)?.build())
        .map(|b| b.build())
}
