// ============================================================================
// SHARED VIEW HELPERS - Mensajes, botones y campos de formulario
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{on_click, on_input_value, ElementBuilder};
use crate::state::Message;

/// Alert Bootstrap para un mensaje (o un contenedor vacío)
pub fn render_message(message: Option<&Message>) -> Result<Element, JsValue> {
    match message {
        Some(message) => Ok(ElementBuilder::new("div")?
            .class(message.css_class())
            .attr("role", "alert")?
            .text(&message.text)
            .build()),
        None => Ok(ElementBuilder::new("div")?.class("alert-placeholder").build()),
    }
}

/// Botón con click handler
pub fn render_button<F>(label: &str, class: &str, disabled: bool, handler: F) -> Result<Element, JsValue>
where
    F: FnMut() + 'static,
{
    let button = ElementBuilder::new("button")?
        .class(class)
        .attr("type", "button")?
        .flag("disabled", disabled)?
        .text(label)
        .build();
    let mut handler = handler;
    on_click(&button, move |_| handler())?;
    Ok(button)
}

/// Botón de submit dentro de un form
pub fn render_submit(label: &str, loading: bool) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("button")?
        .class("btn btn-primary")
        .attr("type", "submit")?
        .flag("disabled", loading)?
        .text(if loading { "Procesando..." } else { label })
        .build())
}

/// Campo con label; cada input escribe en `value`
pub fn render_field(
    label: &str,
    input_type: &str,
    placeholder: &str,
    value: Rc<RefCell<String>>,
) -> Result<Element, JsValue> {
    let builder = if input_type == "textarea" {
        ElementBuilder::new("textarea")?
            .class("form-control font-monospace")
            .attr("rows", "10")?
    } else {
        ElementBuilder::new("input")?
            .class("form-control")
            .attr("type", input_type)?
    };
    let input = builder
        .attr("placeholder", placeholder)?
        .value(&value.borrow())
        .build();

    on_input_value(&input, move |text| {
        *value.borrow_mut() = text;
    })?;

    ElementBuilder::new("div")?
        .class("mb-3")
        .child(ElementBuilder::new("label")?.class("form-label").text(label).build())?
        .child(input)
        .map(|b| b.build())
}

/// Bloque `<pre>` con JSON formateado
pub fn render_json(value: &serde_json::Value) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("pre")?
        .class("json-block")
        .text(&serde_json::to_string_pretty(value).unwrap_or_default())
        .build())
}

/// Fila "clave: valor" de una lista de detalles
pub fn render_detail(label: &str, value: &str) -> Result<Element, JsValue> {
    ElementBuilder::new("div")?
        .class("detail-row")
        .child(ElementBuilder::new("strong")?.text(&format!("{}: ", label)).build())?
        .child(ElementBuilder::new("span")?.text(value).build())
        .map(|b| b.build())
}
