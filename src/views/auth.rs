// ============================================================================
// AUTH VIEW - Login, registro, firma y validación de payloads
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_submit, ElementBuilder};
use crate::state::{AppState, AuthPanel};
use crate::utils::format_time;
use crate::viewmodels::AuthViewModel;
use crate::views::shared::{render_button, render_detail, render_field, render_json, render_message, render_submit};

pub fn render_auth(state: &AppState) -> Result<Element, JsValue> {
    let vm = AuthViewModel::new(state);
    let panel = *state.auth.panel.borrow();

    let content = if panel.requires_session() && !state.session.is_logged_in() {
        ElementBuilder::new("div")?
            .class("alert alert-warning")
            .text("Inicia sesión para firmar o validar payloads")
            .build()
    } else {
        match panel {
            AuthPanel::Login => render_login_panel(state, &vm)?,
            AuthPanel::Signup => render_signup_panel(state, &vm)?,
            AuthPanel::Signature => render_signature_panel(state, &vm)?,
            AuthPanel::Validation => render_validation_panel(state, &vm)?,
        }
    };

    ElementBuilder::new("div")?
        .class("auth-view")
        .child(render_tabs(panel, &vm)?)?
        .child(render_message(state.auth.message.borrow().as_ref())?)?
        .child(content)
        .map(|b| b.build())
}

fn render_tabs(current: AuthPanel, vm: &AuthViewModel) -> Result<Element, JsValue> {
    let tabs = ElementBuilder::new("ul")?.class("nav nav-tabs mb-3").build();
    for panel in AuthPanel::ALL {
        let vm = vm.clone();
        let class = if panel == current { "nav-link active" } else { "nav-link" };
        let link = render_button(panel.label(), class, false, move || vm.show_panel(panel))?;
        append_child(&tabs, &ElementBuilder::new("li")?.class("nav-item").child(link)?.build())?;
    }
    Ok(tabs)
}

fn render_login_panel(state: &AppState, vm: &AuthViewModel) -> Result<Element, JsValue> {
    let auth = &state.auth;
    let session = state.session.get();

    let form = ElementBuilder::new("form")?
        .class("card card-body auth-form")
        .child(render_field("Usuario", "text", "admin", auth.login_nombre.clone())?)?
        .child(render_field("Contraseña", "password", "••••••", auth.login_contrasena.clone())?)?
        .child(render_submit("Iniciar sesión", *auth.loading.borrow())?)?
        .build();
    let submit_vm = vm.clone();
    on_submit(&form, move || submit_vm.login())?;

    if session.is_logged_in() {
        let info = ElementBuilder::new("div")?
            .class("alert alert-info")
            .text(&format!(
                "Sesión activa: {} (id {})",
                session.user_name.unwrap_or_default(),
                session.user_id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string())
            ))
            .build();
        return ElementBuilder::new("div")?.child(info)?.child(form).map(|b| b.build());
    }
    Ok(form)
}

fn render_signup_panel(state: &AppState, vm: &AuthViewModel) -> Result<Element, JsValue> {
    let auth = &state.auth;
    let form = ElementBuilder::new("form")?
        .class("card card-body auth-form")
        .child(render_field("Usuario", "text", "nuevo_usuario", auth.signup_nombre.clone())?)?
        .child(render_field("Contraseña", "password", "••••••", auth.signup_contrasena.clone())?)?
        .child(render_field("Roles (separados por coma)", "text", "user", auth.signup_roles.clone())?)?
        .child(render_submit("Registrarse", *auth.loading.borrow())?)?
        .build();
    let vm = vm.clone();
    on_submit(&form, move || vm.signup())?;
    Ok(form)
}

fn render_signature_panel(state: &AppState, vm: &AuthViewModel) -> Result<Element, JsValue> {
    let auth = &state.auth;
    let example = {
        let vm = vm.clone();
        render_button("📋 Ejemplo", "btn btn-outline-secondary me-2", false, move || vm.fill_example_payload())?
    };

    let form = ElementBuilder::new("form")?
        .class("card card-body auth-form")
        .child(render_field("Payload (JSON)", "textarea", "{ ... }", auth.sign_payload_text.clone())?)?
        .child(
            ElementBuilder::new("div")?
                .child(example)?
                .child(render_submit("🔐 Firmar", *auth.loading.borrow())?)?
                .build(),
        )?
        .build();
    let submit_vm = vm.clone();
    on_submit(&form, move || submit_vm.sign())?;

    let container = ElementBuilder::new("div")?.child(form)?.build();

    if let Some(signature) = auth.last_signature.borrow().as_ref() {
        let use_it = {
            let vm = vm.clone();
            render_button("➡️ Usar para validar", "btn btn-outline-primary", false, move || vm.use_last_signature())?
        };
        let result = ElementBuilder::new("div")?
            .class("card card-body mt-3 signature-result")
            .child(ElementBuilder::new("h6")?.text("Firma generada").build())?
            .child(
                ElementBuilder::new("code")?
                    .class("signature d-block text-break mb-2")
                    .text(&signature.firma)
                    .build(),
            )?
            .build();
        if let Some(ts) = &signature.timestamp {
            append_child(&result, &render_detail("Timestamp", &format_time(ts))?)?;
        }
        append_child(&result, &ElementBuilder::new("h6")?.text("Payload firmado").build())?;
        append_child(&result, &render_json(&signature.payload)?)?;
        append_child(&result, &use_it)?;
        append_child(&container, &result)?;
    }
    Ok(container)
}

fn render_validation_panel(state: &AppState, vm: &AuthViewModel) -> Result<Element, JsValue> {
    let auth = &state.auth;
    let form = ElementBuilder::new("form")?
        .class("card card-body auth-form")
        .child(render_field("Payload (JSON)", "textarea", "{ ... }", auth.validate_payload_text.clone())?)?
        .child(render_field("Firma", "text", "hex", auth.validate_firma.clone())?)?
        .child(render_submit("✔️ Validar", *auth.loading.borrow())?)?
        .build();
    let vm = vm.clone();
    on_submit(&form, move || vm.validate())?;

    let container = ElementBuilder::new("div")?.child(form)?.build();

    if let Some(validation) = auth.last_validation.borrow().as_ref() {
        let (class, text) = if validation.firma_valida {
            ("alert alert-success mt-3", "✅ firma_valida: true")
        } else {
            ("alert alert-danger mt-3", "❌ firma_valida: false")
        };
        let result = ElementBuilder::new("div")?.class(class).text(text).build();
        append_child(&container, &result)?;
    }
    Ok(container)
}
