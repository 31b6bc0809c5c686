// ============================================================================
// SECURITY VIEW - Tarjetas de pruebas de cifrado e integridad
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, ElementBuilder};
use crate::models::{EncryptionReport, IntegrityReport, SecurityTest, TestResult, TestStatus};
use crate::state::AppState;
use crate::utils::{format_time, short_signature};
use crate::viewmodels::SecurityViewModel;
use crate::views::shared::{render_button, render_detail, render_json, render_message};

pub fn render_security(state: &AppState) -> Result<Element, JsValue> {
    let vm = SecurityViewModel::new(state);

    let grid = ElementBuilder::new("div")?.class("row security-tests").build();
    for test in state.security.tests.borrow().iter() {
        let col = ElementBuilder::new("div")?
            .class("col-md-6 mb-4")
            .child(render_test_card(test, &vm)?)?
            .build();
        append_child(&grid, &col)?;
    }

    ElementBuilder::new("div")?
        .class("security-view")
        .child(render_message(state.security.message.borrow().as_ref())?)?
        .child(grid)
        .map(|b| b.build())
}

fn render_test_card(test: &SecurityTest, vm: &SecurityViewModel) -> Result<Element, JsValue> {
    let badge = ElementBuilder::new("span")?
        .class(&format!("badge bg-{}", test.status.css_class()))
        .text(&format!("{} {:?}", test.status.icon(), test.status))
        .build();

    let header = ElementBuilder::new("div")?
        .class("card-header d-flex justify-content-between")
        .child(ElementBuilder::new("strong")?.text(&test.name).build())?
        .child(badge)?
        .build();

    let body = ElementBuilder::new("div")?
        .class("card-body")
        .child(ElementBuilder::new("p")?.class("text-muted").text(&test.description).build())?
        .build();

    let actions = ElementBuilder::new("div")?.class("mb-3").build();
    let running = test.status == TestStatus::Running;
    let run = {
        let vm = vm.clone();
        let id = test.id.clone();
        render_button(
            if running { "Ejecutando..." } else { "▶️ Ejecutar" },
            "btn btn-primary me-2",
            test.status != TestStatus::Pending,
            move || vm.run(&id),
        )?
    };
    append_child(&actions, &run)?;
    if test.status.is_terminal() {
        let vm = vm.clone();
        let id = test.id.clone();
        let reset = render_button("↩️ Reiniciar", "btn btn-outline-secondary", false, move || vm.reset(&id))?;
        append_child(&actions, &reset)?;
    }
    append_child(&body, &actions)?;

    if let Some(ts) = &test.timestamp {
        append_child(&body, &render_detail("Ejecutado", &format_time(ts))?)?;
    }

    match &test.result {
        Some(TestResult::Encryption(report)) => append_child(&body, &render_encryption(report)?)?,
        Some(TestResult::Integrity(report)) => append_child(&body, &render_integrity(report)?)?,
        Some(TestResult::Error { message }) => append_child(
            &body,
            &ElementBuilder::new("div")?.class("alert alert-danger").text(message).build(),
        )?,
        None => {}
    }

    ElementBuilder::new("div")?
        .class("card h-100")
        .child(header)?
        .child(body)
        .map(|b| b.build())
}

fn render_encryption(report: &EncryptionReport) -> Result<Element, JsValue> {
    let verdict = if report.is_valid {
        "🔒 Los datos se almacenan cifrados"
    } else {
        "⚠️ Los datos se almacenan en texto plano"
    };
    ElementBuilder::new("div")?
        .class("test-result")
        .child(render_detail("Original", &report.original_data)?)?
        .child(render_detail("En BD", &report.encrypted_data)?)?
        .child(render_detail("Descifrado", &report.decrypted_data)?)?
        .child(ElementBuilder::new("p")?.class("fw-bold mt-2").text(verdict).build())
        .map(|b| b.build())
}

fn render_integrity(report: &IntegrityReport) -> Result<Element, JsValue> {
    let result = ElementBuilder::new("div")?
        .class("test-result")
        .child(render_detail("Entrega", &report.entrega_id.to_string())?)?
        .child(render_detail("Firma original", &short_signature(&report.original_signature))?)?
        .child(render_detail("Firma alterada", &short_signature(&report.altered_signature))?)?
        .build();

    let list = ElementBuilder::new("ul")?.class("list-group my-2").build();
    for sub_test in report.sub_tests() {
        let status = sub_test
            .http_status
            .map(|s| format!(" [HTTP {}]", s))
            .unwrap_or_default();
        let item = ElementBuilder::new("li")?
            .class(if sub_test.passed { "list-group-item list-group-item-success" } else { "list-group-item list-group-item-danger" })
            .text(&format!(
                "{} {}: {}{}",
                if sub_test.passed { "✅" } else { "❌" },
                sub_test.name,
                sub_test.reason,
                status
            ))
            .build();
        append_child(&list, &item)?;
    }
    append_child(&result, &list)?;

    let failed = report.failed_cases();
    if !failed.is_empty() {
        let names: Vec<&str> = failed.iter().map(|t| t.name.as_str()).collect();
        append_child(
            &result,
            &ElementBuilder::new("p")?
                .class("text-danger")
                .text(&format!("Casos fallidos: {}", names.join(", ")))
                .build(),
        )?;
    }

    append_child(&result, &ElementBuilder::new("h6")?.text("Payload alterado").build())?;
    append_child(&result, &render_json(&report.altered_payload)?)?;
    Ok(result)
}
