// ============================================================================
// MONITOR VIEW - Estado del servicio de logística + historial de pings
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{append_child, ElementBuilder};
use crate::models::{response_time_class, LogisticaStatus, PingResult};
use crate::state::AppState;
use crate::utils::{format_response_time, format_time};
use crate::viewmodels::MonitorViewModel;
use crate::views::shared::{render_button, render_detail, render_message};

pub fn render_monitor(state: &AppState) -> Result<Element, JsValue> {
    let vm = MonitorViewModel::new(state);

    ElementBuilder::new("div")?
        .class("monitor-view")
        .child(render_controls(state, &vm)?)?
        .child(render_status_card(state.monitor.status.borrow().as_ref())?)?
        .child(render_history(state)?)?
        .child(render_demo(state, &vm)?)
        .map(|b| b.build())
}

fn render_controls(state: &AppState, vm: &MonitorViewModel) -> Result<Element, JsValue> {
    let monitor = &state.monitor;
    let ping_busy = *monitor.ping_in_progress.borrow();
    let status_busy = *monitor.status_in_progress.borrow();

    let ping = {
        let vm = vm.clone();
        render_button(if ping_busy { "Ping..." } else { "🏓 Ping" }, "btn btn-primary me-2", ping_busy, move || vm.ping_now())?
    };
    let refresh = {
        let vm = vm.clone();
        render_button("🔄 Actualizar", "btn btn-secondary me-2", status_busy, move || vm.refresh_status())?
    };
    let clear = {
        let vm = vm.clone();
        render_button("🧹 Limpiar", "btn btn-outline-secondary me-2", monitor.history.borrow().is_empty(), move || vm.clear_history())?
    };

    let polling_text = if monitor.is_polling() {
        format!("Actualizando cada {} ms", CONFIG.monitor_poll_interval_ms)
    } else {
        "Polling detenido".to_string()
    };
    let last_update = match monitor.last_update.borrow().as_deref() {
        Some(ts) => format!("Última actualización: {}", format_time(ts)),
        None => "Sin datos todavía".to_string(),
    };

    ElementBuilder::new("div")?
        .class("monitor-controls d-flex align-items-center mb-3")
        .child(ping)?
        .child(refresh)?
        .child(clear)?
        .child(
            ElementBuilder::new("small")?
                .class("text-muted ms-3")
                .text(&format!("{} · {}", polling_text, last_update))
                .build(),
        )
        .map(|b| b.build())
}

fn render_status_card(status: Option<&LogisticaStatus>) -> Result<Element, JsValue> {
    let card = ElementBuilder::new("div")?.class("card mb-4 status-card").build();
    let body = ElementBuilder::new("div")?.class("card-body").build();
    append_child(&card, &body)?;

    let status = match status {
        Some(status) => status,
        None => {
            let empty = ElementBuilder::new("p")?
                .class("text-muted")
                .text("Esperando estado del servicio de logística...")
                .build();
            append_child(&body, &empty)?;
            return Ok(card);
        }
    };

    let overall = status.overall_status;
    let title = ElementBuilder::new("h5")?
        .class("card-title")
        .child(
            ElementBuilder::new("span")?
                .class(&format!("status-indicator {}", overall.css_class()))
                .build(),
        )?
        .child(
            ElementBuilder::new("span")?
                .text(&format!(" {} · {}", status.service, overall.text()))
                .build(),
        )?
        .build();
    append_child(&body, &title)?;

    if let Some(ts) = &status.last_check {
        append_child(&body, &render_detail("Última verificación", &format_time(ts))?)?;
    }

    if let Some(echo) = &status.ping_echo {
        append_child(
            &body,
            &render_detail(
                "Ping interno",
                &format!(
                    "{} {} ({})",
                    echo.status.icon(),
                    echo.status.label(),
                    format_response_time(echo.response_time_ms)
                ),
            )?,
        )?;
    }

    if let Some(broker) = &status.broker_status {
        let yes_no = |b: bool| if b { "✅ Sí" } else { "❌ No" };
        append_child(&body, &render_detail("Redis conectado", yes_no(broker.redis_connected))?)?;
        append_child(&body, &render_detail("Redis ping", yes_no(broker.redis_ping))?)?;

        let queues = broker.queue_list();
        if !queues.is_empty() {
            let list = ElementBuilder::new("ul")?.class("queue-list").build();
            for queue in queues {
                let item = ElementBuilder::new("li")?
                    .text(&format!("{}: {} tareas", queue.name, queue.count))
                    .build();
                append_child(&list, &item)?;
            }
            append_child(&body, &ElementBuilder::new("h6")?.text("Colas").build())?;
            append_child(&body, &list)?;
        }
    }

    if !status.recommendations.is_empty() {
        let list = ElementBuilder::new("ul")?.class("recommendations").build();
        for recommendation in &status.recommendations {
            append_child(&list, &ElementBuilder::new("li")?.text(recommendation).build())?;
        }
        append_child(&body, &ElementBuilder::new("h6")?.text("Recomendaciones").build())?;
        append_child(&body, &list)?;
    }

    Ok(card)
}

fn render_history(state: &AppState) -> Result<Element, JsValue> {
    let history = state.monitor.history.borrow();
    let section = ElementBuilder::new("section")?
        .class("ping-history mb-4")
        .child(
            ElementBuilder::new("h5")?
                .text(&format!("Historial de pings ({}/{})", history.len(), history.cap()))
                .build(),
        )?
        .build();

    if history.is_empty() {
        append_child(
            &section,
            &ElementBuilder::new("p")?.class("text-muted").text("Sin pings registrados").build(),
        )?;
        return Ok(section);
    }

    let head = ElementBuilder::new("thead")?
        .child(
            ElementBuilder::new("tr")?
                .children(
                    ["Hora", "Estado", "Mensaje", "Tiempo", "HTTP"]
                        .iter()
                        .map(|h| ElementBuilder::new("th").map(|b| b.text(h).build()))
                        .collect::<Result<Vec<_>, _>>()?,
                )?
                .build(),
        )?
        .build();

    let body = ElementBuilder::new("tbody")?.build();
    for ping in history.iter() {
        append_child(&body, &render_ping_row(ping)?)?;
    }

    let table = ElementBuilder::new("table")?
        .class("table table-sm")
        .child(head)?
        .child(body)?
        .build();
    append_child(&section, &table)?;
    Ok(section)
}

fn render_ping_row(ping: &PingResult) -> Result<Element, JsValue> {
    let cell = |text: &str, class: &str| -> Result<Element, JsValue> {
        Ok(ElementBuilder::new("td")?.class(class).text(text).build())
    };
    let badge = ElementBuilder::new("span")?
        .class(&ping.status.badge_class())
        .text(&format!("{} {}", ping.status.icon(), ping.status.label()))
        .build();
    let status_cell = ElementBuilder::new("td")?.child(badge)?.build();
    let http = ping.http_status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());

    ElementBuilder::new("tr")?
        .child(cell(&format_time(&ping.timestamp), "")?)?
        .child(status_cell)?
        .child(cell(&ping.message, "")?)?
        .child(cell(
            &format_response_time(ping.response_time_ms),
            &format!("response-time {}", response_time_class(ping.response_time_ms)),
        )?)?
        .child(cell(&http, "")?)
        .map(|b| b.build())
}

fn render_demo(state: &AppState, vm: &MonitorViewModel) -> Result<Element, JsValue> {
    let monitor = &state.monitor;
    let running = *monitor.demo_running.borrow();
    let logged_in = state.session.is_logged_in();

    let button = {
        let vm = vm.clone();
        render_button(
            if running { "Ejecutando..." } else { "▶️ Crear y confirmar entrega" },
            "btn btn-success",
            running || !logged_in,
            move || vm.run_demo(),
        )?
    };
    let hint = if logged_in {
        "Crea una entrega y la confirma con una firma real del autorizador"
    } else {
        "Inicia sesión para ejecutar la demo"
    };

    ElementBuilder::new("section")?
        .class("card demo-card")
        .child(
            ElementBuilder::new("div")?
                .class("card-body")
                .child(ElementBuilder::new("h5")?.text("Demo de confirmación firmada").build())?
                .child(ElementBuilder::new("p")?.class("text-muted").text(hint).build())?
                .child(button)?
                .child(render_message(monitor.demo_message.borrow().as_ref())?)?
                .build(),
        )
        .map(|b| b.build())
}
