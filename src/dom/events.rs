// ============================================================================
// EVENT HANDLING - Listeners sobre elementos y window
// ============================================================================
// Listeners de elementos: cada registro devuelve un `ElementListener` que se
// queda en la generación de render en curso. `App::render` toma esa
// generación con `take_listeners()` y suelta la anterior; al soltar un
// handle se quita el listener y se libera el closure de Rust.
// Listeners globales (window): registrar UNA sola vez al arrancar la app.
// ============================================================================

use std::cell::RefCell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MouseEvent};

use crate::dom::{element_value, window};

thread_local! {
    static PENDING: RefCell<Vec<ElementListener>> = const { RefCell::new(Vec::new()) };
}

/// Listener vivo sobre un elemento; se desregistra al hacer drop
pub struct ElementListener {
    target: Element,
    event_type: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl ElementListener {
    pub fn new<F>(target: &Element, event_type: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event_type,
            callback,
        })
    }
}

impl Drop for ElementListener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            self.event_type,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}

/// Handles de una generación de render
pub struct ListenerSet<T = ElementListener> {
    handles: Vec<T>,
}

impl<T> Default for ListenerSet<T> {
    fn default() -> Self {
        Self { handles: Vec::new() }
    }
}

impl<T> ListenerSet<T> {
    /// Sustituye la generación actual; devuelve cuántos handles se soltaron
    pub fn replace(&mut self, next: Vec<T>) -> usize {
        let previous = std::mem::replace(&mut self.handles, next);
        previous.len()
    }
}

fn retain(listener: ElementListener) {
    PENDING.with(|pending| pending.borrow_mut().push(listener));
}

/// Listeners registrados desde el último take
pub fn take_listeners() -> Vec<ElementListener> {
    PENDING.with(|pending| std::mem::take(&mut *pending.borrow_mut()))
}

/// Click handler simple
pub fn on_click<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    let listener = ElementListener::new(element, "click", move |e: Event| {
        handler(e.unchecked_into::<MouseEvent>());
    })?;
    retain(listener);
    Ok(())
}

/// Input handler que entrega el valor actual del campo
pub fn on_input_value<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut(String) + 'static,
{
    let target = element.clone();
    let listener = ElementListener::new(element, "input", move |_e: Event| {
        handler(element_value(&target));
    })?;
    retain(listener);
    Ok(())
}

/// Submit de formulario sin recargar la página
pub fn on_submit<F>(form: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    let listener = ElementListener::new(form, "submit", move |e: Event| {
        e.prevent_default();
        handler();
    })?;
    retain(listener);
    Ok(())
}

/// Listener global sobre window (solo una vez por evento)
pub fn on_window_event<F>(event_type: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let win = window().ok_or_else(|| JsValue::from_str("No window"))?;
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    win.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
    // Vive lo mismo que la página
    closure.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_replace_releases_previous_generation() {
        let handler = Rc::new(());
        let mut set: ListenerSet<Rc<()>> = ListenerSet::default();

        assert_eq!(set.replace(vec![handler.clone(), handler.clone()]), 0);
        assert_eq!(Rc::strong_count(&handler), 3);

        // Re-render: la generación nueva sustituye a la vieja
        assert_eq!(set.replace(vec![handler.clone()]), 2);
        assert_eq!(Rc::strong_count(&handler), 2);

        assert_eq!(set.replace(Vec::new()), 1);
        assert_eq!(Rc::strong_count(&handler), 1);
    }

    #[test]
    fn test_repeated_renders_do_not_accumulate() {
        let handler = Rc::new(());
        let mut set: ListenerSet<Rc<()>> = ListenerSet::default();
        for _ in 0..100 {
            set.replace(vec![handler.clone(); 5]);
        }
        assert_eq!(Rc::strong_count(&handler), 6);
        assert_eq!(set.replace(Vec::new()), 5);
    }
}
