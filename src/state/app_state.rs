// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::CONFIG;
use crate::services::TokenStorage;
use crate::state::{AuthViewState, EntregasState, MonitorState, SecurityState, SessionState};

/// Rutas de la aplicación (hash routing)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Monitor,
    Auth,
    Entregas,
    SecurityValidation,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::Monitor,
        Route::Auth,
        Route::Entregas,
        Route::SecurityValidation,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Monitor => "/monitor",
            Route::Auth => "/auth",
            Route::Entregas => "/entregas",
            Route::SecurityValidation => "/security-validation",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Monitor => "Monitor",
            Route::Auth => "Autenticación",
            Route::Entregas => "Entregas",
            Route::SecurityValidation => "Validación de Seguridad",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Route::Monitor => "📡",
            Route::Auth => "🔐",
            Route::Entregas => "📦",
            Route::SecurityValidation => "🛡️",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Route::Monitor => "Estado en tiempo real del servicio de logística",
            Route::Auth => "Login, registro, firma y validación de payloads",
            Route::Entregas => "Listado, creación y procesamiento de entregas",
            Route::SecurityValidation => "Pruebas de cifrado e integridad de mensajes",
        }
    }

    /// Ruta desde un path; desconocido o vacío -> Monitor
    pub fn from_path(path: &str) -> Route {
        let path = path.trim().trim_end_matches('/');
        Route::ALL
            .iter()
            .copied()
            .find(|route| route.path() == path)
            .unwrap_or_default()
    }

    /// Ruta desde `location.hash` ("#/entregas", "#entregas", "")
    pub fn from_hash(hash: &str) -> Route {
        let path = hash.trim_start_matches('#');
        if path.starts_with('/') {
            Route::from_path(path)
        } else {
            Route::from_path(&format!("/{}", path))
        }
    }

    pub fn hash(&self) -> String {
        format!("#{}", self.path())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// Mensaje visible para el usuario
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: MessageKind::Info }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: MessageKind::Success }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: MessageKind::Error }
    }

    pub fn css_class(&self) -> &'static str {
        match self.kind {
            MessageKind::Info => "alert alert-info",
            MessageKind::Success => "alert alert-success",
            MessageKind::Error => "alert alert-danger",
        }
    }
}

/// Estado global de la aplicación
#[derive(Clone)]
pub struct AppState {
    pub session: SessionState,
    pub route: Rc<RefCell<Route>>,
    pub menu_open: Rc<RefCell<bool>>,

    pub auth: AuthViewState,
    pub entregas: EntregasState,
    pub monitor: MonitorState,
    pub security: SecurityState,

    change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl AppState {
    pub fn new(storage: Rc<dyn TokenStorage>) -> Self {
        let state = Self {
            session: SessionState::new(storage),
            route: Rc::new(RefCell::new(Route::default())),
            menu_open: Rc::new(RefCell::new(false)),
            auth: AuthViewState::new(),
            entregas: EntregasState::new(),
            monitor: MonitorState::new(CONFIG.ping_history_cap),
            security: SecurityState::new(),
            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        };

        // Cualquier cambio de sesión se propaga a las vistas
        let subscribers = state.change_subscribers.clone();
        state.session.subscribe(move || {
            let callbacks: Vec<Rc<dyn Fn()>> = subscribers.borrow().iter().cloned().collect();
            for callback in callbacks {
                callback();
            }
        });

        state
    }

    pub fn current_route(&self) -> Route {
        *self.route.borrow()
    }

    /// Cambia de ruta y cierra el menú; devuelve true si cambió
    pub fn set_route(&self, route: Route) -> bool {
        let changed = *self.route.borrow() != route;
        *self.route.borrow_mut() = route;
        *self.menu_open.borrow_mut() = false;
        changed
    }

    pub fn toggle_menu(&self) {
        let open = *self.menu_open.borrow();
        *self.menu_open.borrow_mut() = !open;
        self.notify_changes();
    }

    /// Suscribirse a cambios de estado
    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    /// Notifica solo si la vista activa es `route`: una respuesta tardía
    /// no debe re-renderizar (y vaciar) los formularios de otra vista
    pub fn notify_route(&self, route: Route) {
        if self.current_route() == route {
            self.notify_changes();
        }
    }

    /// Notificar a todos los subscribers
    pub fn notify_changes(&self) {
        let callbacks: Vec<Rc<dyn Fn()>> = self.change_subscribers.borrow().iter().cloned().collect();
        for callback in callbacks {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemoryTokenStorage;
    use std::cell::Cell;

    #[test]
    fn test_route_from_path() {
        assert_eq!(Route::from_path("/entregas"), Route::Entregas);
        assert_eq!(Route::from_path("/security-validation/"), Route::SecurityValidation);
        assert_eq!(Route::from_path(""), Route::Monitor);
        assert_eq!(Route::from_path("/canciones"), Route::Monitor);
    }

    #[test]
    fn test_route_from_hash() {
        assert_eq!(Route::from_hash("#/auth"), Route::Auth);
        assert_eq!(Route::from_hash("#entregas"), Route::Entregas);
        assert_eq!(Route::from_hash(""), Route::Monitor);
        assert_eq!(Route::from_hash("#"), Route::Monitor);
        for route in Route::ALL {
            assert_eq!(Route::from_hash(&route.hash()), route);
        }
    }

    #[test]
    fn test_message_classes() {
        assert_eq!(Message::error("x").css_class(), "alert alert-danger");
        assert_eq!(Message::success("x").css_class(), "alert alert-success");
        assert_eq!(Message::info("x").css_class(), "alert alert-info");
    }

    #[test]
    fn test_session_changes_notify_app_subscribers() {
        let state = AppState::new(Rc::new(MemoryTokenStorage::default()));
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        state.subscribe_to_changes(move || seen.set(seen.get() + 1));

        state.session.logout();
        assert_eq!(count.get(), 1);
        state.toggle_menu();
        assert_eq!(count.get(), 2);
        assert!(*state.menu_open.borrow());
    }

    #[test]
    fn test_set_route_closes_menu() {
        let state = AppState::new(Rc::new(MemoryTokenStorage::default()));
        *state.menu_open.borrow_mut() = true;
        assert!(state.set_route(Route::Auth));
        assert!(!state.set_route(Route::Auth));
        assert!(!*state.menu_open.borrow());
        assert_eq!(state.current_route(), Route::Auth);
    }
}
