// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reactivity;
pub mod session_state;
pub mod app_state;
pub mod auth_view_state;
pub mod entregas_state;
pub mod monitor_state;
pub mod security_state;

pub use reactivity::*;
pub use session_state::*;
pub use app_state::*;
pub use auth_view_state::*;
pub use entregas_state::*;
pub use monitor_state::*;
pub use security_state::*;
