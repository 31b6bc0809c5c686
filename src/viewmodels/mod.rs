// ============================================================================
// VIEWMODELS - Lógica de UI: llaman servicios, mutan estado, notifican
// ============================================================================

pub mod auth_viewmodel;
pub mod entregas_viewmodel;
pub mod monitor_viewmodel;
pub mod security_viewmodel;

pub use auth_viewmodel::AuthViewModel;
pub use entregas_viewmodel::EntregasViewModel;
pub use monitor_viewmodel::MonitorViewModel;
pub use security_viewmodel::SecurityViewModel;
