// ============================================================================
// SESSION STATE - Sesión única compartida por todas las vistas
// ============================================================================
// El token se lee/escribe SOLO a través de TokenStorage. Las vistas no
// decodifican el token por su cuenta: leen de aquí y se suscriben a cambios.
// ============================================================================

use std::rc::Rc;

use crate::models::{SubjectId, User};
use crate::services::token_codec::decode_claims;
use crate::services::TokenStorage;
use crate::state::ReactiveState;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user_id: Option<SubjectId>,
    pub user_name: Option<String>,
    pub roles: Vec<String>,
}

impl Session {
    /// Sesión a partir de un token; None si el token no se puede decodificar
    pub fn from_token(token: &str) -> Option<Self> {
        let claims = decode_claims(token)?;
        Some(Self {
            token: Some(token.to_string()),
            user_id: claims.subject_id().cloned(),
            user_name: claims.subject_name().map(|s| s.to_string()),
            roles: claims.roles,
        })
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Comparación de roles sin distinguir mayúsculas
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }
}

#[derive(Clone)]
pub struct SessionState {
    session: ReactiveState<Session>,
    storage: Rc<dyn TokenStorage>,
}

impl SessionState {
    pub fn new(storage: Rc<dyn TokenStorage>) -> Self {
        Self {
            session: ReactiveState::new(Session::default()),
            storage,
        }
    }

    /// Arranque: token guardado -> sesión. Un token corrupto se borra en silencio.
    pub fn restore(&self) {
        let Some(token) = self.storage.read() else {
            self.session.set(Session::default());
            return;
        };
        match Session::from_token(&token) {
            Some(session) => {
                log::info!("💾 [SESSION] Sesión restaurada para {:?}", session.user_name);
                self.session.set(session);
            }
            None => {
                log::warn!("⚠️ [SESSION] Token guardado inválido, se descarta");
                if let Err(e) = self.storage.clear() {
                    log::error!("❌ [SESSION] Error limpiando token: {}", e);
                }
                self.session.set(Session::default());
            }
        }
    }

    /// Login exitoso: decodifica, persiste y notifica
    pub fn establish(&self, token: &str) -> Result<Session, String> {
        let session = Session::from_token(token).ok_or_else(|| "Token recibido inválido".to_string())?;
        self.storage.write(token)?;
        self.session.set(session.clone());
        Ok(session)
    }

    pub fn logout(&self) {
        if let Err(e) = self.storage.clear() {
            log::error!("❌ [SESSION] Error limpiando token: {}", e);
        }
        self.session.set(Session::default());
    }

    pub fn get(&self) -> Session {
        self.session.get()
    }

    pub fn token(&self) -> Option<String> {
        self.session.with(|s| s.token.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.with(|s| s.is_logged_in())
    }

    pub fn user(&self) -> Option<User> {
        self.session.with(|s| {
            Some(User {
                id: s.user_id.clone()?,
                nombre: s.user_name.clone().unwrap_or_default(),
                roles: s.roles.clone(),
            })
        })
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.session.with(|s| s.has_role(role))
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.session.subscribe(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::token_codec::test_tokens::token_with_claims;
    use crate::services::MemoryTokenStorage;
    use serde_json::json;
    use std::cell::Cell;

    fn valid_token() -> String {
        token_with_claims(&json!({"sub": {"id": 4, "nombre": "ana", "roles": "Admin,System"}}))
    }

    #[test]
    fn test_restore_from_valid_token() {
        let storage = Rc::new(MemoryTokenStorage::with_token(&valid_token()));
        let state = SessionState::new(storage.clone());
        state.restore();

        assert!(state.is_logged_in());
        let user = state.user().unwrap();
        assert_eq!(user.id, SubjectId::Numero(4));
        assert_eq!(user.nombre, "ana");
        assert!(state.has_role("system"));
        assert!(state.has_role("ADMIN"));
        assert!(!state.has_role("user"));
    }

    #[test]
    fn test_restore_clears_corrupt_token() {
        let storage = Rc::new(MemoryTokenStorage::with_token("basura"));
        let state = SessionState::new(storage.clone());
        state.restore();

        assert!(!state.is_logged_in());
        assert!(storage.read().is_none());
    }

    #[test]
    fn test_establish_and_logout_notify() {
        let storage = Rc::new(MemoryTokenStorage::default());
        let state = SessionState::new(storage.clone());
        let view_copy = state.clone();
        let notifications = Rc::new(Cell::new(0));
        {
            let notifications = notifications.clone();
            view_copy.subscribe(move || notifications.set(notifications.get() + 1));
        }

        state.establish(&valid_token()).unwrap();
        assert!(view_copy.is_logged_in());
        assert_eq!(storage.read(), Some(valid_token()));

        view_copy.logout();
        assert!(!state.is_logged_in());
        assert!(storage.read().is_none());
        assert_eq!(notifications.get(), 2);
    }

    #[test]
    fn test_establish_rejects_undecodable_token() {
        let storage = Rc::new(MemoryTokenStorage::default());
        let state = SessionState::new(storage.clone());
        assert!(state.establish("a.b").is_err());
        assert!(storage.read().is_none());
        assert!(!state.is_logged_in());
    }
}
