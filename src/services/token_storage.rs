// ============================================================================
// TOKEN STORAGE - Único punto de acceso al token persistido
// ============================================================================

#[cfg(test)]
use std::cell::RefCell;

use gloo_storage::{LocalStorage, Storage};

use crate::utils::TOKEN_STORAGE_KEY;

pub trait TokenStorage {
    fn read(&self) -> Option<String>;
    fn write(&self, token: &str) -> Result<(), String>;
    fn clear(&self) -> Result<(), String>;
}

/// localStorage del navegador. El token se guarda en crudo (sin comillas JSON)
/// para ser compatible con lo que ya haya escrito otra pestaña.
#[derive(Clone, Default)]
pub struct LocalTokenStorage;

impl LocalTokenStorage {
    pub fn new() -> Self {
        Self
    }
}

impl TokenStorage for LocalTokenStorage {
    fn read(&self) -> Option<String> {
        LocalStorage::raw()
            .get_item(TOKEN_STORAGE_KEY)
            .ok()
            .flatten()
            .filter(|token| !token.trim().is_empty())
    }

    fn write(&self, token: &str) -> Result<(), String> {
        LocalStorage::raw()
            .set_item(TOKEN_STORAGE_KEY, token)
            .map_err(|_| "Error guardando token en localStorage".to_string())
    }

    fn clear(&self) -> Result<(), String> {
        LocalStorage::delete(TOKEN_STORAGE_KEY);
        Ok(())
    }
}

/// Almacenamiento en memoria para tests
#[cfg(test)]
#[derive(Default)]
pub struct MemoryTokenStorage {
    token: RefCell<Option<String>>,
}

#[cfg(test)]
impl MemoryTokenStorage {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
        }
    }
}

#[cfg(test)]
impl TokenStorage for MemoryTokenStorage {
    fn read(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn write(&self, token: &str) -> Result<(), String> {
        *self.token.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), String> {
        *self.token.borrow_mut() = None;
        Ok(())
    }
}
