// ============================================================================
// SECURITY STATE - Tests de seguridad + mensaje temporal
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

use crate::models::{SecurityTest, TestResult, TestType};
use crate::state::Message;

#[derive(Clone)]
pub struct SecurityState {
    pub tests: Rc<RefCell<Vec<SecurityTest>>>,
    pub message: Rc<RefCell<Option<Message>>>,
    /// Timer que borra el mensaje; reemplazarlo cancela el anterior
    pub message_timer: Rc<RefCell<Option<Timeout>>>,
}

impl SecurityState {
    pub fn new() -> Self {
        Self {
            tests: Rc::new(RefCell::new(SecurityTest::defaults())),
            message: Rc::new(RefCell::new(None)),
            message_timer: Rc::new(RefCell::new(None)),
        }
    }

    pub fn get(&self, id: &str) -> Option<SecurityTest> {
        self.tests.borrow().iter().find(|t| t.id == id).cloned()
    }

    fn with_test<R>(&self, id: &str, f: impl FnOnce(&mut SecurityTest) -> Result<R, String>) -> Result<R, String> {
        let mut tests = self.tests.borrow_mut();
        let test = tests
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| format!("Test desconocido: {}", id))?;
        f(test)
    }

    /// pending -> running; devuelve el tipo a ejecutar
    pub fn start(&self, id: &str) -> Result<TestType, String> {
        self.with_test(id, |test| {
            test.start()?;
            Ok(test.test_type)
        })
    }

    pub fn finish(&self, id: &str, passed: bool, result: TestResult, timestamp: String) -> Result<(), String> {
        self.with_test(id, |test| test.finish(passed, result, timestamp))
    }

    pub fn reset(&self, id: &str) -> Result<(), String> {
        self.with_test(id, |test| {
            test.reset();
            Ok(())
        })
    }
}

impl Default for SecurityState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TestStatus;

    #[test]
    fn test_start_finish_reset_by_id() {
        let state = SecurityState::new();
        assert_eq!(state.start("integrity_test").unwrap(), TestType::Integrity);
        assert_eq!(state.get("integrity_test").unwrap().status, TestStatus::Running);
        assert!(state.start("integrity_test").is_err());

        let result = TestResult::Error { message: "sin token".to_string() };
        state.finish("integrity_test", false, result, "t".to_string()).unwrap();
        assert_eq!(state.get("integrity_test").unwrap().status, TestStatus::Failed);

        state.reset("integrity_test").unwrap();
        assert_eq!(state.get("integrity_test").unwrap().status, TestStatus::Pending);
    }

    #[test]
    fn test_unknown_id() {
        let state = SecurityState::new();
        assert!(state.start("nope").is_err());
        assert!(state.get("nope").is_none());
    }
}
