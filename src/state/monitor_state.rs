// ============================================================================
// MONITOR STATE - Historial de pings + estado agregado
// ============================================================================

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use gloo_timers::callback::Interval;

use crate::models::{LogisticaStatus, PingResult};
use crate::state::Message;

/// Historial acotado: el más reciente primero, se descarta por el final
#[derive(Clone, Debug, PartialEq)]
pub struct PingHistory {
    cap: usize,
    items: VecDeque<PingResult>,
}

impl PingHistory {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            cap,
            items: VecDeque::with_capacity(cap),
        }
    }

    pub fn push(&mut self, result: PingResult) {
        self.items.push_front(result);
        self.items.truncate(self.cap);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PingResult> {
        self.items.iter()
    }
}

/// Estado de la vista de monitor. Cada slice lo escribe un único tipo de respuesta.
#[derive(Clone)]
pub struct MonitorState {
    pub history: Rc<RefCell<PingHistory>>,
    pub status: Rc<RefCell<Option<LogisticaStatus>>>,
    pub ping_in_progress: Rc<RefCell<bool>>,
    pub status_in_progress: Rc<RefCell<bool>>,
    pub last_update: Rc<RefCell<Option<String>>>,
    /// Timer de polling; soltarlo lo cancela
    pub polling: Rc<RefCell<Option<Interval>>>,
    pub demo_running: Rc<RefCell<bool>>,
    pub demo_message: Rc<RefCell<Option<Message>>>,
}

impl MonitorState {
    pub fn new(history_cap: usize) -> Self {
        Self {
            history: Rc::new(RefCell::new(PingHistory::new(history_cap))),
            status: Rc::new(RefCell::new(None)),
            ping_in_progress: Rc::new(RefCell::new(false)),
            status_in_progress: Rc::new(RefCell::new(false)),
            last_update: Rc::new(RefCell::new(None)),
            polling: Rc::new(RefCell::new(None)),
            demo_running: Rc::new(RefCell::new(false)),
            demo_message: Rc::new(RefCell::new(None)),
        }
    }

    pub fn record_ping(&self, result: PingResult, now: String) {
        self.history.borrow_mut().push(result);
        *self.last_update.borrow_mut() = Some(now);
    }

    pub fn record_status(&self, status: LogisticaStatus, now: String) {
        *self.status.borrow_mut() = Some(status);
        *self.last_update.borrow_mut() = Some(now);
    }

    pub fn clear_history(&self) {
        self.history.borrow_mut().clear();
    }

    pub fn is_polling(&self) -> bool {
        self.polling.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::monitor::PingStatus;

    fn ping(n: usize) -> PingResult {
        PingResult {
            target_service: "logistica".to_string(),
            status: PingStatus::Healthy,
            message: format!("ping {}", n),
            response_time_ms: Some(n as f64),
            http_status: Some(200),
            timestamp: format!("t{}", n),
            ping_successful: true,
        }
    }

    #[test]
    fn test_history_keeps_most_recent_first() {
        let cap = 5;
        let extra = 3;
        let mut history = PingHistory::new(cap);
        for n in 0..cap + extra {
            history.push(ping(n));
            assert!(history.len() <= cap);
        }
        let messages: Vec<String> = history.iter().map(|p| p.message.clone()).collect();
        let expected: Vec<String> = (extra..cap + extra).rev().map(|n| format!("ping {}", n)).collect();
        assert_eq!(messages, expected);
        assert_eq!(history.iter().next().unwrap().message, "ping 7");
    }

    #[test]
    fn test_history_below_cap_and_clear() {
        let mut history = PingHistory::new(20);
        history.push(ping(1));
        history.push(ping(2));
        assert_eq!(history.len(), 2);
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_zero_cap_is_clamped() {
        let mut history = PingHistory::new(0);
        history.push(ping(1));
        history.push(ping(2));
        assert_eq!(history.cap(), 1);
        assert_eq!(history.iter().next().unwrap().message, "ping 2");
    }

    #[test]
    fn test_slices_are_independent() {
        let state = MonitorState::new(3);
        state.record_ping(ping(1), "now".to_string());
        assert!(state.status.borrow().is_none());
        assert_eq!(state.history.borrow().len(), 1);
        assert_eq!(state.last_update.borrow().as_deref(), Some("now"));
        assert!(!state.is_polling());
    }
}
