//! Transport seam.
//!
//! The engine only needs to hand `(actionType, actionData)` pairs to
//! something that delivers them, in order, to the other client. Delivery
//! in the other direction is the host calling
//! `GameClient::handle_remote_action`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;

/// Outbound message sink.
pub trait Transport {
    fn send_action(&mut self, action_type: &str, data: Value);
}

/// In-memory transport: messages queue up until the other side drains
/// them. Clones share one queue.
#[derive(Clone, Debug, Default)]
pub struct QueueTransport {
    queue: Rc<RefCell<VecDeque<(String, Value)>>>,
}

impl QueueTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest undelivered message.
    pub fn pop(&self) -> Option<(String, Value)> {
        self.queue.borrow_mut().pop_front()
    }

    /// Take every undelivered message, oldest first.
    pub fn drain(&self) -> Vec<(String, Value)> {
        self.queue.borrow_mut().drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl Transport for QueueTransport {
    fn send_action(&mut self, action_type: &str, data: Value) {
        self.queue.borrow_mut().push_back((action_type.to_string(), data));
    }
}
