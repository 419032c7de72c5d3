//! Typed outbound channels from the application to its host.

use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Handler<T> = Rc<dyn Fn(&T)>;

/// One-way notification channel.
///
/// Every subscriber sees every value sent after it subscribed. Nothing is
/// sent back to the sender, and values sent with no subscriber are dropped.
/// Clones share subscribers.
pub struct Port<T> {
    subscribers: Rc<RefCell<Vec<Handler<T>>>>,
}

impl<T: 'static> Port<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) {
        self.subscribers.borrow_mut().push(Rc::new(handler));
    }

    /// Deliver `value` to every current subscriber, in subscription order.
    pub fn send(&self, value: T) {
        // Handlers may subscribe while running
        let handlers: Vec<Handler<T>> = self.subscribers.borrow().clone();
        for handler in handlers {
            handler(&value);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl<T: 'static> Default for Port<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Port<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<T> fmt::Debug for Port<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Port")
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

/// The two ports an application exposes to the bridge.
#[derive(Debug, Clone, Default)]
pub struct AppPorts {
    /// CSS selector of the element to focus
    pub focus: Port<String>,
    /// Full application state to persist
    pub set_storage: Port<Value>,
}

impl AppPorts {
    pub fn new() -> Self {
        Self::default()
    }
}
