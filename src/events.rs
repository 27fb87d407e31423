//! Observer registry
//!
//! Handlers are registered under a key and fire in registration order.
//! Subscribing again with a key that is already present replaces that
//! handler in place, so retrying a flow never stacks duplicate handlers.

use log::debug;
use std::fmt;

type Handler<E> = Box<dyn FnMut(&E)>;

/// Ordered, keyed callback list.
pub struct EventBus<E> {
    handlers: Vec<(String, Handler<E>)>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.handlers.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("EventBus").field("handlers", &keys).finish()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `key`.
    ///
    /// Returns `true` if the key was new, `false` if an existing handler was
    /// replaced (keeping its original position).
    pub fn subscribe(&mut self, key: impl Into<String>, handler: impl FnMut(&E) + 'static) -> bool {
        let key = key.into();
        if let Some(slot) = self.handlers.iter_mut().find(|(k, _)| *k == key) {
            debug!("Replacing event handler '{}'", key);
            slot.1 = Box::new(handler);
            false
        } else {
            self.handlers.push((key, Box::new(handler)));
            true
        }
    }

    /// Remove the handler registered under `key`, if any.
    #[allow(dead_code)]
    pub fn unsubscribe(&mut self, key: &str) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(k, _)| k != key);
        self.handlers.len() != before
    }

    #[allow(dead_code)]
    pub fn is_subscribed(&self, key: &str) -> bool {
        self.handlers.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Call every handler with `event`, in registration order.
    pub fn emit(&mut self, event: &E) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_handlers_fire_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        for name in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            bus.subscribe(name, move |e: &u32| log.borrow_mut().push(format!("{}:{}", name, e)));
        }
        bus.emit(&7);

        assert_eq!(*log.borrow(), vec!["first:7", "second:7", "third:7"]);
    }

    #[test]
    fn test_resubscribe_is_idempotent() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();

        for _ in 0..3 {
            let count = Rc::clone(&count);
            bus.subscribe("confirm", move |_: &()| *count.borrow_mut() += 1);
        }
        assert_eq!(bus.len(), 1);

        bus.emit(&());
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_replacement_keeps_position() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let l1 = Rc::clone(&log);
        bus.subscribe("a", move |_: &()| l1.borrow_mut().push("a"));
        let l2 = Rc::clone(&log);
        bus.subscribe("b", move |_: &()| l2.borrow_mut().push("b"));
        let l3 = Rc::clone(&log);
        assert!(!bus.subscribe("a", move |_: &()| l3.borrow_mut().push("a2")));

        bus.emit(&());
        assert_eq!(*log.borrow(), vec!["a2", "b"]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus: EventBus<()> = EventBus::new();
        bus.subscribe("x", |_| {});
        assert!(bus.is_subscribed("x"));
        assert!(bus.unsubscribe("x"));
        assert!(!bus.unsubscribe("x"));
        assert!(bus.is_empty());
    }
}
