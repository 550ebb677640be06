//! # Signal Module
//!
//! Ordered, synchronous listener lists used for the `match`, `pass` and
//! `default` notifications on routes and routers.
//!
//! A [`Signal`] is generic over the listener's unsized closure type, so each
//! channel keeps its own typed signature:
//!
//! ```rust
//! use routecast::signal::Signal;
//!
//! let mut signal: Signal<dyn FnMut(&str)> = Signal::new();
//! signal.add(Box::new(|request| println!("passed: {request}")));
//! signal.dispatch(|listener| listener("/foo"));
//! ```
//!
//! Listeners run in registration order on the caller's stack. A panicking
//! listener unwinds straight into `dispatch`, and the listeners after it are
//! not invoked.

struct Listener<F: ?Sized> {
    callback: Box<F>,
    once: bool,
}

/// Ordered list of listeners for one notification channel
pub struct Signal<F: ?Sized> {
    listeners: Vec<Listener<F>>,
}

impl<F: ?Sized> Signal<F> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener that fires on every dispatch
    pub fn add(&mut self, callback: Box<F>) {
        self.listeners.push(Listener {
            callback,
            once: false,
        });
    }

    /// Register a listener that is dropped after its first dispatch
    pub fn add_once(&mut self, callback: Box<F>) {
        self.listeners.push(Listener {
            callback,
            once: true,
        });
    }

    /// Remove every listener
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Invoke every listener in registration order
    ///
    /// `call` receives each listener in turn and is responsible for passing the
    /// arguments. A one-shot listener leaves the list before it is called, so it
    /// is gone even if it or a later listener panics.
    pub fn dispatch(&mut self, mut call: impl FnMut(&mut F)) {
        let mut index = 0;
        while index < self.listeners.len() {
            if self.listeners[index].once {
                let mut listener = self.listeners.remove(index);
                call(listener.callback.as_mut());
            } else {
                call(self.listeners[index].callback.as_mut());
                index += 1;
            }
        }
    }
}

impl<F: ?Sized> Default for Signal<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> std::fmt::Debug for Signal<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Signal;
    use std::cell::RefCell;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::rc::Rc;

    #[test]
    fn test_dispatch_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut signal: Signal<dyn FnMut(u32)> = Signal::new();
        for tag in ["a", "b", "c"] {
            let seen = Rc::clone(&seen);
            signal.add(Box::new(move |n| seen.borrow_mut().push(format!("{tag}{n}"))));
        }
        signal.dispatch(|l| l(1));
        assert_eq!(*seen.borrow(), vec!["a1", "b1", "c1"]);
    }

    #[test]
    fn test_once_listener_fires_once() {
        let count = Rc::new(RefCell::new(0));
        let mut signal: Signal<dyn FnMut()> = Signal::new();
        let c = Rc::clone(&count);
        signal.add_once(Box::new(move || *c.borrow_mut() += 1));
        signal.dispatch(|l| l());
        signal.dispatch(|l| l());
        assert_eq!(*count.borrow(), 1);
        assert!(signal.is_empty());
    }

    #[test]
    fn test_once_listener_dropped_when_later_listener_panics() {
        let count = Rc::new(RefCell::new(0));
        let mut signal: Signal<dyn FnMut()> = Signal::new();
        let c = Rc::clone(&count);
        signal.add_once(Box::new(move || *c.borrow_mut() += 1));
        signal.add(Box::new(|| panic!("listener failure")));

        let outcome = catch_unwind(AssertUnwindSafe(|| signal.dispatch(|l| l())));
        assert!(outcome.is_err());
        assert_eq!(*count.borrow(), 1);
        assert_eq!(signal.len(), 1);

        let outcome = catch_unwind(AssertUnwindSafe(|| signal.dispatch(|l| l())));
        assert!(outcome.is_err());
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_persistent_listener_survives_own_panic() {
        let mut signal: Signal<dyn FnMut()> = Signal::new();
        signal.add(Box::new(|| panic!("listener failure")));
        let outcome = catch_unwind(AssertUnwindSafe(|| signal.dispatch(|l| l())));
        assert!(outcome.is_err());
        assert_eq!(signal.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut signal: Signal<dyn FnMut()> = Signal::new();
        signal.add(Box::new(|| {}));
        signal.add_once(Box::new(|| {}));
        assert_eq!(signal.len(), 2);
        signal.clear();
        assert!(signal.is_empty());
    }
}
