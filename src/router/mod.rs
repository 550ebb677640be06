//! # Router Module
//!
//! The router keeps the registered routes ordered by priority and dispatches
//! request strings to them.
//!
//! ## Overview
//!
//! For every [`Router::parse`] call the router:
//! - finds the highest-priority route whose matcher and rules accept the request
//! - adds every lower-priority *greedy* route that also matches
//! - fires `pass` on the routes that matched the previous request
//! - fires each route's `match` listeners, then the router-wide `match` listeners
//! - fires the router-wide `default` listeners when nothing matched
//!
//! Everything happens synchronously inside `parse`, in that order.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use routecast::Router;
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let mut router = Router::new();
//!
//! let l = Rc::clone(&log);
//! router.add("/{section}").on_match(move |_, p| {
//!     l.borrow_mut().push(format!("section {}", p[0].as_deref().unwrap_or("")));
//! });
//! let l = Rc::clone(&log);
//! router.on_default(move |_, request| l.borrow_mut().push(format!("default {request}")));
//!
//! router.parse("/news");
//! router.parse("/news/42");
//! assert_eq!(*log.borrow(), vec!["section news", "default /news/42"]);
//! ```

mod core;
mod options;
#[cfg(test)]
mod tests;

pub use self::core::{DefaultListener, MatchResult, RoutedListener, Router};
pub use options::RouterOptions;
