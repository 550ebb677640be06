//! # Route Module
//!
//! A [`Route`] is one registered pattern together with its compiled matcher,
//! priority, validation rules, optional normalizer and its own `match`/`pass`
//! listeners.
//!
//! ## Parameter Extraction
//!
//! Captured groups are exposed as [`ParamValues`]: an ordered list of values
//! with a name lookup on top. Routes built from a raw regex have no names and
//! are read positionally (`"0"`, `"1"`, ...).
//!
//! ## Validation
//!
//! [`Rule`]s are keyed by parameter name and checked when the route is asked
//! whether it matches a request:
//!
//! - an optional parameter that is absent (or empty) always passes
//! - [`Rule::Pattern`] must find a match in the value
//! - [`Rule::OneOf`] must contain the value
//! - [`Rule::Predicate`] must return `true` for `(value, request, values)`
//!
//! A failing rule makes the route not match; it is never an error.
//!
//! ```rust
//! use routecast::{Router, Rule};
//!
//! let mut router = Router::new();
//! router
//!     .add("{section}/{id}")
//!     .add_rule("section", ["news", "article"])
//!     .add_rule("id", Rule::pattern("^[0-9]+$").unwrap());
//!
//! let route = router.routes().next().unwrap();
//! assert!(route.matches("news/42"));
//! assert!(!route.matches("blog/42"));
//! assert!(!route.matches("news/latest"));
//! ```

mod core;
mod params;
mod rule;
#[cfg(test)]
mod tests;

pub use self::core::{MatchListener, Normalizer, PassListener, Pattern, Route, RouteId};
pub use params::ParamValues;
pub use rule::{PredicateFn, Rule};
