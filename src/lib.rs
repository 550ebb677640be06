//! # routecast
//!
//! **routecast** is a synchronous pattern dispatcher. It compiles compact route
//! templates into anchored regular expressions, keeps routes ordered by priority
//! and notifies listeners when a request string matches, stops matching, or
//! matches nothing at all.
//!
//! ## Architecture
//!
//! - **[`lexer`]** - Template grammar, compilation to [`regex::Regex`], value extraction and interpolation
//! - **[`route`]** - A single pattern with rules, a normalizer and `match`/`pass` listeners
//! - **[`router`]** - Priority-ordered route collection and the `parse` dispatch algorithm
//! - **[`signal`]** - Ordered listener lists with one-shot support
//! - **[`table`]** - Declarative route tables in TOML or JSON
//! - **[`runtime_config`]** - Environment variable configuration
//!
//! ## Template Grammar
//!
//! | Syntax      | Meaning                                   |
//! |-------------|-------------------------------------------|
//! | `{name}`    | required segment                          |
//! | `:name:`    | optional segment                          |
//! | `{name*}`   | required rest, may contain `/`            |
//! | `:name*:`   | optional rest                             |
//! | `{?query}`  | required query string                     |
//! | `:?query:`  | optional query string                     |
//!
//! ## Quick Start
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use routecast::{Router, Rule};
//!
//! let hits = Rc::new(RefCell::new(Vec::new()));
//! let mut router = Router::new();
//!
//! let sink = Rc::clone(&hits);
//! router
//!     .add("/news/{id}/:slug:")
//!     .add_rule("id", Rule::pattern("^[0-9]+$").unwrap())
//!     .on_match(move |_, params| sink.borrow_mut().push(params.to_vec()));
//!
//! router.parse("/news/42/hello");
//! router.parse("/news/latest");
//!
//! assert_eq!(
//!     *hits.borrow(),
//!     vec![vec![Some("42".to_string()), Some("hello".to_string())]]
//! );
//! ```
//!
//! ## Logging
//!
//! Registration, matching and table loading emit [`tracing`] events. The
//! library never installs a subscriber.

pub mod lexer;
pub mod route;
pub mod router;
pub mod runtime_config;
pub mod signal;
pub mod table;

pub use lexer::{Lexer, LexerError, SlashMode};
pub use route::{Normalizer, ParamValues, Pattern, Route, RouteId, Rule};
pub use router::{MatchResult, Router, RouterOptions};
pub use table::{load_route_table, RouteTable};
