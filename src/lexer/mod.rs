//! # Lexer Module
//!
//! The lexer turns route pattern templates into anchored regular expressions and
//! extracts the parameter identifiers they declare.
//!
//! ## Pattern Grammar
//!
//! | Form         | Meaning                                            |
//! |--------------|----------------------------------------------------|
//! | `{name}`     | required segment (no `/` or `?`)                   |
//! | `:name:`     | optional segment                                   |
//! | `{name*}`    | required rest, spans separators                    |
//! | `:name*:`    | optional rest                                      |
//! | `{?name}`    | required query string (`?` up to `#` or end)       |
//! | `:?name:`    | optional query string                              |
//!
//! Separators between adjacent tokens are rewritten to optional or required
//! slashes before anything else is touched.
//!
//! ## Compilation
//!
//! 1. Leading/trailing slashes are normalized according to the [`SlashMode`].
//! 2. Every token, in fixed precedence order, is swapped for a word-only placeholder.
//! 3. The remaining literal text is regex-escaped.
//! 4. Placeholders are swapped for their regex fragments.
//! 5. Optional slash prefix/suffix are added and the result is anchored.
//!
//! Rest and query tokens are saved before single-segment tokens, otherwise
//! `{name*}` would be claimed by the narrower `{name}` form.
//!
//! ## Example
//!
//! ```rust
//! use routecast::lexer::Lexer;
//!
//! let lexer = Lexer::default();
//! let matcher = lexer.compile_pattern("/news/{id}/:slug:").unwrap();
//!
//! assert!(matcher.is_match("/news/42"));
//! assert!(matcher.is_match("news/42/hello-world/"));
//! assert_eq!(lexer.param_ids("/news/{id}/:slug:"), vec!["id", "slug"]);
//! ```

mod core;
mod error;
mod tokens;

pub use self::core::{Lexer, ParamVec, SlashMode, MAX_INLINE_PARAMS};
pub use error::LexerError;
