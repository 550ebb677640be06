use std::fmt;
use std::rc::Rc;

use crate::lexer::Lexer;
use crate::route::{Normalizer, ParamValues};

/// Construction options for [`Router`](super::Router)
///
/// # Example
///
/// ```rust
/// use routecast::{Lexer, Router, RouterOptions};
///
/// let options = RouterOptions::new()
///     .lexer(Lexer::strict())
///     .normalize_fn(|_request, values| values.values().to_vec());
/// let router = Router::with_options(options);
/// assert_eq!(*router.lexer(), Lexer::strict());
/// ```
#[derive(Clone, Default)]
pub struct RouterOptions {
    pub(crate) normalize_fn: Option<Normalizer>,
    pub(crate) lexer: Option<Lexer>,
}

impl RouterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizer applied to routes that have none of their own
    #[must_use]
    pub fn normalize_fn<F>(mut self, normalize: F) -> Self
    where
        F: Fn(&str, &ParamValues<'_>) -> Vec<Option<String>> + 'static,
    {
        self.normalize_fn = Some(Rc::new(normalize));
        self
    }

    /// Compiler to use instead of the default loose-slash lexer
    #[must_use]
    pub fn lexer(mut self, lexer: Lexer) -> Self {
        self.lexer = Some(lexer);
        self
    }
}

impl fmt::Debug for RouterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterOptions")
            .field("normalize_fn", &self.normalize_fn.is_some())
            .field("lexer", &self.lexer)
            .finish()
    }
}
