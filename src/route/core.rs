use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use super::params::ParamValues;
use super::rule::Rule;
use crate::lexer::{Lexer, LexerError};
use crate::signal::Signal;

/// Listener for a route's `match` notification: `(extra args, params)`
pub type MatchListener = dyn FnMut(&[Value], &[Option<String>]);

/// Listener for a route's `pass` notification: the request that no longer routed here
pub type PassListener = dyn FnMut(&str);

/// Reshapes captured values into the argument list delivered to listeners
pub type Normalizer = Rc<dyn Fn(&str, &ParamValues<'_>) -> Vec<Option<String>>>;

/// Stable handle to a registered route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub(crate) u64);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "route#{}", self.0)
    }
}

/// What a route matches against
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Template in the route grammar, compiled by the [`Lexer`]
    Template(String),
    /// Raw regex, used as-is; captures are consumed positionally
    Regex(Regex),
}

impl Pattern {
    #[must_use]
    pub fn as_template(&self) -> Option<&str> {
        match self {
            Pattern::Template(t) => Some(t.as_str()),
            Pattern::Regex(_) => None,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Template(t) => f.write_str(t),
            Pattern::Regex(re) => f.write_str(re.as_str()),
        }
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Pattern::Template(s.to_string())
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Pattern::Template(s)
    }
}

impl From<&String> for Pattern {
    fn from(s: &String) -> Self {
        Pattern::Template(s.clone())
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Pattern::Regex(re)
    }
}

/// A single registered pattern with its matcher, rules and listeners
///
/// Routes are created through [`Router::add`](crate::Router::add) and live
/// until removed from the router.
pub struct Route {
    id: RouteId,
    pattern: Pattern,
    /// `None` when the template did not compile; such a route never matches
    matcher: Option<Regex>,
    param_ids: Vec<String>,
    optional_param_ids: Vec<String>,
    priority: i32,
    /// Insertion ordered; re-adding a name replaces the rule in place
    rules: Vec<(String, Rule)>,
    greedy: bool,
    normalizer: Option<Normalizer>,
    lexer: Lexer,
    matched: Signal<MatchListener>,
    passed: Signal<PassListener>,
}

impl Route {
    pub(crate) fn new(id: RouteId, pattern: Pattern, priority: i32, lexer: Lexer) -> Self {
        let (matcher, param_ids, optional_param_ids) = match &pattern {
            Pattern::Regex(re) => (Some(re.clone()), Vec::new(), Vec::new()),
            Pattern::Template(template) => {
                let matcher = match lexer.compile_pattern(template) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        warn!(route_id = %id, pattern = %template, error = %e, "Route pattern failed to compile; route will never match");
                        None
                    }
                };
                (
                    matcher,
                    lexer.param_ids(template),
                    lexer.optional_param_ids(template),
                )
            }
        };

        debug!(
            route_id = %id,
            pattern = %pattern,
            priority,
            param_ids = ?param_ids,
            matcher = matcher.as_ref().map(Regex::as_str).unwrap_or("<none>"),
            "Route compiled"
        );

        Self {
            id,
            pattern,
            matcher,
            param_ids,
            optional_param_ids,
            priority,
            rules: Vec::new(),
            greedy: false,
            normalizer: None,
            lexer,
            matched: Signal::new(),
            passed: Signal::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> RouteId {
        self.id
    }

    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Compiled matcher, `None` if the template did not compile
    #[must_use]
    pub fn matcher(&self) -> Option<&Regex> {
        self.matcher.as_ref()
    }

    #[must_use]
    pub fn param_ids(&self) -> &[String] {
        &self.param_ids
    }

    #[must_use]
    pub fn optional_param_ids(&self) -> &[String] {
        &self.optional_param_ids
    }

    /// Listen for this route matching: `(extra args, params)`
    pub fn on_match<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&[Value], &[Option<String>]) + 'static,
    {
        self.matched.add(Box::new(listener));
        self
    }

    /// Like [`on_match`](Self::on_match), dropped after the first delivery
    pub fn on_match_once<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&[Value], &[Option<String>]) + 'static,
    {
        self.matched.add_once(Box::new(listener));
        self
    }

    /// Listen for the parse after a match of this route
    ///
    /// Fires when a later parse produces a result and this route was part of
    /// the previous result, before any listener of the new result runs.
    pub fn on_pass<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&str) + 'static,
    {
        self.passed.add(Box::new(listener));
        self
    }

    pub fn on_pass_once<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(&str) + 'static,
    {
        self.passed.add_once(Box::new(listener));
        self
    }

    /// Drop every `match` and `pass` listener
    pub fn clear_listeners(&mut self) -> &mut Self {
        self.matched.clear();
        self.passed.clear();
        self
    }

    /// Constrain a parameter. Keys are declared names, positions (`"0"`) or `request_`.
    pub fn add_rule(&mut self, name: impl Into<String>, rule: impl Into<Rule>) -> &mut Self {
        let name = name.into();
        let rule = rule.into();
        match self.rules.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = rule,
            None => self.rules.push((name, rule)),
        }
        self
    }

    pub fn add_rules<I, K, R>(&mut self, rules: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<Rule>,
    {
        for (name, rule) in rules {
            self.add_rule(name, rule);
        }
        self
    }

    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    /// Greedy routes may match alongside the highest-priority match of a parse
    pub fn set_greedy(&mut self, greedy: bool) -> &mut Self {
        self.greedy = greedy;
        self
    }

    #[must_use]
    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    /// Override how captured values become the listener arguments
    pub fn set_normalizer<F>(&mut self, normalizer: F) -> &mut Self
    where
        F: Fn(&str, &ParamValues<'_>) -> Vec<Option<String>> + 'static,
    {
        self.normalizer = Some(Rc::new(normalizer));
        self
    }

    /// True when the matcher accepts `request` and every rule passes
    #[must_use]
    pub fn matches(&self, request: &str) -> bool {
        self.params(request)
            .is_some_and(|values| self.validate_params(&values))
    }

    /// Captured values for `request`, or `None` when the matcher rejects it
    #[must_use]
    pub fn params<'a>(&'a self, request: &'a str) -> Option<ParamValues<'a>> {
        let matcher = self.matcher.as_ref()?;
        let values = self.lexer.param_values(request, matcher)?;
        Some(ParamValues::new(request, &self.param_ids, values))
    }

    /// Build a request string for this route from named values
    ///
    /// # Errors
    ///
    /// [`LexerError::InvalidPatternType`] for raw regex routes, otherwise
    /// whatever [`Lexer::interpolate`] reports.
    pub fn interpolate<K, V>(&self, replacements: &HashMap<K, V>) -> Result<String, LexerError>
    where
        K: Borrow<str> + Hash + Eq,
        V: fmt::Display,
    {
        match &self.pattern {
            Pattern::Template(template) => self.lexer.interpolate(template, replacements),
            Pattern::Regex(re) => Err(LexerError::InvalidPatternType {
                regex: re.as_str().to_string(),
            }),
        }
    }

    /// Listener arguments for `request`: the route's normalizer, then `fallback`, then raw values
    pub(crate) fn arguments(
        &self,
        request: &str,
        fallback: Option<&Normalizer>,
    ) -> Vec<Option<String>> {
        let Some(values) = self.params(request) else {
            return Vec::new();
        };
        match self.normalizer.as_ref().or(fallback) {
            Some(normalize) => normalize(request, &values),
            None => values.into_values().into_vec(),
        }
    }

    pub(crate) fn dispatch_match(&mut self, extra: &[Value], params: &[Option<String>]) {
        self.matched.dispatch(|listener| listener(extra, params));
    }

    pub(crate) fn dispatch_pass(&mut self, request: &str) {
        self.passed.dispatch(|listener| listener(request));
    }

    fn validate_params(&self, values: &ParamValues<'_>) -> bool {
        self.rules
            .iter()
            .all(|(name, rule)| self.is_valid_param(name, rule, values))
    }

    fn is_valid_param(&self, name: &str, rule: &Rule, values: &ParamValues<'_>) -> bool {
        let value = values.get(name);
        let absent = value.map_or(true, str::is_empty);
        if absent && self.optional_param_ids.iter().any(|id| id == name) {
            return true;
        }
        rule.validate(value, values.request(), values)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("id", &self.id)
            .field("pattern", &self.pattern)
            .field("priority", &self.priority)
            .field("param_ids", &self.param_ids)
            .field("optional_param_ids", &self.optional_param_ids)
            .field("rules", &self.rules)
            .field("greedy", &self.greedy)
            .field("has_normalizer", &self.normalizer.is_some())
            .field("matched", &self.matched)
            .field("passed", &self.passed)
            .finish()
    }
}
