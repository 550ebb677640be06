use std::fmt;
use std::rc::Rc;

use regex::Regex;

use super::params::ParamValues;

/// Predicate signature: `(value, request, all values)`
pub type PredicateFn = dyn Fn(Option<&str>, &str, &ParamValues<'_>) -> bool;

/// Validation rule for one parameter
///
/// Rules are consulted at match time only. A route matches when every one of
/// its rules passes, which is what lets two routes share a pattern and
/// diverge by constraint.
#[derive(Clone)]
pub enum Rule {
    /// The value must contain a match of the regex (unanchored, like `Regex::is_match`)
    Pattern(Regex),
    /// The value must equal one of the listed strings
    OneOf(Vec<String>),
    /// Custom check receiving the value, the request and every captured value
    Predicate(Rc<PredicateFn>),
}

impl Rule {
    /// Compile `source` into a [`Rule::Pattern`]
    pub fn pattern(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Rule::Pattern)
    }

    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::OneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(Option<&str>, &str, &ParamValues<'_>) -> bool + 'static,
    {
        Rule::Predicate(Rc::new(f))
    }

    /// Check one value. An absent value never satisfies a pattern or a list.
    #[must_use]
    pub fn validate(&self, value: Option<&str>, request: &str, values: &ParamValues<'_>) -> bool {
        match self {
            Rule::Pattern(re) => value.is_some_and(|v| re.is_match(v)),
            Rule::OneOf(allowed) => value.is_some_and(|v| allowed.iter().any(|a| a == v)),
            Rule::Predicate(f) => f(value, request, values),
        }
    }
}

impl From<Regex> for Rule {
    fn from(re: Regex) -> Self {
        Rule::Pattern(re)
    }
}

impl From<Vec<String>> for Rule {
    fn from(values: Vec<String>) -> Self {
        Rule::OneOf(values)
    }
}

impl From<Vec<&str>> for Rule {
    fn from(values: Vec<&str>) -> Self {
        Rule::one_of(values)
    }
}

impl<const N: usize> From<[&str; N]> for Rule {
    fn from(values: [&str; N]) -> Self {
        Rule::one_of(values)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Rule::OneOf(values) => f.debug_tuple("OneOf").field(values).finish(),
            Rule::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
