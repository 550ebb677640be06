//! Lexer core - pattern compilation, parameter extraction and interpolation.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use regex::Regex;
use serde::Deserialize;
use smallvec::SmallVec;
use tracing::trace;

use super::error::LexerError;
use super::tokens::{
    capture_names, optional_param_matcher, token, TokenKind, OPTIONAL_SLASH_PLACEHOLDER,
    PARAMS_REGEX, TOKENS,
};

/// Maximum number of captured values before heap allocation.
/// Route patterns rarely declare more than a handful of segments.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Captured values in group order. `None` marks a group that did not participate.
pub type ParamVec = SmallVec<[Option<String>; MAX_INLINE_PARAMS]>;

/// How leading and trailing slashes are treated during compilation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlashMode {
    /// Strip one leading and one trailing slash from the pattern; both become optional in the matcher
    #[default]
    Loose,
    /// Leave the pattern untouched
    Strict,
    /// Strip a trailing slash only; it stays optional in the matcher
    Legacy,
}

impl SlashMode {
    fn normalize(self, pattern: &str) -> &str {
        match self {
            SlashMode::Loose => {
                let trimmed = pattern.strip_prefix('/').unwrap_or(pattern);
                trimmed.strip_suffix('/').unwrap_or(trimmed)
            }
            SlashMode::Legacy => pattern.strip_suffix('/').unwrap_or(pattern),
            SlashMode::Strict => pattern,
        }
    }
}

impl FromStr for SlashMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loose" => Ok(SlashMode::Loose),
            "strict" => Ok(SlashMode::Strict),
            "legacy" => Ok(SlashMode::Legacy),
            other => Err(format!("unknown slash mode '{other}'")),
        }
    }
}

impl fmt::Display for SlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlashMode::Loose => "loose",
            SlashMode::Strict => "strict",
            SlashMode::Legacy => "legacy",
        };
        f.write_str(name)
    }
}

/// Pattern compiler
///
/// Stateless apart from its [`SlashMode`], which is fixed at construction so
/// two routers with different modes never affect each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lexer {
    slash_mode: SlashMode,
}

impl Lexer {
    /// Create a lexer with the given slash handling
    #[must_use]
    pub fn new(slash_mode: SlashMode) -> Self {
        Self { slash_mode }
    }

    /// Lexer in [`SlashMode::Loose`] (the default)
    #[must_use]
    pub fn loose() -> Self {
        Self::new(SlashMode::Loose)
    }

    /// Lexer in [`SlashMode::Strict`]
    #[must_use]
    pub fn strict() -> Self {
        Self::new(SlashMode::Strict)
    }

    /// Lexer in [`SlashMode::Legacy`]
    #[must_use]
    pub fn legacy() -> Self {
        Self::new(SlashMode::Legacy)
    }

    #[must_use]
    pub fn slash_mode(&self) -> SlashMode {
        self.slash_mode
    }

    /// Names of every token in the pattern, left to right
    ///
    /// The name is the text between the delimiters, so rest and query tokens
    /// keep their marker: `{a}/:b*:/{?q}` yields `["a", "b*", "?q"]`. The
    /// result lines up one-to-one with the capture groups of the compiled matcher.
    #[must_use]
    pub fn param_ids(&self, pattern: &str) -> Vec<String> {
        capture_names(&PARAMS_REGEX, pattern)
    }

    /// Names of the `:name:` tokens in the pattern
    #[must_use]
    pub fn optional_param_ids(&self, pattern: &str) -> Vec<String> {
        capture_names(optional_param_matcher(), pattern)
    }

    /// Regex source for a pattern, before compilation
    #[must_use]
    pub fn pattern_source(&self, pattern: &str) -> String {
        let mut body = String::with_capacity(pattern.len() * 2 + 8);

        if !pattern.is_empty() {
            let normalized = self.slash_mode.normalize(pattern);
            let saved = TOKENS
                .iter()
                .fold(normalized.to_string(), |acc, t| t.save(&acc));
            let escaped = regex::escape(&saved);
            body = TOKENS.iter().fold(escaped, |acc, t| t.restore(&acc));

            if self.slash_mode == SlashMode::Loose {
                body.insert_str(0, "/?");
            }
        }

        if self.slash_mode != SlashMode::Strict {
            // a lone slash is treated as empty and the end slash is optional
            body.push_str("/?");
        }

        format!("^{body}$")
    }

    /// Compile a pattern into an anchored matcher
    ///
    /// The compiler does not validate the grammar; unbalanced delimiters are
    /// escaped as literal text.
    pub fn compile_pattern(&self, pattern: &str) -> Result<Regex, LexerError> {
        let source = self.pattern_source(pattern);
        trace!(pattern = %pattern, source = %source, slash_mode = %self.slash_mode, "Compiling route pattern");
        Regex::new(&source).map_err(|e| LexerError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
    }

    /// Captured groups of `matcher` against `request`, or `None` when it does not match
    #[must_use]
    pub fn param_values(&self, request: &str, matcher: &Regex) -> Option<ParamVec> {
        matcher.captures(request).map(|caps| {
            caps.iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str().to_string()))
                .collect()
        })
    }

    /// Build a request string from a pattern and named replacements
    ///
    /// Optional tokens without a replacement collapse to nothing, along with
    /// any trailing separators they leave behind.
    ///
    /// # Errors
    ///
    /// * [`LexerError::MissingRequiredSegment`] - a `{name}` token has no replacement
    /// * [`LexerError::InvalidSegmentValue`] - a non-rest replacement contains `/`
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use routecast::lexer::Lexer;
    ///
    /// let values = HashMap::from([("id", "42")]);
    /// let url = Lexer::default().interpolate("/news/{id}/:slug:", &values).unwrap();
    /// assert_eq!(url, "/news/42");
    /// ```
    pub fn interpolate<K, V>(
        &self,
        pattern: &str,
        replacements: &HashMap<K, V>,
    ) -> Result<String, LexerError>
    where
        K: Borrow<str> + Hash + Eq,
        V: fmt::Display,
    {
        let protected = token(TokenKind::OptionalSlash).save(pattern);

        let mut out = String::with_capacity(protected.len());
        let mut last = 0;
        for caps in PARAMS_REGEX.captures_iter(&protected) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let segment = whole.as_str();
            out.push_str(&protected[last..whole.start()]);
            last = whole.end();

            match replacements.get(name.as_str()) {
                Some(value) => {
                    let value = value.to_string();
                    if !segment.contains('*') && value.contains('/') {
                        return Err(LexerError::InvalidSegmentValue {
                            segment: segment.to_string(),
                            value,
                        });
                    }
                    out.push_str(&value);
                }
                None if segment.contains('{') => {
                    return Err(LexerError::MissingRequiredSegment {
                        segment: segment.to_string(),
                    });
                }
                None => {}
            }
        }
        out.push_str(&protected[last..]);

        while out.ends_with(OPTIONAL_SLASH_PLACEHOLDER) {
            out.truncate(out.len() - OPTIONAL_SLASH_PLACEHOLDER.len());
        }

        Ok(out.replace(OPTIONAL_SLASH_PLACEHOLDER, "/"))
    }
}
