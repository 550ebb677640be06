//! Token table used by the pattern compiler.
//!
//! Order matters: structural separators first, then query and rest forms,
//! then single-segment forms.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// The eight syntactic forms recognized inside a pattern.
///
/// The discriminant is the token's slot in [`TOKENS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    OptionalSlash = 0,
    RequiredSlash = 1,
    RequiredQuery = 2,
    OptionalQuery = 3,
    OptionalRest = 4,
    RequiredRest = 5,
    RequiredParam = 6,
    OptionalParam = 7,
}

impl TokenKind {
    /// Separator tokens keep the delimiters around them so later passes still see them.
    fn keeps_delimiters(self) -> bool {
        matches!(self, TokenKind::OptionalSlash | TokenKind::RequiredSlash)
    }
}

pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    matcher: Regex,
    pub(crate) placeholder: &'static str,
    pub(crate) fragment: &'static str,
}

impl Token {
    fn new(kind: TokenKind, source: &str, placeholder: &'static str, fragment: &'static str) -> Self {
        #[allow(clippy::expect_used)]
        let matcher = Regex::new(source).expect("token regex must compile");
        Self {
            kind,
            matcher,
            placeholder,
            fragment,
        }
    }

    /// Replace every occurrence of this token with its placeholder.
    pub(crate) fn save(&self, pattern: &str) -> String {
        self.matcher
            .replace_all(pattern, |caps: &Captures<'_>| {
                if !self.kind.keeps_delimiters() {
                    return self.placeholder.to_string();
                }
                // Alternations leave some groups empty; only participating ones count.
                let mut groups = caps.iter().skip(1).flatten().map(|m| m.as_str());
                let before = groups.next().unwrap_or_default();
                let after = groups.next().unwrap_or_default();
                format!("{before}{}{after}", self.placeholder)
            })
            .into_owned()
    }

    /// Swap the placeholder for the regex fragment.
    pub(crate) fn restore(&self, pattern: &str) -> String {
        pattern.replace(self.placeholder, self.fragment)
    }
}

pub(crate) const OPTIONAL_SLASH_PLACEHOLDER: &str = "__RC_OS__";

pub(crate) static TOKENS: Lazy<[Token; 8]> = Lazy::new(|| {
    [
        // slash between `::`, `}:`, `word/:`, `:{?`, `}{?` or `word/{?`
        Token::new(
            TokenKind::OptionalSlash,
            r"([:}])/?(:|\{\?)|([A-Za-z0-9_])/(:|\{\?)",
            OPTIONAL_SLASH_PLACEHOLDER,
            "/?",
        ),
        // slash between `:{` and `}{`
        Token::new(TokenKind::RequiredSlash, r"([:}])/?(\{)", "__RC_RS__", "/"),
        Token::new(TokenKind::RequiredQuery, r"\{\?([^}]+)\}", "__RC_RQ__", r"\?([^#]+)"),
        Token::new(TokenKind::OptionalQuery, r":\?([^:]+):", "__RC_OQ__", r"(?:\?([^#]*))?"),
        // `(.+)?` so an absent rest yields no capture rather than ""
        Token::new(TokenKind::OptionalRest, r":([^:]+)\*:", "__RC_OR__", "(.+)?"),
        Token::new(TokenKind::RequiredRest, r"\{([^}]+)\*\}", "__RC_RR__", "(.+)"),
        Token::new(TokenKind::RequiredParam, r"\{([^}]+)\}", "__RC_RP__", "([^/?]+)"),
        Token::new(TokenKind::OptionalParam, r":([^:]+):", "__RC_OP__", "([^/?]+)?/?"),
    ]
});

/// Everything between `{ }` or `: :`, any token form.
pub(crate) static PARAMS_REGEX: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"[{:]([^}:]+)[}:]").expect("params regex must compile")
});

pub(crate) fn token(kind: TokenKind) -> &'static Token {
    let tokens: &'static [Token; 8] = &TOKENS;
    &tokens[kind as usize]
}

/// First capture group of every non-overlapping match, left to right.
pub(crate) fn capture_names(matcher: &Regex, pattern: &str) -> Vec<String> {
    matcher
        .captures_iter(pattern)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

pub(crate) fn optional_param_matcher() -> &'static Regex {
    &token(TokenKind::OptionalParam).matcher
}
