use std::fmt;

/// Pattern compilation and interpolation error
///
/// Raised synchronously to the caller of [`Lexer::compile_pattern`](super::Lexer::compile_pattern)
/// or [`Lexer::interpolate`](super::Lexer::interpolate). Matching never produces
/// one of these; a route that cannot match is simply skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    /// Interpolation was requested on a route built from a raw regex
    InvalidPatternType {
        /// Source of the raw regex
        regex: String,
    },
    /// A required `{name}` segment has no replacement
    MissingRequiredSegment {
        /// The full token, e.g. `{id}`
        segment: String,
    },
    /// A replacement for a non-rest segment contains a `/`
    InvalidSegmentValue {
        /// The full token, e.g. `{id}`
        segment: String,
        /// The offending replacement value
        value: String,
    },
    /// The compiled pattern was rejected by the regex engine
    InvalidPattern {
        /// The route pattern as written
        pattern: String,
        /// Regex engine diagnostic
        reason: String,
    },
}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexerError::InvalidPatternType { regex } => {
                write!(
                    f,
                    "Route pattern should be a string, got raw regex '{}'.",
                    regex
                )
            }
            LexerError::MissingRequiredSegment { segment } => {
                write!(f, "The segment {} is required.", segment)
            }
            LexerError::InvalidSegmentValue { segment, value } => {
                write!(f, "Invalid value \"{}\" for segment \"{}\".", value, segment)
            }
            LexerError::InvalidPattern { pattern, reason } => {
                write!(f, "Route pattern '{}' did not compile: {}", pattern, reason)
            }
        }
    }
}

impl std::error::Error for LexerError {}
