//! Error types for card-core.

use std::fmt;

use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// What went wrong while extracting structured data from a completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("no JSON array found in completion")]
    NoArrayFound,

    #[error("no JSON object found in completion")]
    NoObjectFound,

    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("unknown mode '{0}'")]
    UnknownMode(String),
}

impl ParseErrorKind {
    /// Stable machine-readable tag for the error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoArrayFound => "no_array_found",
            Self::NoObjectFound => "no_object_found",
            Self::MalformedJson(_) => "malformed_json",
            Self::UnknownMode(_) => "unknown_mode",
        }
    }
}

/// A completion that could not be turned into the requested shape.
///
/// Always carries the raw completion so callers can show the user what the
/// model actually said.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub raw: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }
}

/// Returned by `Mode::from_str` for names outside the known modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode '{}'", self.0)
    }
}

impl std::error::Error for UnknownMode {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_are_snake_case() {
        assert_eq!(ParseErrorKind::NoArrayFound.as_str(), "no_array_found");
        assert_eq!(ParseErrorKind::NoObjectFound.as_str(), "no_object_found");
        assert_eq!(
            ParseErrorKind::MalformedJson("eof".into()).as_str(),
            "malformed_json"
        );
        assert_eq!(
            ParseErrorKind::UnknownMode("quiz".into()).as_str(),
            "unknown_mode"
        );
    }

    #[test]
    fn display_uses_kind_message() {
        let err = ParseError::new(ParseErrorKind::MalformedJson("expected value".into()), "[oops]");
        assert_eq!(err.to_string(), "malformed JSON: expected value");
        assert_eq!(err.raw, "[oops]");
    }
}
