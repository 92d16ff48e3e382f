//! Core completion parsing shared by the backend and its batch tools.
//!
//! Provides:
//! - Mode dispatch from a raw model completion to structured output
//! - Tolerant grammars (JSON with bracket-scan recovery, `<Q>/<A>` tags, `Q:/A:` lines)
//! - Shared types (Mode, Flashcard, LanguageCard, Explanation)

pub mod error;
pub mod grammar;
pub mod parser;
pub mod types;

pub use error::{ParseError, ParseErrorKind, Result, UnknownMode};
pub use parser::{parse, parse_named};
pub use types::{Explanation, Flashcard, LanguageCard, Mode, Parsed};
