//! Core types for completion parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownMode;

/// Output grammar requested for a completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Flashcard,
    Language,
    Explain,
}

impl Mode {
    /// Get the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flashcard => "flashcard",
            Self::Language => "language",
            Self::Explain => "explain",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flashcard" => Ok(Self::Flashcard),
            "language" => Ok(Self::Language),
            "explain" => Ok(Self::Explain),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// Question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    /// Build a card from trimmed halves, or `None` if either half is blank.
    pub fn new(question: &str, answer: &str) -> Option<Self> {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() || answer.is_empty() {
            return None;
        }
        Some(Self {
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }
}

/// Vocabulary card. Missing fields are empty strings, never errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageCard {
    pub word: String,
    pub question: String,
    pub translation: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub explanation: String,
}

/// Successfully parsed completion, one variant per mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Flashcards(Vec<Flashcard>),
    Language(LanguageCard),
    Explanation(Explanation),
}

impl Parsed {
    /// Mode that produced this value.
    pub fn mode(&self) -> Mode {
        match self {
            Self::Flashcards(_) => Mode::Flashcard,
            Self::Language(_) => Mode::Language,
            Self::Explanation(_) => Mode::Explain,
        }
    }
}
