//! JSON extraction with bracket-scan recovery.
//!
//! Models routinely wrap the requested JSON in commentary or code fences, so
//! the payload is taken as the slice between the leftmost opening and the
//! rightmost closing delimiter before decoding.

use serde_json::{Map, Value};

use crate::types::{Flashcard, LanguageCard};

type Object = Map<String, Value>;

/// Slice from the leftmost `[` through the rightmost `]`.
pub fn array_span(text: &str) -> Option<&str> {
    span(text, '[', ']')
}

/// Slice from the leftmost `{` through the rightmost `}`.
pub fn object_span(text: &str) -> Option<&str> {
    span(text, '{', '}')
}

fn span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Decode a list of `{question, answer}` objects.
///
/// Non-object entries fail the whole decode; objects with a blank or
/// non-string half are skipped.
pub fn decode_flashcards(slice: &str) -> Result<Vec<Flashcard>, serde_json::Error> {
    let entries: Vec<Object> = serde_json::from_str(slice)?;
    Ok(entries
        .iter()
        .filter_map(|entry| Flashcard::new(string_field(entry, "question"), string_field(entry, "answer")))
        .collect())
}

/// Decode a language card object. Missing keys become empty strings.
pub fn decode_language(slice: &str) -> Result<LanguageCard, serde_json::Error> {
    let object: Object = serde_json::from_str(slice)?;
    Ok(LanguageCard {
        word: string_field(&object, "word").trim().to_string(),
        question: string_field(&object, "question").trim().to_string(),
        translation: string_field(&object, "translation").trim().to_string(),
        answer: string_field(&object, "answer").trim().to_string(),
    })
}

/// The `explanation` value of an object, if the slice decodes and it is not blank.
pub fn decode_explanation(slice: &str) -> Option<String> {
    let object: Object = serde_json::from_str(slice).ok()?;
    object
        .get("explanation")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn string_field<'a>(object: &'a Object, key: &str) -> &'a str {
    object.get(key).and_then(Value::as_str).unwrap_or("")
}
