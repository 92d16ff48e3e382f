//! Mode dispatch: turn a raw completion into the shape its mode asks for.
//!
//! | mode        | grammar                                   | on failure            |
//! |-------------|-------------------------------------------|-----------------------|
//! | `flashcard` | JSON array, then `<Q>/<A>` tags, then `Q:/A:` lines | `ParseError`  |
//! | `language`  | JSON object, then `W:/Q:/T:/A:` lines     | `ParseError`          |
//! | `explain`   | JSON object with `explanation` key        | raw completion        |

use crate::error::{ParseError, ParseErrorKind, Result};
use crate::grammar::{json, lines, tagged};
use crate::types::{Explanation, Flashcard, LanguageCard, Mode, Parsed};

/// Parse `completion` with the grammar selected by `mode`.
///
/// Pure and deterministic: the same input always yields the same output.
pub fn parse(completion: &str, mode: Mode) -> Result<Parsed> {
    match mode {
        Mode::Flashcard => parse_flashcards(completion).map(Parsed::Flashcards),
        Mode::Language => parse_language(completion).map(Parsed::Language),
        Mode::Explain => Ok(Parsed::Explanation(parse_explanation(completion))),
    }
}

/// Like [`parse`], but takes the mode by name.
pub fn parse_named(completion: &str, mode: &str) -> Result<Parsed> {
    let mode = mode
        .parse::<Mode>()
        .map_err(|e| ParseError::new(ParseErrorKind::UnknownMode(e.0), completion))?;
    parse(completion, mode)
}

/// Extract flashcards.
///
/// A JSON array that decodes to at least one card wins outright. Otherwise
/// tagged blocks and then line prefixes are tried; the first grammar
/// producing a card wins. An empty array only counts when nothing else
/// matches. When nothing matches, the error reflects whether an array was
/// present at all.
pub fn parse_flashcards(completion: &str) -> Result<Vec<Flashcard>> {
    let mut empty_array = false;
    let decode_error = match json::array_span(completion) {
        Some(slice) => match json::decode_flashcards(slice) {
            Ok(cards) if !cards.is_empty() => return Ok(cards),
            Ok(_) => {
                empty_array = true;
                None
            }
            Err(e) => Some(e.to_string()),
        },
        None => None,
    };

    let cards = tagged::parse_flashcards(completion);
    if !cards.is_empty() {
        return Ok(cards);
    }

    let cards = lines::parse_flashcards(completion);
    if !cards.is_empty() || empty_array {
        return Ok(cards);
    }

    let kind = match decode_error {
        Some(message) => ParseErrorKind::MalformedJson(message),
        None => ParseErrorKind::NoArrayFound,
    };
    Err(ParseError::new(kind, completion))
}

/// Extract a language card.
///
/// An object span that fails to decode is an error; there is no fallback
/// because a half-read card is not safe to display.
pub fn parse_language(completion: &str) -> Result<LanguageCard> {
    let mut card = match json::object_span(completion) {
        Some(slice) => json::decode_language(slice).map_err(|e| {
            ParseError::new(ParseErrorKind::MalformedJson(e.to_string()), completion)
        })?,
        None => lines::parse_language(completion)
            .ok_or_else(|| ParseError::new(ParseErrorKind::NoObjectFound, completion))?,
    };

    if card.word.is_empty() {
        card.word = tagged::first_bold(&card.question)
            .unwrap_or_default()
            .to_string();
    }

    Ok(card)
}

/// Extract an explanation. Never fails: anything unstructured is passed
/// through verbatim.
pub fn parse_explanation(completion: &str) -> Explanation {
    let explanation = json::object_span(completion)
        .and_then(json::decode_explanation)
        .unwrap_or_else(|| completion.to_string());

    Explanation { explanation }
}
