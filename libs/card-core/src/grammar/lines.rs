//! Line-prefix grammars.
//!
//! # Flashcards
//! ```text
//! Q: What is Rust?
//! A: A systems programming language.
//! Q: What is borrowing?
//! A: Access to a value without taking ownership.
//! ```
//!
//! # Language cards
//! ```text
//! W: chat
//! Q: Le <b>chat</b> dort.
//! T: The cat sleeps.
//! A: cat
//! ```
//!
//! Lines with any other prefix are ignored.

use crate::types::{Flashcard, LanguageCard};

enum LineType<'a> {
    Word(&'a str),
    Question(&'a str),
    Translation(&'a str),
    Answer(&'a str),
    Other,
}

fn parse_line(line: &str) -> LineType<'_> {
    let trimmed = line.trim();

    if let Some(rest) = trimmed.strip_prefix("Q:") {
        LineType::Question(rest.trim())
    } else if let Some(rest) = trimmed.strip_prefix("A:") {
        LineType::Answer(rest.trim())
    } else if let Some(rest) = trimmed.strip_prefix("T:") {
        LineType::Translation(rest.trim())
    } else if let Some(rest) = trimmed.strip_prefix("W:") {
        LineType::Word(rest.trim())
    } else {
        LineType::Other
    }
}

/// Collect `Q:`/`A:` pairs in order.
///
/// A `Q:` line flushes the pending card if it is complete and starts a new
/// one. A trailing question with no answer is dropped.
pub fn parse_flashcards(content: &str) -> Vec<Flashcard> {
    let mut collector = CardCollector::default();

    for line in content.lines() {
        match parse_line(line) {
            LineType::Question(text) => collector.start_question(text),
            LineType::Answer(text) => collector.set_answer(text),
            _ => {}
        }
    }

    collector.finish()
}

#[derive(Default)]
struct CardCollector {
    cards: Vec<Flashcard>,
    question: String,
    answer: String,
}

impl CardCollector {
    fn start_question(&mut self, text: &str) {
        self.flush();
        self.question = text.to_string();
        self.answer.clear();
    }

    fn set_answer(&mut self, text: &str) {
        self.answer = text.to_string();
    }

    fn flush(&mut self) {
        if let Some(card) = Flashcard::new(&self.question, &self.answer) {
            self.cards.push(card);
        }
        self.question.clear();
        self.answer.clear();
    }

    fn finish(mut self) -> Vec<Flashcard> {
        self.flush();
        self.cards
    }
}

/// Read a language card from `W:`/`Q:`/`T:`/`A:` lines.
///
/// Returns `None` when no non-empty question line is present. Later lines of
/// the same kind overwrite earlier ones.
pub fn parse_language(content: &str) -> Option<LanguageCard> {
    let mut card = LanguageCard::default();

    for line in content.lines() {
        match parse_line(line) {
            LineType::Word(text) => card.word = text.to_string(),
            LineType::Question(text) => card.question = text.to_string(),
            LineType::Translation(text) => card.translation = text.to_string(),
            LineType::Answer(text) => card.answer = text.to_string(),
            LineType::Other => {}
        }
    }

    if card.question.is_empty() {
        None
    } else {
        Some(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(q: &str, a: &str) -> Flashcard {
        Flashcard::new(q, a).unwrap()
    }

    #[test]
    fn parses_pairs_in_order() {
        let input = "Q: What is Rust?\nA: A language.\nQ: What is Cargo?\nA: The build tool.";
        assert_eq!(
            parse_flashcards(input),
            vec![card("What is Rust?", "A language."), card("What is Cargo?", "The build tool.")]
        );
    }

    #[test]
    fn drops_trailing_unpaired_question() {
        let input = "Q: One\nA: 1\nQ: Two";
        assert_eq!(parse_flashcards(input), vec![card("One", "1")]);
    }

    #[test]
    fn question_without_answer_is_discarded_by_next_question() {
        let input = "Q: Lonely\nQ: Paired\nA: Yes";
        assert_eq!(parse_flashcards(input), vec![card("Paired", "Yes")]);
    }

    #[test]
    fn ignores_commentary_and_indentation() {
        let input = "Here are your cards:\n\n  Q: Indented?\n  A: Still counts.\nHope this helps!";
        assert_eq!(parse_flashcards(input), vec![card("Indented?", "Still counts.")]);
    }

    #[test]
    fn empty_answer_is_not_a_card() {
        assert!(parse_flashcards("Q: Question\nA:   ").is_empty());
        assert!(parse_flashcards("").is_empty());
    }

    #[test]
    fn later_answer_replaces_earlier_one() {
        let input = "Q: Q\nA: first\nA: second";
        assert_eq!(parse_flashcards(input), vec![card("Q", "second")]);
    }

    #[test]
    fn language_lines_fill_fields() {
        let input = "Q: Le <b>chat</b> dort.\nT: The cat sleeps.\nA: cat";
        let parsed = parse_language(input).unwrap();
        assert_eq!(parsed.question, "Le <b>chat</b> dort.");
        assert_eq!(parsed.translation, "The cat sleeps.");
        assert_eq!(parsed.answer, "cat");
        assert_eq!(parsed.word, "");
    }

    #[test]
    fn language_lines_need_a_question() {
        assert_eq!(parse_language("T: only a translation"), None);
    }
}
