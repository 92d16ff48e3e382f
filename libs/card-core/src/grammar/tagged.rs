//! HTML-like tag grammar: `<Q>...</Q><A>...</A>` blocks and `<b>` spans.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::Flashcard;

fn card_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)<Q>(.*?)</Q>\s*(?:<A>(.*?)</A>)?").expect("card pattern is valid")
    })
}

fn bold_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?is)<b>(.*?)</b>").expect("bold pattern is valid"))
}

/// One card per `<Q>` block that is followed by a non-empty `<A>` block.
pub fn parse_flashcards(content: &str) -> Vec<Flashcard> {
    card_pattern()
        .captures_iter(content)
        .filter_map(|caps| {
            let question = caps.get(1)?.as_str();
            let answer = caps.get(2)?.as_str();
            Flashcard::new(question, answer)
        })
        .collect()
}

/// Inner text of the first `<b>...</b>` span, trimmed.
pub fn first_bold(text: &str) -> Option<&str> {
    bold_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_pairs_across_lines() {
        let input = "Intro\n<Q>\n  What is ownership?\n</Q>\n<A>Each value has\none owner.</A>\n<Q>Next?</Q><A>Done</A>";
        assert_eq!(
            parse_flashcards(input),
            vec![
                Flashcard::new("What is ownership?", "Each value has\none owner.").unwrap(),
                Flashcard::new("Next?", "Done").unwrap(),
            ]
        );
    }

    #[test]
    fn question_without_answer_emits_nothing() {
        let input = "<Q>Orphan</Q> text <Q>Kept</Q> <A>Yes</A>";
        assert_eq!(parse_flashcards(input), vec![Flashcard::new("Kept", "Yes").unwrap()]);
    }

    #[test]
    fn first_bold_finds_inner_text() {
        assert_eq!(first_bold("Le <b> chat </b> et le <b>chien</b>"), Some("chat"));
        assert_eq!(first_bold("Upper <B>Case</B>"), Some("Case"));
        assert_eq!(first_bold("no emphasis"), None);
    }
}
