//! Dictionary-backed IPA transcription.
//!
//! Dictionaries are plain text, one entry per line:
//!
//! ```text
//! cat	/ˈkæt/
//! read	/ˈɹɛd/, /ˈɹid/
//! ```
//!
//! and are named after their language (`en_US.txt`, `fr_FR.tsv`, `de.txt`).

use std::collections::HashMap;
use std::path::Path;

use super::{normalize_language, primary_subtag, SpeechError, Transcriber};

type Dictionary = HashMap<String, String>;

/// Looks words up in per-language pronunciation dictionaries loaded at startup.
#[derive(Debug, Default)]
pub struct DictionaryTranscriber {
    dictionaries: HashMap<String, Dictionary>,
}

impl DictionaryTranscriber {
    /// Transcriber with no languages; every lookup is unsupported.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every `*.txt`/`*.tsv` file in `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, SpeechError> {
        let dictionary_error = |reason: String| SpeechError::Dictionary {
            path: dir.display().to_string(),
            reason,
        };

        let mut transcriber = Self::default();
        let entries = std::fs::read_dir(dir).map_err(|e| dictionary_error(e.to_string()))?;

        for entry in entries {
            let path = entry.map_err(|e| dictionary_error(e.to_string()))?.path();
            let is_dictionary = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("txt") | Some("tsv")
            );
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !is_dictionary {
                continue;
            }

            let contents = std::fs::read_to_string(&path).map_err(|e| SpeechError::Dictionary {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            let language = normalize_language(stem);
            let dictionary = parse_dictionary(&contents);
            tracing::info!("Loaded {} IPA entries for {}", dictionary.len(), language);
            transcriber.insert(&language, dictionary);
        }

        Ok(transcriber)
    }

    /// Register a dictionary from its text contents.
    pub fn with_dictionary(mut self, language: &str, contents: &str) -> Self {
        self.insert(&normalize_language(language), parse_dictionary(contents));
        self
    }

    fn insert(&mut self, language: &str, dictionary: Dictionary) {
        self.dictionaries.insert(language.to_string(), dictionary);
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.dictionaries.keys().map(String::as_str)
    }

    /// Exact tag first, then any dictionary sharing the primary subtag.
    fn dictionary_for(&self, language: &str) -> Option<&Dictionary> {
        let normalized = normalize_language(language);
        if let Some(dictionary) = self.dictionaries.get(&normalized) {
            return Some(dictionary);
        }

        let primary = primary_subtag(&normalized);
        let mut candidates: Vec<&String> = self
            .dictionaries
            .keys()
            .filter(|key| primary_subtag(key) == primary)
            .collect();
        candidates.sort();
        candidates.first().and_then(|key| self.dictionaries.get(*key))
    }
}

impl Transcriber for DictionaryTranscriber {
    /// Transcribe word by word. Unknown words keep their spelling with a
    /// trailing `*`; if no word is known at all the lookup fails.
    fn transcribe(&self, text: &str, language: &str) -> Result<String, SpeechError> {
        let dictionary = self
            .dictionary_for(language)
            .ok_or_else(|| SpeechError::UnsupportedLanguage(language.to_string()))?;

        let mut found_any = false;
        let mut parts = Vec::new();

        for token in text.split_whitespace() {
            let word = strip_punctuation(token);
            if word.is_empty() {
                continue;
            }
            match dictionary.get(&word.to_lowercase()) {
                Some(ipa) => {
                    found_any = true;
                    parts.push(ipa.clone());
                }
                None => parts.push(format!("{}*", word)),
            }
        }

        if !found_any {
            return Err(SpeechError::NoTranscription(text.trim().to_string()));
        }

        Ok(parts.join(" "))
    }
}

fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-')
}

/// Parse `word<TAB>/ipa/[, /ipa2/]` lines, keeping the first pronunciation.
fn parse_dictionary(contents: &str) -> Dictionary {
    contents
        .lines()
        .filter_map(|line| {
            let (word, pronunciations) = line.split_once('\t')?;
            let first = pronunciations.split(',').next()?.trim().trim_matches('/').trim();
            let word = word.trim().to_lowercase();
            if word.is_empty() || first.is_empty() {
                return None;
            }
            Some((word, first.to_string()))
        })
        .collect()
}
