//! Test fixtures: model config, dictionaries and sample completions.

use serde_json::{json, Value};

pub const MODELS_TOML: &str = r#"
[[providers]]
credential_env = "TEST_OPENAI_KEY"
models = ["openai/gpt-test", "openai/gpt-mini"]

[[providers]]
credential_env = "TEST_ANTHROPIC_KEY"
models = ["claude-test"]
"#;

pub const EN_DICTIONARY: &str = "cat\t/ˈkæt/\nthe\t/ðə/\n";
pub const FR_DICTIONARY: &str = "chat\t/ʃa/\n";

/// Completion with `n` Q:/A: pairs.
pub fn qa_completion(n: usize) -> String {
    (1..=n)
        .map(|i| format!("Q: Question {}?\nA: Answer {}.", i, i))
        .collect::<Vec<_>>()
        .join("\n")
}

pub const LANGUAGE_COMPLETION: &str = r#"Here you go: {"word":"chat","question":"Le <b>chat</b> dort","translation":"the cat sleeps","answer":"cat"} Enjoy!"#;

pub fn generate_request(prompt: &str, mode: Option<&str>) -> Value {
    match mode {
        Some(mode) => json!({ "prompt": prompt, "mode": mode }),
        None => json!({ "prompt": prompt }),
    }
}
