//! Application configuration, resolved once at startup.
//!
//! Everything comes from the environment (optionally seeded from `.env`),
//! except the model-to-credential mapping which lives in a TOML file:
//!
//! ```toml
//! [[providers]]
//! credential_env = "OPENROUTER_API_KEY"
//! models = ["openrouter/anthropic/claude-3-haiku-20240307"]
//!
//! [[providers]]
//! credential_env = "GEMINI_API_KEY"
//! models = ["gemini/gemini-2.0-flash"]
//! base_url = "https://generativelanguage.googleapis.com/v1beta/openai"
//! ```
//!
//! The first model of the first provider is the default.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid model config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("model config lists no providers")]
    NoProviders,

    #[error("provider entry {0} has an empty credential_env")]
    EmptyCredentialEnv(usize),

    #[error("provider {0} lists no models")]
    NoModels(String),

    #[error("model {0} is configured more than once")]
    DuplicateModel(String),

    #[error("model {0} is not configured")]
    UnknownModel(String),

    #[error("no credential available for model {model} (set {env} or send X-API-Key)")]
    MissingCredential { model: String, env: String },
}

/// Process-wide settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub models_config: PathBuf,
    pub llm_timeout: Duration,
    pub llm_max_tokens: u32,
    pub ipa_dict_dir: Option<PathBuf>,
    pub aws_region: String,
    pub polly_voice: Option<String>,
    pub database_url: Option<String>,
}

impl AppConfig {
    /// Read settings from the environment.
    ///
    /// Recognised variables:
    /// - HOST, PORT: bind address (0.0.0.0:3000)
    /// - UPLOAD_DIR: where uploaded documents are kept (uploads)
    /// - MAX_UPLOAD_BYTES: request body limit for uploads (16 MiB)
    /// - MODELS_CONFIG: model mapping file (models.toml)
    /// - LLM_TIMEOUT_SECS, LLM_MAX_TOKENS: completion bounds (60, 1024)
    /// - IPA_DICT_DIR: pronunciation dictionaries, IPA disabled when unset
    /// - AWS_REGION, POLLY_VOICE: speech synthesis (us-east-1, per-language voice)
    /// - DATABASE_URL: optional Postgres datastore
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 3000)?,
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "uploads")),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", 16 * 1024 * 1024)?,
            models_config: PathBuf::from(env_or("MODELS_CONFIG", "models.toml")),
            llm_timeout: Duration::from_secs(env_parse("LLM_TIMEOUT_SECS", 60)?),
            llm_max_tokens: env_parse("LLM_MAX_TOKENS", 1024)?,
            ipa_dict_dir: env_opt("IPA_DICT_DIR").map(PathBuf::from),
            aws_region: env_or("AWS_REGION", "us-east-1"),
            polly_voice: env_opt("POLLY_VOICE"),
            database_url: env_opt("DATABASE_URL"),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn env_parse<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env_opt(name) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

#[derive(Debug, Deserialize)]
struct ModelsFile {
    #[serde(default)]
    providers: Vec<ProviderEntry>,
}

#[derive(Debug, Deserialize)]
struct ProviderEntry {
    credential_env: String,
    #[serde(default)]
    models: Vec<String>,
    #[serde(default)]
    base_url: Option<String>,
}

/// A configured model and the credential it uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub model: String,
    pub credential_env: String,
    /// Value of `credential_env` at startup, if set.
    pub credential: Option<String>,
    pub base_url: Option<String>,
}

/// Ordered model-to-credential mapping.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    entries: Vec<ModelEntry>,
}

impl ModelRegistry {
    /// Load and validate the mapping file, reading credentials from the process environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, env_opt)
    }

    /// Parse and validate a mapping, resolving each credential through `lookup`.
    pub fn from_toml_str(
        contents: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file: ModelsFile = toml::from_str(contents)?;
        if file.providers.is_empty() {
            return Err(ConfigError::NoProviders);
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (idx, provider) in file.providers.into_iter().enumerate() {
            let env = provider.credential_env.trim().to_string();
            if env.is_empty() {
                return Err(ConfigError::EmptyCredentialEnv(idx));
            }
            if provider.models.is_empty() {
                return Err(ConfigError::NoModels(env));
            }

            let credential = lookup(&env);
            if credential.is_none() {
                tracing::warn!("{} is not set; its models need a per-request key", env);
            }

            for model in provider.models {
                let model = model.trim().to_string();
                if !seen.insert(model.clone()) {
                    return Err(ConfigError::DuplicateModel(model));
                }
                entries.push(ModelEntry {
                    model,
                    credential_env: env.clone(),
                    credential: credential.clone(),
                    base_url: provider.base_url.clone(),
                });
            }
        }

        Ok(Self { entries })
    }

    /// Look up a model, or the default when none is requested.
    pub fn resolve(&self, model: Option<&str>) -> Result<&ModelEntry, ConfigError> {
        match model.map(str::trim).filter(|m| !m.is_empty()) {
            None => Ok(&self.entries[0]),
            Some(name) => self
                .entries
                .iter()
                .find(|e| e.model == name)
                .ok_or_else(|| ConfigError::UnknownModel(name.to_string())),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.entries[0].model
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.model.as_str())
    }
}
