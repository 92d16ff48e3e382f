//! Request orchestration: resolve model, call the gateway, parse the result.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use card_core::{Mode, ParseError, Parsed};
use parking_lot::RwLock;
use thiserror::Error;

use crate::config::{ConfigError, ModelRegistry};
use crate::services::completion::{CompletionError, CompletionGateway, CompletionRequest};

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("completion timed out after {0:?}")]
    Timeout(Duration),

    #[error("upstream failure: {0}")]
    Upstream(#[from] CompletionError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// One generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    pub prompt: &'a str,
    pub mode: Mode,
    pub model: Option<&'a str>,
    /// Caller-supplied key, takes priority over configured credentials.
    pub credential: Option<&'a str>,
}

/// Coordinates the gateway and the parser for one request at a time.
pub struct Orchestrator {
    gateway: Arc<dyn CompletionGateway>,
    registry: Arc<ModelRegistry>,
    timeout: Duration,
    max_tokens: u32,
    /// Last key that produced a completion, per credential env var. Advisory only.
    last_working: RwLock<HashMap<String, String>>,
}

impl Orchestrator {
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        registry: Arc<ModelRegistry>,
        timeout: Duration,
        max_tokens: u32,
    ) -> Self {
        Self {
            gateway,
            registry,
            timeout,
            max_tokens,
            last_working: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Run a prompt through the gateway and parse the completion for `mode`.
    ///
    /// The parser only ever sees a complete completion: timeouts and gateway
    /// failures return before parsing.
    pub async fn handle(&self, request: GenerateRequest<'_>) -> Result<Parsed, OrchestratorError> {
        if request.prompt.trim().is_empty() {
            return Err(OrchestratorError::Validation("prompt must not be empty".to_string()));
        }

        let entry = self.registry.resolve(request.model)?;
        let credential = request
            .credential
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .or_else(|| entry.credential.clone())
            .or_else(|| self.last_working.read().get(&entry.credential_env).cloned())
            .ok_or_else(|| ConfigError::MissingCredential {
                model: entry.model.clone(),
                env: entry.credential_env.clone(),
            })?;

        let completion_request = CompletionRequest {
            prompt: request.prompt.to_string(),
            model: entry.model.clone(),
            credential,
            base_url: entry.base_url.clone(),
            max_tokens: self.max_tokens,
        };

        tracing::info!("Generating {} with {}", request.mode, entry.model);

        let completion = tokio::time::timeout(self.timeout, self.gateway.complete(&completion_request))
            .await
            .map_err(|_| OrchestratorError::Timeout(self.timeout))?
            .map_err(|e| {
                tracing::warn!("Completion from {} failed: {}", entry.model, e);
                e
            })?;

        self.last_working
            .write()
            .insert(entry.credential_env.clone(), completion_request.credential);

        tracing::debug!("Completion: {}", completion);

        card_core::parse(&completion, request.mode).map_err(|e| {
            tracing::warn!("Could not parse {} completion: {}", request.mode, e);
            OrchestratorError::Parse(e)
        })
    }
}
