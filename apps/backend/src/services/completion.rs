//! Completion gateway: prompt in, raw completion text out.
//!
//! [`HttpCompletionGateway`] routes on the model identifier's prefix:
//! - `anthropic/<model>` or `claude-*`: Anthropic Messages API
//! - `openrouter/<model>`: OpenRouter chat completions
//! - `gemini/<model>`: Google's OpenAI-compatible endpoint
//! - `openai/<model>` or anything else: OpenAI chat completions

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("rate limited by provider")]
    RateLimited,

    #[error("provider rejected credential: {0}")]
    Unauthorized(String),

    #[error("provider returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("request failed: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("provider returned an empty completion")]
    EmptyCompletion,
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CompletionError::Timeout
        } else {
            CompletionError::Network(e.to_string())
        }
    }
}

/// One prompt to send upstream.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
    pub credential: String,
    pub base_url: Option<String>,
    pub max_tokens: u32,
}

/// Anything that can turn a prompt into completion text.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provider {
    Anthropic,
    OpenRouter,
    Gemini,
    OpenAi,
}

impl Provider {
    /// Split a configured identifier into provider and upstream model name.
    fn route(model: &str) -> (Self, &str) {
        if let Some(rest) = model.strip_prefix("anthropic/") {
            (Self::Anthropic, rest)
        } else if model.starts_with("claude-") {
            (Self::Anthropic, model)
        } else if let Some(rest) = model.strip_prefix("openrouter/") {
            (Self::OpenRouter, rest)
        } else if let Some(rest) = model.strip_prefix("gemini/") {
            (Self::Gemini, rest)
        } else if let Some(rest) = model.strip_prefix("openai/") {
            (Self::OpenAi, rest)
        } else {
            (Self::OpenAi, model)
        }
    }

    fn default_base_url(self) -> &'static str {
        match self {
            Self::Anthropic => "https://api.anthropic.com/v1",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
            Self::OpenAi => "https://api.openai.com/v1",
        }
    }
}

/// Calls hosted LLM APIs over HTTPS.
pub struct HttpCompletionGateway {
    client: reqwest::Client,
}

impl HttpCompletionGateway {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn anthropic(
        &self,
        base_url: &str,
        model: &str,
        request: &CompletionRequest,
    ) -> Result<String, CompletionError> {
        let body = json!({
            "model": model,
            "max_tokens": request.max_tokens,
            "messages": [{ "role": "user", "content": request.prompt }],
        });

        let response = self
            .client
            .post(format!("{}/messages", base_url))
            .header("x-api-key", &request.credential)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await?;

        let json = read_json(response).await?;
        extract_text(&json["content"][0]["text"])
    }

    async fn chat_completions(
        &self,
        base_url: &str,
        model: &str,
        request: &CompletionRequest,
    ) -> Result<String, CompletionError> {
        let body = json!({
            "model": model,
            "max_tokens": request.max_tokens,
            "messages": [{ "role": "user", "content": request.prompt }],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", base_url))
            .bearer_auth(&request.credential)
            .json(&body)
            .send()
            .await?;

        let json = read_json(response).await?;
        extract_text(&json["choices"][0]["message"]["content"])
    }
}

impl Default for HttpCompletionGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionGateway for HttpCompletionGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let (provider, model) = Provider::route(&request.model);
        let base_url = request
            .base_url
            .as_deref()
            .unwrap_or_else(|| provider.default_base_url())
            .trim_end_matches('/');

        tracing::debug!("Requesting completion from {:?} model {}", provider, model);

        match provider {
            Provider::Anthropic => self.anthropic(base_url, model, request).await,
            _ => self.chat_completions(base_url, model, request).await,
        }
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, CompletionError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_status(status, body));
    }

    response
        .json()
        .await
        .map_err(|e| CompletionError::MalformedResponse(e.to_string()))
}

fn classify_status(status: StatusCode, body: String) -> CompletionError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionError::Unauthorized(body),
        _ => CompletionError::Upstream {
            status: status.as_u16(),
            body,
        },
    }
}

fn extract_text(value: &Value) -> Result<String, CompletionError> {
    let text = value
        .as_str()
        .ok_or_else(|| CompletionError::MalformedResponse("missing completion text".to_string()))?;

    if text.trim().is_empty() {
        return Err(CompletionError::EmptyCompletion);
    }

    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_by_prefix() {
        assert_eq!(
            Provider::route("anthropic/claude-3-haiku"),
            (Provider::Anthropic, "claude-3-haiku")
        );
        assert_eq!(
            Provider::route("claude-3-5-sonnet-20240620"),
            (Provider::Anthropic, "claude-3-5-sonnet-20240620")
        );
        assert_eq!(
            Provider::route("openrouter/google/gemini-exp-1206:free"),
            (Provider::OpenRouter, "google/gemini-exp-1206:free")
        );
        assert_eq!(
            Provider::route("gemini/gemini-exp-1206"),
            (Provider::Gemini, "gemini-exp-1206")
        );
        assert_eq!(Provider::route("gpt-4o-mini"), (Provider::OpenAi, "gpt-4o-mini"));
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            CompletionError::RateLimited
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, "bad key".into()),
            CompletionError::Unauthorized(b) if b == "bad key"
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, "down".into()),
            CompletionError::Upstream { status: 502, .. }
        ));
    }

    #[test]
    fn test_extract_text() {
        let body = json!({ "choices": [{ "message": { "content": "Q: a\nA: b" } }] });
        assert_eq!(
            extract_text(&body["choices"][0]["message"]["content"]).unwrap(),
            "Q: a\nA: b"
        );
        assert!(matches!(
            extract_text(&json!("   ")),
            Err(CompletionError::EmptyCompletion)
        ));
        assert!(matches!(
            extract_text(&body["content"][0]["text"]),
            Err(CompletionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_gateway_is_object_safe() {
        let _gateway: Box<dyn CompletionGateway> = Box::new(HttpCompletionGateway::new());
    }
}
