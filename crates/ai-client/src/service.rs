//! The reasoning service seam and its OpenAI-compatible implementation.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{AiClientError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// One system + user exchange. No conversation state is kept between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    /// Ask the service to reply with a JSON object
    pub expects_json: bool,
}

/// A language model that turns a prompt into free-form text.
///
/// Output is untrusted; callers validate everything they get back.
#[async_trait]
pub trait ReasoningService: Send + Sync {
    /// Returns the name of this service (for logging/debugging)
    fn name(&self) -> &str;

    /// Send the prompt and return the raw text of the reply
    async fn complete(&self, prompt: &Prompt) -> Result<String>;
}

/// Connection settings for an OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl OpenAiConfig {
    /// Reads `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_MODEL`.
    /// Unset or empty variables fall back to the defaults.
    pub fn from_env() -> Self {
        let non_empty = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            base_url: non_empty("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            api_key: non_empty("OPENAI_API_KEY"),
            model: non_empty("OPENAI_MODEL").unwrap_or(defaults.model),
            timeout: defaults.timeout,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// `ReasoningService` over the `chat/completions` endpoint of any
/// OpenAI-compatible API.
pub struct OpenAiReasoningService {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiReasoningService {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(AiClientError::Config("base URL is empty".to_string()));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiClientError::Config(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Initializing reasoning service: base_url={}, model={}",
            config.base_url, config.model
        );
        if config.api_key.is_none() {
            warn!("OPENAI_API_KEY is not set; requests will be sent without authorization");
        }

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(OpenAiConfig::from_env())
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Minimal round trip to check credentials and connectivity.
    /// Returns the model's (short) answer.
    pub async fn ping(&self) -> Result<String> {
        let prompt = Prompt {
            system: "You are a helpful assistant that can answer questions and help with tasks."
                .to_string(),
            user: "Did this call work? Please respond with a single word answer.".to_string(),
            expects_json: false,
        };
        self.complete(&prompt).await
    }
}

#[async_trait]
impl ReasoningService for OpenAiReasoningService {
    fn name(&self) -> &str {
        "OpenAiReasoningService"
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            response_format: prompt.expects_json.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let request = self.client.post(self.api_url("chat/completions")).json(&body);
        let response = self.add_auth_header(request).send().await.map_err(|e| {
            error!("Failed to send request to {}: {}", self.config.base_url, e);
            if e.is_connect() {
                AiClientError::Connection(format!(
                    "Cannot connect to reasoning service at {}",
                    self.config.base_url
                ))
            } else if e.is_timeout() {
                AiClientError::Connection(format!(
                    "Request timed out after {:?}",
                    self.config.timeout
                ))
            } else {
                AiClientError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Failed to read reasoning service response: {}", e);
            AiClientError::Connection(format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            error!("Reasoning service returned HTTP {}", status.as_u16());
            return Err(AiClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| AiClientError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AiClientError::EmptyResponse)?;

        debug!("Received {} chars from {}", content.len(), self.config.model);
        Ok(content)
    }
}
