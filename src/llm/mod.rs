pub mod chat;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "SpeakLeash/bielik-11b-v2.2-instruct:Q4_K_M";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("cannot connect to the chat server: {0}")]
    Connection(#[source] reqwest::Error),
    #[error("request to the chat server timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("chat server returned HTTP {status}: {body}")]
    Http {
        status: u16,
        body: String,
    },
    #[error("invalid response from the chat server: {0}")]
    Decode(String),
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    pub fn is_connection(&self) -> bool {
        matches!(self, ChatError::Connection(_))
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Timeout(err)
        } else if err.is_connect() {
            ChatError::Connection(err)
        } else if err.is_decode() {
            ChatError::Decode(err.to_string())
        } else {
            ChatError::Transport(err)
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Decode(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LlmConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        let url = Url::parse(&self.base_url).map_err(|e|
            ChatError::Config(format!("invalid base URL '{}': {}", self.base_url, e))
        )?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(
                ChatError::Config(format!("unsupported URL scheme '{}'", url.scheme()))
            );
        }
        if self.model.trim().is_empty() {
            return Err(ChatError::Config("model name must not be empty".into()));
        }
        if self.timeout.is_zero() {
            return Err(ChatError::Config("timeout must be greater than zero".into()));
        }
        Ok(())
    }
}
