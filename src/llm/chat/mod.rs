pub mod ollama;

use async_trait::async_trait;
use futures::{ Stream, StreamExt };
use log::debug;
use std::pin::Pin;
use std::sync::Arc;
use super::{ ChatError, LlmConfig };
use self::ollama::OllamaClient;
use crate::models::chat::{ ChatResponse, Message, ModelList, StreamChunk };

/// Assistant content fragments in arrival order. Ends when the server closes the body.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send>>;

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn chat(
        &self,
        message: &str,
        system_prompt: Option<&str>,
        history: &[Message]
    ) -> Result<ChatResponse, ChatError>;

    async fn chat_stream(
        &self,
        message: &str,
        system_prompt: Option<&str>,
        history: &[Message]
    ) -> Result<FragmentStream, ChatError>;

    async fn list_models(&self) -> Result<ModelList, ChatError>;

    fn model(&self) -> &str;
    fn base_url(&self) -> &str;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, ChatError> {
    let client = OllamaClient::from_config(config)?;
    Ok(Arc::new(client))
}

/// Lays out `[system?] + history + [user]` for one request.
pub fn build_messages(
    message: &str,
    system_prompt: Option<&str>,
    history: &[Message]
) -> Result<Vec<Message>, ChatError> {
    if message.trim().is_empty() {
        return Err(ChatError::EmptyMessage);
    }

    let mut messages = Vec::with_capacity(history.len() + 2);
    if let Some(prompt) = system_prompt.filter(|p| !p.is_empty()) {
        messages.push(Message::system(prompt));
    }
    messages.extend_from_slice(history);
    messages.push(Message::user(message));
    Ok(messages)
}

/// Decodes one NDJSON line. Blank lines and lines without content give `Ok(None)`.
/// Parsing straight from bytes keeps invalid UTF-8 a decode error.
pub fn parse_stream_line(line: &[u8]) -> Result<Option<String>, ChatError> {
    if line.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let chunk: StreamChunk = serde_json::from_slice(line).map_err(|e|
        ChatError::Decode(format!("bad stream line '{}': {}", String::from_utf8_lossy(line), e))
    )?;
    if chunk.done == Some(true) {
        debug!("Server marked the stream as done");
    }

    Ok(
        chunk.message
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty())
    )
}

/// Splits a byte stream into lines. Works on raw bytes so multi-byte
/// characters cut across network chunks survive.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        self.pending.extend_from_slice(bytes);
        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|b| *b == b'\n') {
            let end = start + offset;
            lines.push(strip_cr(&self.pending[start..end]).to_vec());
            start = end + 1;
        }
        self.pending.drain(..start);
        lines
    }

    /// Whatever is left after the last newline.
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(strip_cr(&rest).to_vec())
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

pub async fn collect_fragments(mut stream: FragmentStream) -> Result<String, ChatError> {
    let mut full = String::new();
    while let Some(fragment) = stream.next().await {
        full.push_str(&fragment?);
    }
    Ok(full)
}
