use reqwest::{ Client as HttpClient, Response };
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use tokio_stream::wrappers::ReceiverStream;
use tokio::sync::mpsc;
use log::{ debug, warn };
use super::{ build_messages, parse_stream_line, ChatClient, FragmentStream, LineBuffer };
use crate::llm::{ ChatError, LlmConfig };
use crate::models::chat::{ ChatRequest, ChatResponse, Message, ModelList };

#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: HttpClient,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(base_url: Option<String>, model: Option<String>) -> Result<Self, ChatError> {
        let mut config = LlmConfig::default();
        if let Some(url) = base_url {
            config.base_url = url;
        }
        if let Some(model) = model {
            config.model = model;
        }
        Self::from_config(&config)
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, ChatError> {
        config.validate()?;
        // read_timeout bounds each socket read, which is what keeps a long stream alive
        let http = HttpClient::builder()
            .connect_timeout(config.timeout)
            .read_timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout: config.timeout,
        })
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    async fn post_chat(
        &self,
        message: &str,
        system_prompt: Option<&str>,
        history: &[Message],
        stream: bool
    ) -> Result<Response, ChatError> {
        let url = self.endpoint("/api/chat");
        let req = ChatRequest {
            model: &self.model,
            stream,
            messages: build_messages(message, system_prompt, history)?,
        };
        debug!("POST {} ({} messages, stream={})", url, req.messages.len(), stream);

        let mut builder = self.http.post(&url).json(&req);
        if !stream {
            builder = builder.timeout(self.timeout);
        }
        let resp = builder.send().await?;
        check_status(resp).await
    }
}

async fn check_status(resp: Response) -> Result<Response, ChatError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = match resp.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("Could not read HTTP {} error body: {}", status, e);
            format!("<unreadable body: {}>", e)
        }
    };
    Err(ChatError::Http { status: status.as_u16(), body })
}

/// Sends one decoded line downstream. Returns false once the stream should stop.
async fn forward_line(tx: &mpsc::Sender<Result<String, ChatError>>, line: &[u8]) -> bool {
    match parse_stream_line(line) {
        Ok(Some(fragment)) => tx.send(Ok(fragment)).await.is_ok(),
        Ok(None) => true,
        Err(e) => {
            warn!("Dropping chat stream: {}", e);
            let _ = tx.send(Err(e)).await;
            false
        }
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn chat(
        &self,
        message: &str,
        system_prompt: Option<&str>,
        history: &[Message]
    ) -> Result<ChatResponse, ChatError> {
        let resp = self.post_chat(message, system_prompt, history, false).await?;
        let body = resp.bytes().await?;
        let data = serde_json::from_slice::<ChatResponse>(&body)?;
        Ok(data)
    }

    async fn chat_stream(
        &self,
        message: &str,
        system_prompt: Option<&str>,
        history: &[Message]
    ) -> Result<FragmentStream, ChatError> {
        let response = self.post_chat(message, system_prompt, history, true).await?;
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let mut bytes = response.bytes_stream();
            let mut buffer = LineBuffer::default();

            loop {
                // a dropped receiver must close the connection even while the server is silent
                let chunk_result = tokio::select! {
                    _ = tx.closed() => {
                        debug!("Chat stream dropped by the caller");
                        return;
                    }
                    next = bytes.next() => match next {
                        Some(chunk_result) => chunk_result,
                        None => break,
                    },
                };
                match chunk_result {
                    Ok(chunk) => {
                        for line in buffer.push(&chunk) {
                            if !forward_line(&tx, &line).await {
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Err(ChatError::from(e))).await;
                        return;
                    }
                }
            }

            if let Some(rest) = buffer.finish() {
                if !forward_line(&tx, &rest).await {
                    return;
                }
            }
            debug!("Chat stream reached end of body");
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    async fn list_models(&self) -> Result<ModelList, ChatError> {
        let url = self.endpoint("/api/tags");
        debug!("GET {}", url);
        let resp = self.http.get(&url).timeout(self.timeout).send().await?;
        let body = check_status(resp).await?.bytes().await?;
        let data = serde_json::from_slice::<ModelList>(&body)?;
        Ok(data)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
