use serde::{ Serialize, Deserialize };
use serde_json::Value;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat turn. Fields are private so a message cannot change after it is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub stream: bool,
    pub messages: Vec<Message>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatResponse {
    pub message: Message,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub total_duration: Option<u64>,
    #[serde(default)]
    pub eval_count: Option<u64>,
    /// Whatever else the server sends; kept but never interpreted.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl ChatResponse {
    pub fn content(&self) -> &str {
        self.message.content()
    }
}

#[derive(Debug, Deserialize)]
pub struct StreamFragment {
    #[serde(default)]
    pub content: Option<String>,
}

/// One NDJSON line of a streamed `/api/chat` response.
#[derive(Debug, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub message: Option<StreamFragment>,
    #[serde(default)]
    pub done: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub modified_at: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub digest: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

impl ModelList {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hej")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hej"}"#);
    }

    #[test]
    fn chat_response_keeps_unknown_metadata() {
        let body = r#"{
            "model": "bielik",
            "message": {"role": "assistant", "content": "Dzień dobry"},
            "done": true,
            "prompt_eval_count": 12
        }"#;
        let resp: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.content(), "Dzień dobry");
        assert_eq!(resp.message.role(), Role::Assistant);
        assert_eq!(resp.done, Some(true));
        assert_eq!(resp.extra.get("prompt_eval_count"), Some(&Value::from(12)));
    }

    #[test]
    fn chat_response_requires_message() {
        assert!(serde_json::from_str::<ChatResponse>(r#"{"done":true}"#).is_err());
    }

    #[test]
    fn model_list_defaults_to_empty() {
        let list: ModelList = serde_json::from_str("{}").unwrap();
        assert!(list.models.is_empty());
    }
}
