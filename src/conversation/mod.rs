use log::debug;
use std::sync::Arc;
use crate::llm::chat::{ new_client, ChatClient };
use crate::llm::{ ChatError, LlmConfig };
use crate::models::chat::{ Message, Role };

/// A single linear conversation. The system prompt, when given, stays at index 0
/// for the whole life of the manager.
pub struct ConversationManager {
    client: Arc<dyn ChatClient>,
    history: Vec<Message>,
}

impl ConversationManager {
    pub fn new(client: Arc<dyn ChatClient>, system_prompt: Option<&str>) -> Self {
        let history = system_prompt
            .filter(|p| !p.is_empty())
            .map(|p| vec![Message::system(p)])
            .unwrap_or_default();
        Self { client, history }
    }

    pub fn connect(config: &LlmConfig, system_prompt: Option<&str>) -> Result<Self, ChatError> {
        let client = new_client(config)?;
        Ok(Self::new(client, system_prompt))
    }

    /// Sends `text` with the whole history as context. History only grows once the
    /// reply is in hand, so a failed call leaves it exactly as it was.
    pub async fn send_message(&mut self, text: &str) -> Result<String, ChatError> {
        let response = self.client.chat(text, None, &self.history).await?;
        let reply = response.message.into_content();

        self.history.push(Message::user(text));
        self.history.push(Message::assistant(reply.clone()));
        debug!("Conversation now holds {} messages", self.history.len());

        Ok(reply)
    }

    pub fn clear_history(&mut self) {
        self.history.retain(|m| m.role() == Role::System);
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.history
            .first()
            .filter(|m| m.role() == Role::System)
            .map(|m| m.content())
    }

    pub fn exchange_count(&self) -> usize {
        self.history
            .iter()
            .filter(|m| m.role() == Role::User)
            .count()
    }

    pub fn client(&self) -> &dyn ChatClient {
        self.client.as_ref()
    }
}
