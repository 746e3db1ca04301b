//! Text-generation abstraction: the external language-model endpoint.

use crate::error::GeneratorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One turn of a chat-style prompt, matching the wire shape
/// `{"messages": [{"role": ..., "content": ...}]}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role: "system" or "user"
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Creates a system-role message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Abstraction over the external text-generation service.
///
/// # Implementations
///
/// - **Production**: `HttpTextGenerator` - POSTs to a configured inference
///   endpoint or caller-operated proxy
/// - **Simulation**: `ScriptedGenerator` (in `mayday_sim`) - canned replies
///   with fault injection
///
/// # Contract
///
/// Given a prompt, returns a natural-language string or fails. Success is a
/// single generated text; the engine treats any failure as final for that
/// call (no retries).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a completion for the given chat prompt.
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GeneratorError>;

    /// Sends a trivial test prompt to validate configuration.
    ///
    /// Used only before a session starts; the raw response text is reported
    /// to the setup surface. A failure here is fatal to session start.
    async fn probe(&self) -> Result<String, GeneratorError> {
        self.generate(&[ChatMessage::user(
            "Connection test. Reply with one short sentence.",
        )])
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GeneratorError> {
            Ok(messages.last().map(|m| m.content.clone()).unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn probe_uses_generate() {
        let text = Echo.probe().await.unwrap();
        assert!(text.contains("Connection test"));
    }

    #[test]
    fn chat_message_wire_shape() {
        let msg = ChatMessage::system("be brief");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "system");
        assert_eq!(value["content"], "be brief");
    }
}
