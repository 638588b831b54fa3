use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::ChatAction,
    Result,
};

/// Outbound half of the chat transport.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef>;
    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()>;
}
