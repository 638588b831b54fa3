//! Telegram update handlers.
//!
//! Only text messages matter; everything else (stickers, photos, service
//! messages) is ignored without a reply.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use crate::router::AppState;

mod text;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    if msg.text().is_some() {
        return text::handle_text(msg, state).await;
    }

    tracing::trace!(chat_id = msg.chat.id.0, "ignoring non-text message");
    Ok(())
}
