use std::sync::Arc;

use teloxide::prelude::*;

use adhesive_core::domain::ChatId;

use crate::router::AppState;

pub async fn handle_text(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = ChatId(msg.chat.id.0);

    // Transport failures end this message only; the dispatcher keeps running.
    if let Err(e) = state.relay.handle_text(chat_id, text).await {
        tracing::warn!(chat_id = chat_id.0, error = %e, "failed to deliver reply");
    }

    Ok(())
}
