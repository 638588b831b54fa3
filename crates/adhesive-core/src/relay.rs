//! Per-message handling, independent of the chat network.
//!
//! Each inbound text produces at most one outbound message: help, a conversion
//! result, the invalid-link notice, a generic failure notice, or nothing.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::{
    command::{CommandRouter, Intent},
    conversion::{reply_for, Reply, StickerConverter, CONVERSION_FAILED_REPLY},
    domain::{ChatId, MessageRef},
    messaging::{port::MessagingPort, types::ChatAction},
    Result,
};

pub struct Relay {
    router: CommandRouter,
    converter: Arc<dyn StickerConverter>,
    messenger: Arc<dyn MessagingPort>,
}

impl Relay {
    pub fn new(
        router: CommandRouter,
        converter: Arc<dyn StickerConverter>,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            router,
            converter,
            messenger,
        }
    }

    /// Routes `text`, computes the reply and sends it to `chat_id`.
    ///
    /// Only transport failures are returned; conversion failures are logged
    /// and answered with a generic notice.
    pub async fn handle_text(&self, chat_id: ChatId, text: &str) -> Result<Option<MessageRef>> {
        let intent = self.router.route(text);
        let Some(reply) = self.respond(chat_id, &intent).await else {
            return Ok(None);
        };

        let sent = match &reply {
            Reply::Html(html) => self.messenger.send_html(chat_id, html).await?,
            Reply::Text(text) => self.messenger.send_text(chat_id, text).await?,
        };
        Ok(Some(sent))
    }

    async fn respond(&self, chat_id: ChatId, intent: &Intent) -> Option<Reply> {
        match intent {
            Intent::Unrecognized => {
                debug!(chat_id = chat_id.0, "ignoring unrecognized message");
            }
            Intent::ShowHelp => {
                debug!(chat_id = chat_id.0, "sending help");
            }
            Intent::InvalidLink(e) => {
                info!(chat_id = chat_id.0, error = %e, "rejected sticker pack link");
            }
            Intent::Convert(req) => {
                info!(
                    chat_id = chat_id.0,
                    direction = req.direction().label(),
                    pack = %req.pack(),
                    "converting sticker pack"
                );
                if let Err(e) = self
                    .messenger
                    .send_chat_action(chat_id, ChatAction::Typing)
                    .await
                {
                    debug!(chat_id = chat_id.0, error = %e, "chat action failed");
                }
            }
        }

        match reply_for(intent, self.converter.as_ref()).await {
            Ok(reply) => {
                if let Intent::Convert(req) = intent {
                    info!(
                        chat_id = chat_id.0,
                        direction = req.direction().label(),
                        pack = %req.pack(),
                        "conversion finished"
                    );
                }
                reply
            }
            Err(e) => {
                error!(chat_id = chat_id.0, error = %e, "sticker pack conversion failed");
                Some(Reply::Text(CONVERSION_FAILED_REPLY.to_string()))
            }
        }
    }
}
