use async_trait::async_trait;

use crate::{
    command::Intent,
    domain::{ConversionRequest, PackReference, SignalPack, TelegramPack},
    Result,
};

pub const INVALID_LINK_REPLY: &str = "Invalid sticker pack link provided. Run /start for help.";

pub const CONVERSION_FAILED_REPLY: &str =
    "Sorry, something went wrong while converting that sticker pack. Please try again later.";

/// Telegram HTML.
pub const HELP_TEXT: &str = "Hi there! I'm a simple bot that converts Telegram stickers to Signal stickers and back.
To begin, send me a link to either a sticker pack. Here's what a telegram sticker pack looks like:
<code>https://t.me/addstickers/animals</code>
And here's a Signal sticker pack:
<code>https://signal.art/addstickers/#pack_id=9acc9e8aba563d26a4994e69263e3b25&amp;pack_key=5a6dff3948c28efb9b7aaf93ecc375c69fc316e78077ed26867a14d10a0f6a12</code>

This bot is open-source software under the terms of the AGPLv3 license. You can find the source code at:
https://github.com/iomintz/Adhesive";

/// The service that actually downloads, re-encodes and re-uploads packs.
///
/// Both operations resolve to human-readable text (usually a link to the new
/// pack) which is relayed to the user verbatim.
#[async_trait]
pub trait StickerConverter: Send + Sync {
    async fn convert_to_signal(&self, pack: &TelegramPack) -> Result<String>;
    async fn convert_to_telegram(&self, pack: &SignalPack) -> Result<String>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Html(String),
    Text(String),
}

impl Reply {
    pub fn body(&self) -> &str {
        match self {
            Reply::Html(s) | Reply::Text(s) => s,
        }
    }
}

/// Runs one conversion. Converter errors are returned untouched.
pub async fn invoke(req: &ConversionRequest, converter: &dyn StickerConverter) -> Result<String> {
    match req.pack() {
        PackReference::Telegram(pack) => converter.convert_to_signal(pack).await,
        PackReference::Signal(pack) => converter.convert_to_telegram(pack).await,
    }
}

/// The reply owed for `intent`, or `None` when the bot should stay silent.
pub async fn reply_for(
    intent: &Intent,
    converter: &dyn StickerConverter,
) -> Result<Option<Reply>> {
    let reply = match intent {
        Intent::ShowHelp => Reply::Html(HELP_TEXT.to_string()),
        Intent::InvalidLink(_) => Reply::Text(INVALID_LINK_REPLY.to_string()),
        Intent::Convert(req) => Reply::Text(invoke(req, converter).await?),
        Intent::Unrecognized => return Ok(None),
    };
    Ok(Some(reply))
}
