use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*, types::BotCommand};

use adhesive_core::{
    command::CommandRouter, config::Config, conversion::StickerConverter,
    messaging::port::MessagingPort, relay::Relay,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

pub async fn run_polling(
    cfg: Arc<Config>,
    converter: Arc<dyn StickerConverter>,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // Fails fast on a bad token.
    let me = bot.get_me().await?;
    tracing::info!(
        username = %me.username(),
        converter = %cfg.converter_endpoint,
        "adhesive started"
    );

    if let Err(e) = bot
        .set_my_commands(vec![BotCommand::new(
            "start",
            "How to convert a sticker pack",
        )])
        .await
    {
        tracing::warn!(error = %e, "failed to register bot commands");
    }

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let relay = Relay::new(CommandRouter::new()?, converter, messenger);

    let state = Arc::new(AppState {
        relay: Arc::new(relay),
    });

    let handler =
        dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    // No per-chat queue: a slow conversion must not hold back `/start` or a
    // second link from the same chat.
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .distribution_function(|_| None::<std::convert::Infallible>)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("adhesive stopped");
    Ok(())
}
