//! Telegram transport: long polling in, plain-text replies out

use crate::error::AppResult;
use crate::repositories::BalanceLedger;
use crate::services::{handle_text, Reply};
use std::sync::Arc;
use std::time::Duration;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tracing::{debug, error, info};

/// Log in, then consume updates until Ctrl+C
pub async fn run(bot: Bot, ledger: Arc<dyn BalanceLedger>, poll_timeout: Duration) -> AppResult<()> {
    let me = bot.get_me().await?;
    info!("Authorized on account {}", me.username());

    let listener = Polling::builder(bot.clone())
        .timeout(poll_timeout)
        .delete_webhook()
        .await
        .build();

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ledger])
        // one key for every update: strictly one message at a time, in arrival order
        .distribution_function(|_| Some(()))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    Ok(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    ledger: Arc<dyn BalanceLedger>,
) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        debug!(chat_id = msg.chat.id.0, "Skipping message without a sender");
        return Ok(());
    };

    let user_id = user.id.0 as i64;
    // Stickers, photos and the like carry no text and get the number prompt
    let text = msg.text().unwrap_or_default();
    debug!(user_id, chat_id = msg.chat.id.0, text, "Message received");

    let reply = handle_text(ledger.as_ref(), user_id, text).await;
    send_reply(&bot, msg.chat.id, &reply).await;

    Ok(())
}

/// Deliver a reply; a failed send is logged and dropped
pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: &Reply) {
    if let Err(e) = bot.send_message(chat_id, reply.to_string()).await {
        error!(chat_id = chat_id.0, error = %e, "Failed to send reply");
    }
}
