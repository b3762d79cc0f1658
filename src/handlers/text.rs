use anyhow::Result;
use teloxide::{prelude::*, types::ParseMode};

use crate::messages::{HELP_TEXT, TEMPLATE_INTRO};
use crate::text_utils::form_template;

pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, HELP_TEXT)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

pub async fn send_template(bot: Bot, msg: Message) -> Result<()> {
    tracing::debug!(chat_id = msg.chat.id.0, "Sending blank form");
    bot.send_message(msg.chat.id, TEMPLATE_INTRO).await?;
    bot.send_message(msg.chat.id, format!("/pedido\n{}", form_template()))
        .await?;
    Ok(())
}
