use anyhow::Result;
use teloxide::{
    prelude::*,
    types::{ChatId, InputFile, ParseMode},
    utils::html,
};

use crate::ai::gemini::GeminiClient;
use crate::docx::{export_docx, DOCX_FILE_NAME};
use crate::generator::{submit, TextGenerator};
use crate::messages::{
    missing_fields_text, ANALYSIS_HEADER, DOCUMENT_CAPTION, GENERATION_DISABLED, SCRIPT_HEADER,
};
use crate::pedido::{PedidoRequest, PedidoResult, Submission};
use crate::text_utils::{chunk_message, parse_form, strip_command};

/// Stays below Telegram's 4096 character limit once the header and HTML
/// escaping are added.
const MESSAGE_CHUNK_LIMIT: usize = 3500;

/// Treat the message text as a filled-in form.
pub async fn submit_form(bot: Bot, msg: Message, generator: Option<GeminiClient>) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let Some(generator) = generator else {
        bot.send_message(msg.chat.id, GENERATION_DISABLED).await?;
        return Ok(());
    };

    let req = parse_form(strip_command(text));
    tracing::debug!(chat_id = msg.chat.id.0, model = generator.model(), "Received pedido form");
    respond_to_form(bot, msg.chat.id, &generator, &req).await
}

pub async fn respond_to_form<G>(
    bot: Bot,
    chat_id: ChatId,
    generator: &G,
    req: &PedidoRequest,
) -> Result<()>
where
    G: TextGenerator + ?Sized,
{
    match submit(generator, req).await {
        Submission::MissingFields(missing) => {
            bot.send_message(chat_id, missing_fields_text(&missing))
                .await?;
        }
        Submission::Generated(result) => {
            send_result(bot, chat_id, &result).await?;
        }
    }
    Ok(())
}

/// Send the script, the analysis and the `.docx` export.
pub async fn send_result(bot: Bot, chat_id: ChatId, result: &PedidoResult) -> Result<()> {
    send_section(&bot, chat_id, SCRIPT_HEADER, &result.guion).await?;
    if !result.analisis.is_empty() {
        send_section(&bot, chat_id, ANALYSIS_HEADER, &result.analisis).await?;
    }

    let bytes = export_docx(&result.guion, &result.analisis)?;
    tracing::debug!(chat_id = chat_id.0, size = bytes.len(), "Sending docx");
    bot.send_document(chat_id, InputFile::memory(bytes).file_name(DOCX_FILE_NAME))
        .caption(DOCUMENT_CAPTION)
        .await?;
    Ok(())
}

async fn send_section(bot: &Bot, chat_id: ChatId, header: &str, body: &str) -> Result<()> {
    let chunks = chunk_message(body, MESSAGE_CHUNK_LIMIT);
    if chunks.is_empty() {
        bot.send_message(chat_id, header)
            .parse_mode(ParseMode::Html)
            .await?;
        return Ok(());
    }
    for (i, chunk) in chunks.iter().enumerate() {
        let text = if i == 0 {
            format!("{header}\n\n{}", html::escape(chunk))
        } else {
            html::escape(chunk)
        };
        bot.send_message(chat_id, text)
            .parse_mode(ParseMode::Html)
            .await?;
    }
    Ok(())
}
