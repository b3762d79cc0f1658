use anyhow::Result;
use teloxide::{prelude::*, utils::command::BotCommands};

use crate::ai::gemini::GeminiClient;
use crate::handlers::{help, send_template, submit_form};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Comandos disponibles:")]
pub enum Command {
    #[command(description = "mostrar la ayuda.")]
    Start,
    #[command(description = "mostrar la ayuda.")]
    Help,
    #[command(description = "recibir el formulario en blanco.")]
    Plantilla,
    #[command(description = "generar un pedido con el formulario del mensaje.")]
    Pedido(String),
}

impl Command {
    pub async fn dispatch(
        self,
        bot: Bot,
        msg: Message,
        generator: Option<GeminiClient>,
    ) -> Result<()> {
        match self {
            Command::Start | Command::Help => help(bot, msg).await?,
            Command::Plantilla => send_template(bot, msg).await?,
            Command::Pedido(_) => submit_form(bot, msg, generator).await?,
        }
        Ok(())
    }
}
