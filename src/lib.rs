use std::future::Future;
use std::sync::Arc;

use anyhow::{bail, Result};
use teloxide::{dispatching::UpdateHandler, prelude::*};
use tokio::task::JoinHandle;

pub mod ai;
pub mod api;
pub mod commands;
pub mod config;
pub mod docx;
pub mod generator;
pub mod handlers;
pub mod messages;
pub mod pedido;
pub mod text_utils;

pub use ai::gemini::GeminiClient;
pub use ai::prompts::build_prompt;
pub use api::{router as api_router, ApiConfig};
pub use commands::Command;
pub use config::Config;
pub use docx::export_docx;
pub use generator::{generate_pedido, submit, TextGenerator};
pub use handlers::{help, respond_to_form, send_result, send_template, submit_form};
pub use pedido::{Field, PedidoRequest, PedidoResult, Submission};
pub use text_utils::{parse_form, split_response};

/// Update handler tree for the bot. Dependencies: `Option<GeminiClient>`.
pub fn schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message()
        .branch(dptree::entry().filter_command::<Command>().endpoint(
            |bot: Bot, msg: Message, cmd: Command, generator: Option<GeminiClient>| async move {
                cmd.dispatch(bot, msg, generator).await
            },
        ))
        .branch(
            dptree::filter(|msg: Message| msg.text().is_some()).endpoint(submit_form),
        )
}

// ──────────────────────────────────────────────────────────────
// Main application setup
// ──────────────────────────────────────────────────────────────

pub async fn run() -> Result<()> {
    // Load .env file if it exists (for local development)
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting pedido bot...");

    let config = Config::from_env();

    let generator = config.ai.as_ref().map(GeminiClient::from_config);
    match &generator {
        Some(client) => tracing::info!(model = client.model(), "Generation enabled"),
        None => tracing::warn!("GOOGLE_API_KEY not set, generation disabled"),
    }

    if config.telegram_token.is_none() && config.api.is_none() {
        bail!("nothing to run: set TELOXIDE_TOKEN and/or PEDIDO_API_ADDR");
    }

    let api_task = config.api.clone().map(|server| {
        let app = api_router(
            generator.clone().map(Arc::new),
            ApiConfig {
                rate_limit_per_second: server.rate_limit_per_second,
            },
        );
        tokio::spawn(async move { api::serve(&server.addr, app).await })
    });

    if let Some(token) = config.telegram_token {
        let bot = Bot::new(token);
        let mut dispatcher = Dispatcher::builder(bot, schema())
            .dependencies(dptree::deps![generator])
            .enable_ctrlc_handler()
            .build();
        let polling = async move { dispatcher.dispatch().await };
        match api_task {
            Some(task) => run_alongside_api(polling, task).await?,
            None => polling.await,
        }
    } else if let Some(task) = api_task {
        task.await??;
    }

    Ok(())
}

/// Drive the bot and the API together. Whichever stops first ends the run:
/// an API failure is logged and returned, a finished bot aborts the API.
pub async fn run_alongside_api<F>(bot: F, api_task: JoinHandle<Result<()>>) -> Result<()>
where
    F: Future<Output = ()>,
{
    let abort = api_task.abort_handle();
    tokio::select! {
        () = bot => {
            abort.abort();
            Ok(())
        }
        joined = api_task => {
            let result = joined.map_err(anyhow::Error::from).and_then(|served| served);
            match &result {
                Err(err) => tracing::error!(error = %format!("{err:#}"), "API server failed"),
                Ok(()) => tracing::warn!("API server stopped"),
            }
            result
        }
    }
}
