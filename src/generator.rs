use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::ai::gemini::GeminiClient;
use crate::ai::prompts::build_prompt;
use crate::pedido::{PedidoRequest, PedidoResult, Submission};
use crate::text_utils::split_response;

/// Anything that turns a prompt into model text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_text(prompt).await
    }
}

/// Run one generation. Failures end up in the script slot as
/// `Error: <details>` with an empty analysis.
#[instrument(level = "debug", skip_all)]
pub async fn generate_pedido<G>(generator: &G, req: &PedidoRequest) -> PedidoResult
where
    G: TextGenerator + ?Sized,
{
    let prompt = build_prompt(req);
    match generator.generate(&prompt).await {
        Ok(raw) => {
            let result = split_response(&raw);
            info!(
                guion_len = result.guion.len(),
                analisis_len = result.analisis.len(),
                "generated pedido"
            );
            result
        }
        Err(err) => {
            warn!(error = %format!("{err:#}"), "generation failed");
            PedidoResult {
                guion: format!("Error: {err:#}"),
                analisis: String::new(),
            }
        }
    }
}

/// Check the required fields and generate only when all are present.
pub async fn submit<G>(generator: &G, req: &PedidoRequest) -> Submission
where
    G: TextGenerator + ?Sized,
{
    let missing = req.missing_fields();
    if !missing.is_empty() {
        info!(?missing, "pedido rejected, missing fields");
        return Submission::MissingFields(missing);
    }
    Submission::Generated(generate_pedido(generator, req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pedido::Field;
    use crate::text_utils::MISSING_ANALYSIS;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeGenerator {
        reply: Result<String, String>,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl FakeGenerator {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        fn failing(msg: &str) -> Self {
            Self {
                reply: Err(msg.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            self.reply.clone().map_err(|e| anyhow!(e))
        }
    }

    fn sample_request() -> PedidoRequest {
        PedidoRequest::new(
            "Ana",
            "hacer reporte",
            "formato PDF, 2 páginas",
            "viernes 10am",
            "reunión urgente",
        )
    }

    #[tokio::test]
    async fn generated_reply_is_split() {
        let generator = FakeGenerator::replying(
            "SECCION_GUION: Hola Ana... ¿Cuento contigo?\nSECCION_ANALISIS: Esto reduce ambigüedad.",
        );
        let result = generate_pedido(&generator, &sample_request()).await;
        assert_eq!(result.guion, "Hola Ana... ¿Cuento contigo?");
        assert_eq!(result.analisis, "Esto reduce ambigüedad.");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn prompt_carries_the_request() {
        let generator = FakeGenerator::replying("x");
        generate_pedido(&generator, &sample_request()).await;
        let prompt = generator.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("formato PDF, 2 páginas"));
        assert!(prompt.contains("reunión urgente"));
    }

    #[tokio::test]
    async fn failure_becomes_error_script() {
        let generator = FakeGenerator::failing("quota exceeded");
        let result = generate_pedido(&generator, &sample_request()).await;
        assert!(result.guion.starts_with("Error:"));
        assert!(result.guion.contains("quota exceeded"));
        assert_eq!(result.analisis, "");
    }

    #[tokio::test]
    async fn reply_without_marker_uses_fallback() {
        let generator = FakeGenerator::replying("Solo un guion");
        let result = generate_pedido(&generator, &sample_request()).await;
        assert_eq!(result.guion, "Solo un guion");
        assert_eq!(result.analisis, MISSING_ANALYSIS);
    }

    #[tokio::test]
    async fn missing_field_skips_generation() {
        for field in Field::REQUIRED {
            let generator = FakeGenerator::replying("x");
            let mut req = sample_request();
            req.get_mut(field).clear();
            let outcome = submit(&generator, &req).await;
            assert_eq!(outcome, Submission::MissingFields(vec![field]));
            assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn empty_contexto_still_generates() {
        let generator = FakeGenerator::replying("A SECCION_ANALISIS: B");
        let mut req = sample_request();
        req.contexto.clear();
        let outcome = submit(&generator, &req).await;
        assert_eq!(
            outcome,
            Submission::Generated(PedidoResult {
                guion: "A".to_string(),
                analisis: "B".to_string(),
            })
        );
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }
}
