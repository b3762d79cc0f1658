use axum::{
    body::Body,
    extract::{Extension, State},
    http::{header, HeaderName, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::docx::{export_docx, DOCX_FILE_NAME, DOCX_MIME};
use crate::generator::{submit, TextGenerator};
use crate::pedido::{Field, PedidoRequest, PedidoResult, Submission};

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

#[derive(Debug, Serialize)]
struct MissingFieldsResponse {
    error: &'static str,
    fields: Vec<Field>,
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub rate_limit_per_second: Option<u64>,
}

struct AppState<G: ?Sized> {
    generator: Option<Arc<G>>,
}

impl<G: ?Sized> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            generator: self.generator.clone(),
        }
    }
}

#[derive(Clone, Debug)]
struct RequestContext {
    request_id: String,
}

#[derive(Debug)]
struct RateLimiter {
    limit: u64,
    window: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

pub fn router<G>(generator: Option<Arc<G>>, config: ApiConfig) -> Router
where
    G: TextGenerator + ?Sized + 'static,
{
    let request_id_layer = middleware::from_fn(assign_request_id);
    let mut router = Router::new()
        .route("/api/pedido", post(create_pedido::<G>))
        .route("/api/pedido/docx", post(download_docx))
        .with_state(AppState { generator });

    if let Some(rate_limit) = config.rate_limit_per_second {
        let limiter = Arc::new(RateLimiter {
            limit: rate_limit,
            window: Duration::from_secs(1),
            timestamps: Mutex::new(VecDeque::new()),
        });
        let rate_limit_layer = middleware::from_fn_with_state(limiter, rate_limit_requests);
        router = router.layer(rate_limit_layer);
    }

    router
        .route("/health", get(health_check))
        .layer(request_id_layer)
}

pub async fn serve(addr: &str, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "API listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_check() -> &'static str {
    "ok"
}

async fn create_pedido<G>(
    State(state): State<AppState<G>>,
    Extension(request): Extension<RequestContext>,
    Json(payload): Json<PedidoRequest>,
) -> Response
where
    G: TextGenerator + ?Sized + 'static,
{
    let Some(generator) = state.generator else {
        tracing::debug!(request_id = %request.request_id, "Generation disabled");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "generation_disabled",
            }),
        )
            .into_response();
    };

    match submit(generator.as_ref(), &payload).await {
        Submission::MissingFields(fields) => {
            tracing::debug!(
                request_id = %request.request_id,
                ?fields,
                "Rejected pedido with missing fields"
            );
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(MissingFieldsResponse {
                    error: "missing_fields",
                    fields,
                }),
            )
                .into_response()
        }
        Submission::Generated(result) => {
            tracing::debug!(
                request_id = %request.request_id,
                guion_len = result.guion.len(),
                analisis_len = result.analisis.len(),
                "Generated pedido via API"
            );
            (StatusCode::OK, Json(result)).into_response()
        }
    }
}

async fn download_docx(
    Extension(request): Extension<RequestContext>,
    Json(payload): Json<PedidoResult>,
) -> Response {
    let bytes = match export_docx(&payload.guion, &payload.analisis) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(
                request_id = %request.request_id,
                error = %format!("{err:#}"),
                "Failed to export docx"
            );
            return internal_error_response();
        }
    };

    tracing::debug!(
        request_id = %request.request_id,
        size = bytes.len(),
        "Exported docx via API"
    );
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOCX_FILE_NAME}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

async fn assign_request_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });
    let method = req.method().clone();
    let uri = req.uri().clone();
    let mut response = next.run(req).await;
    let status = response.status();
    let header_value = match request_id.parse() {
        Ok(value) => value,
        Err(_) => {
            return response;
        }
    };
    response
        .headers_mut()
        .insert(HeaderName::from_static("x-request-id"), header_value);
    tracing::debug!(
        request_id,
        method = %method,
        uri = %uri,
        status = %status,
        "API request completed"
    );
    response
}

async fn rate_limit_requests(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_else(|| "unknown".to_string());
    let now = Instant::now();
    let mut timestamps = limiter.timestamps.lock().await;
    while let Some(ts) = timestamps.front() {
        if now.duration_since(*ts) >= limiter.window {
            timestamps.pop_front();
        } else {
            break;
        }
    }

    if timestamps.len() as u64 >= limiter.limit {
        tracing::debug!(request_id, "API rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse {
                error: "rate_limited",
            }),
        )
            .into_response();
    }
    timestamps.push_back(now);
    drop(timestamps);
    next.run(req).await
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal_error",
        }),
    )
        .into_response()
}
