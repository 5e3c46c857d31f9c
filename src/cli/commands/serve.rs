//! HTTP API server.
//!
//! Exposes the process-video and chat operations of a single
//! [`SessionController`] as JSON endpoints.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::TubeQaError;
use crate::orchestrator::SessionController;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, warn};

/// Shared application state.
pub struct AppState {
    controller: SessionController,
}

impl AppState {
    pub fn new(controller: SessionController) -> Self {
        Self { controller }
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/process-video", post(process_video))
        .route("/chat", post(chat))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let controller = SessionController::new(&settings)?;
    let state = Arc::new(AppState::new(controller));
    let app = router(state);

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("tubeqa API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Status", "GET  /status");
    Output::kv("Process video", "POST /process-video");
    Output::kv("Chat", "POST /chat");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
pub struct ProcessVideoRequest {
    pub url: String,
}

#[derive(Serialize)]
struct ProcessVideoResponse {
    message: String,
    video_id: String,
    chunk_count: usize,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

#[derive(Serialize)]
struct ChatResponse {
    answer: String,
    sources: Vec<SourceInfo>,
}

#[derive(Serialize)]
struct SourceInfo {
    source: String,
    content: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

fn error_response(e: &TubeQaError) -> Response {
    let status = match e {
        TubeQaError::InvalidUrl(_) | TubeQaError::NoActiveVideo | TubeQaError::InvalidInput(_) => {
            StatusCode::BAD_REQUEST
        }
        TubeQaError::TranscriptUnavailable(_) => StatusCode::NOT_FOUND,
        e if e.is_provider_failure() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("Request failed: {}", e);
    } else {
        warn!("Request rejected: {}", e);
    }

    (status, Json(ErrorResponse { detail: e.guidance() })).into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.controller.state())
}

async fn process_video(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProcessVideoRequest>,
) -> Response {
    match state.controller.process_video(&req.url).await {
        Ok(outcome) => Json(ProcessVideoResponse {
            message: "Video processed successfully".to_string(),
            video_id: outcome.video_id.to_string(),
            chunk_count: outcome.chunk_count,
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}

async fn chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> Response {
    match state.controller.ask(&req.query).await {
        Ok(answer) => Json(ChatResponse {
            answer: answer.text,
            sources: answer
                .cited_chunks
                .into_iter()
                .map(|c| SourceInfo {
                    source: c.source_url,
                    content: c.text,
                })
                .collect(),
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}
