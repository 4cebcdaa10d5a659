//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::models::{ActionRequest, ApiResponse};
use crate::analyzer::{AnalysisOutcome, VideoAnalyzer};
use crate::config::Config;
use crate::llm::actions::{ActionKind, ActionProcessor};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<VideoAnalyzer>,
    pub config: Arc<Config>,
}

/// Configure and start the HTTP server
pub async fn start_http_server(
    analyzer: Arc<VideoAnalyzer>,
    config: Arc<Config>,
    port: u16,
) -> Result<()> {
    info!("🚀 Starting HTTP server on port {}", port);

    let app_state = AppState { analyzer, config };

    // Configure CORS to allow browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
        .route("/api/videos/:id/content", get(video_content_handler))
        .route("/api/videos/:id/actions", post(video_action_handler))
        .with_state(app_state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("🌐 API server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "yt-chapter-analyzer",
    }))
}

/// Aligned per-chapter content for a video. Fetch failures surface inside the
/// outcome as error annotations, not as HTTP failures.
async fn video_content_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.analyzer.analyze(&id).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ApiResponse::<AnalysisOutcome>::success(outcome)),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<AnalysisOutcome>::error(e.to_string())),
        )
            .into_response(),
    }
}

/// Run an LLM action over a video's aligned content
async fn video_action_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ActionRequest>,
) -> impl IntoResponse {
    let kind = match ActionKind::parse(&request.action, request.question.as_deref()) {
        Ok(kind) => kind,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<serde_json::Value>::error(e.to_string())),
            )
                .into_response();
        }
    };

    let outcome = match state.analyzer.analyze(&id).await {
        Ok(outcome) => outcome,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<serde_json::Value>::error(e.to_string())),
            )
                .into_response();
        }
    };

    let processor = match ActionProcessor::new(&state.config.llm) {
        Ok(processor) => processor,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<serde_json::Value>::error(e.to_string())),
            )
                .into_response();
        }
    };

    match processor.run(&outcome.result, kind).await {
        Ok(action_result) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({
                "analysis": outcome,
                "action": action_result,
            }))),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<serde_json::Value>::error(e.to_string())),
        )
            .into_response(),
    }
}
