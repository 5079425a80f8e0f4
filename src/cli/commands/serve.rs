//! HTTP API server for the browser front end.
//!
//! Provides endpoints to load a video and ask questions about it.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::{CorsSettings, Settings};
use crate::error::{Result, YtChatError};
use crate::orchestrator::Orchestrator;
use axum::{
    extract::{Path, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        request, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info};

/// Shared application state.
struct AppState {
    orchestrator: Arc<Orchestrator>,
}

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(&settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let cors = settings.cors.clone();

    let orchestrator = Arc::new(Orchestrator::new(settings)?);
    let app = router(orchestrator, &cors)?;

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("CORS origins allowed: {:?}", cors.allowed_origins());

    Output::header("ytchat API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /");
    Output::kv("Load video", "POST /load_video");
    Output::kv("Ask question", "POST /ask_question");
    Output::kv("List videos", "GET  /videos");
    Output::kv("Get video", "GET  /videos/{video_id}");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router with CORS applied.
pub fn router(orchestrator: Arc<Orchestrator>, cors: &CorsSettings) -> Result<Router> {
    let state = Arc::new(AppState { orchestrator });

    Ok(Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/load_video", post(load_video))
        .route("/ask_question", post(ask_question))
        .route("/videos", get(list_videos))
        .route("/videos/{video_id}", get(get_video))
        .layer(cors_layer(cors)?)
        .with_state(state))
}

/// Exact front-end and dev origins, plus anything matching the preview pattern.
fn cors_layer(cors: &CorsSettings) -> Result<CorsLayer> {
    let exact = cors.allowed_origins();
    let pattern = Regex::new(&cors.origin_pattern)
        .map_err(|e| YtChatError::Config(format!("Invalid CORS origin pattern: {}", e)))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &request::Parts| {
            origin
                .to_str()
                .map(|o| exact.iter().any(|e| e == o) || pattern.is_match(o))
                .unwrap_or(false)
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(cors.max_age_seconds)))
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct LoadVideoRequest {
    youtube_url: String,
}

#[derive(Serialize)]
struct LoadVideoResponse {
    video_id: String,
    summary: String,
}

#[derive(Deserialize)]
struct QuestionRequest {
    video_id: String,
    question: String,
}

#[derive(Serialize)]
struct AnswerResponse {
    answer: String,
}

#[derive(Serialize)]
struct VideoListResponse {
    videos: Vec<VideoInfo>,
    total: usize,
}

#[derive(Serialize)]
struct VideoInfo {
    video_id: String,
    document_count: usize,
    ingested_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct VideoDetailResponse {
    video_id: String,
    summary: String,
    full_transcript: String,
    document_count: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Maps library errors onto HTTP: unknown video is 404, everything else 500.
struct ApiError(YtChatError);

impl From<YtChatError> for ApiError {
    fn from(e: YtChatError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            error!("Request failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn load_video(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoadVideoRequest>,
) -> std::result::Result<Json<LoadVideoResponse>, ApiError> {
    info!("Load video requested: {}", req.youtube_url);
    let session = state.orchestrator.load_video(&req.youtube_url).await?;

    Ok(Json(LoadVideoResponse {
        video_id: session.video_id.clone(),
        summary: session.summary.clone(),
    }))
}

async fn ask_question(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuestionRequest>,
) -> std::result::Result<Json<AnswerResponse>, ApiError> {
    let answer = state.orchestrator.ask(&req.video_id, &req.question).await?;
    Ok(Json(AnswerResponse { answer }))
}

async fn list_videos(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let videos: Vec<VideoInfo> = state
        .orchestrator
        .cache()
        .sessions()
        .await
        .into_iter()
        .map(|s| VideoInfo {
            video_id: s.video_id.clone(),
            document_count: s.documents.len(),
            ingested_at: s.ingested_at,
        })
        .collect();

    Json(VideoListResponse {
        total: videos.len(),
        videos,
    })
}

async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> std::result::Result<Json<VideoDetailResponse>, ApiError> {
    let session = state
        .orchestrator
        .cache()
        .get(&video_id)
        .await
        .ok_or_else(|| YtChatError::NotFound(format!("Video not processed yet: {}", video_id)))?;

    Ok(Json(VideoDetailResponse {
        video_id: session.video_id.clone(),
        summary: session.summary.clone(),
        full_transcript: session.full_transcript.clone(),
        document_count: session.documents.len(),
    }))
}
