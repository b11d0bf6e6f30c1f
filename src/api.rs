//! REST API server for the finance advisor
//!
//! Exposes chat turns and session inspection over HTTP.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::assistant::FinanceAssistant;
use crate::error::AdvisorError;
use crate::models::{Intent, Route, UserProfile};
use crate::session::{SessionStore, TranscriptMessage};

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub session_id: Uuid,
    pub reply: String,
    pub intent: Intent,
    pub route: Route,
    pub high_risk: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub user_profile: UserProfile,
    pub last_advice: Option<String>,
    pub messages: Vec<TranscriptMessage>,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub assistant: Arc<FinanceAssistant>,
    pub sessions: Arc<SessionStore>,
}

/// =============================
/// Helpers
/// =============================

fn stable_uuid_from_string(input: &str) -> Uuid {
    use sha2::{Digest, Sha256};

    let hash = Sha256::digest(input.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash[..16]);

    // Set UUID version (4) and variant (RFC4122) bits.
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}

/// Accept a UUID as-is; map any other non-blank id to a stable UUID.
fn resolve_session_id(value: Option<&str>) -> Uuid {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => {
            Uuid::parse_str(v).unwrap_or_else(|_| stable_uuid_from_string(v))
        }
        _ => Uuid::new_v4(),
    }
}

fn status_for(error: &AdvisorError) -> StatusCode {
    match error {
        AdvisorError::SessionError(_) => StatusCode::BAD_REQUEST,
        AdvisorError::ClassificationUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AdvisorError::LlmError(_) | AdvisorError::HttpError(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Chat Endpoint
/// =============================

async fn chat_handler(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse>) {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!("Rejected chat request: {}", rejection.body_text());
            return (
                rejection.status(),
                Json(ApiResponse::error(rejection.body_text())),
            );
        }
    };

    let message = req.message.unwrap_or_default();
    if message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("message must not be empty".into())),
        );
    }

    let session_id = resolve_session_id(req.session_id.as_deref());
    info!(session_id = %session_id, "Received chat message");

    let session = state.sessions.get_or_create(session_id).await;
    let mut session = session.lock().await;

    match session.handle_message(&state.assistant, &message).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ApiResponse::success(ChatReply {
                session_id,
                reply: outcome.reply,
                intent: outcome.intent,
                route: outcome.route,
                high_risk: outcome.high_risk,
            })),
        ),
        Err(e) => {
            warn!(session_id = %session_id, "Chat turn failed: {}", e);
            (
                status_for(&e),
                Json(ApiResponse::error(format!("Chat turn failed: {}", e))),
            )
        }
    }
}

/// =============================
/// Session Endpoint
/// =============================

async fn session_handler(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    let session_id = resolve_session_id(Some(&session_id));

    let Some(session) = state.sessions.get(session_id).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Session {} not found", session_id))),
        );
    };
    let session = session.lock().await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(SessionView {
            session_id,
            user_profile: session.memory.user_profile.clone(),
            last_advice: session.memory.long_term.last_advice.clone(),
            messages: session.transcript.messages().cloned().collect(),
        })),
    )
}

/// =============================
/// Router
/// =============================

pub fn create_router(assistant: Arc<FinanceAssistant>, sessions: Arc<SessionStore>) -> Router {
    let state = ApiState {
        assistant,
        sessions,
    };

    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat_handler))
        .route("/api/sessions/:session_id", get(session_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    assistant: Arc<FinanceAssistant>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(assistant, Arc::new(SessionStore::new()));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
