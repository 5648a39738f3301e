//! Journal HTTP REST API
//!
//! Axum-based HTTP server that exposes the journal entry store and audio
//! transcription over HTTP.
//!
//! Architecture: each endpoint has a thin axum handler that extracts and
//! validates the request, then delegates to a pure inner function returning
//! `(StatusCode, serde_json::Value)`. The inner functions are directly testable
//! without axum dispatch machinery.
//!
//! Endpoints:
//! - GET    /              - journal page
//! - GET    /health        - health check with DB status
//! - GET    /version       - server version info
//! - POST   /entries       - create an entry (sentiment scored on insert)
//! - GET    /entries       - list all entries in insertion order
//! - GET    /entries/:id   - fetch one entry
//! - DELETE /entries/:id   - hard-delete one entry
//! - POST   /transcribe    - multipart `audio` upload to speech-to-text

use std::sync::Arc;

use anyhow::Result;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use moodlog_core::{db, EntryStore, SpeechRecognizer};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::page;

/// Multipart field carrying the uploaded recording.
pub const AUDIO_FIELD: &str = "audio";

/// Upper bound on request bodies; audio uploads are the large ones.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct JournalState {
    pub store: EntryStore,
    pub recognizer: Arc<dyn SpeechRecognizer>,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<JournalState>) -> Router {
    Router::new()
        .route("/", get(page::journal_index))
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/entries", post(create_entry_handler).get(list_entries_handler))
        .route("/entries/:id", get(get_entry_handler).delete(delete_entry_handler))
        .route("/transcribe", post(transcribe_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server on `addr`.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    state: Arc<JournalState>,
    addr: &str,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Journal HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request / Response DTOs
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct CreateEntryRequest {
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateEntryResponse {
    pub message: String,
    pub id: i64,
    pub sentiment: f64,
}

/// An uploaded audio file pulled out of the multipart body.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub file_name: Option<String>,
    pub data: Bytes,
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

/// Inner health check - queries DB and returns (status_code, json_body).
pub async fn health_inner(store: &EntryStore) -> (StatusCode, serde_json::Value) {
    let sqlite_ver = match db::health_check(store.pool()).await {
        Ok(v) => v,
        Err(e) => {
            return ApiError::ServiceUnavailable(format!("database unavailable: {}", e))
                .into_parts();
        }
    };

    let entries = store.count_entries().await.ok();

    (
        StatusCode::OK,
        serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "sqlite": sqlite_ver,
            "entries": entries,
        }),
    )
}

/// Inner version - returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "service": "journal",
    })
}

pub async fn create_entry_inner(
    store: &EntryStore,
    req: CreateEntryRequest,
) -> (StatusCode, serde_json::Value) {
    match store.create_entry(req.content.as_deref()).await {
        Ok((id, sentiment)) => {
            let body = CreateEntryResponse {
                message: "Entry created successfully".to_string(),
                id,
                sentiment,
            };
            (StatusCode::CREATED, serde_json::json!(body))
        }
        Err(e) => ApiError::from(e).into_parts(),
    }
}

pub async fn list_entries_inner(store: &EntryStore) -> (StatusCode, serde_json::Value) {
    match store.list_entries().await {
        Ok(entries) => (StatusCode::OK, serde_json::json!(entries)),
        Err(e) => ApiError::from(e).into_parts(),
    }
}

pub async fn get_entry_inner(store: &EntryStore, id: i64) -> (StatusCode, serde_json::Value) {
    match store.get_entry(id).await {
        Ok(entry) => (StatusCode::OK, serde_json::json!(entry)),
        Err(e) => ApiError::from(e).into_parts(),
    }
}

pub async fn delete_entry_inner(store: &EntryStore, id: i64) -> (StatusCode, serde_json::Value) {
    match store.delete_entry(id).await {
        Ok(()) => (
            StatusCode::OK,
            serde_json::json!({ "message": "Entry deleted successfully" }),
        ),
        Err(e) => ApiError::from(e).into_parts(),
    }
}

/// Inner transcribe - a single recognizer call, no retry.
pub async fn transcribe_inner(
    recognizer: &dyn SpeechRecognizer,
    upload: Option<AudioUpload>,
) -> (StatusCode, serde_json::Value) {
    let upload = match upload {
        Some(u) if u.file_name.as_deref().is_some_and(|n| !n.is_empty()) => u,
        _ => return ApiError::BadRequest("No audio file provided".to_string()).into_parts(),
    };

    tracing::info!(
        bytes = upload.data.len(),
        recognizer = recognizer.name(),
        "Transcribing uploaded audio"
    );

    match recognizer.recognize(&upload.data).await {
        Ok(transcription) => (
            StatusCode::OK,
            serde_json::json!({ "transcription": transcription }),
        ),
        Err(e) => ApiError::from(e).into_parts(),
    }
}

// ============================================================================
// Axum handler wrappers (thin - delegate to inner functions)
// ============================================================================

type JsonReply = (StatusCode, Json<serde_json::Value>);

fn reply((status, body): (StatusCode, serde_json::Value)) -> JsonReply {
    (status, Json(body))
}

pub async fn health_handler(State(state): State<Arc<JournalState>>) -> JsonReply {
    reply(health_inner(&state.store).await)
}

pub async fn version_handler() -> JsonReply {
    reply((StatusCode::OK, version_inner()))
}

pub async fn create_entry_handler(
    State(state): State<Arc<JournalState>>,
    payload: std::result::Result<Json<CreateEntryRequest>, JsonRejection>,
) -> JsonReply {
    match payload {
        Ok(Json(req)) => reply(create_entry_inner(&state.store, req).await),
        Err(rejection) => reply(ApiError::from(rejection).into_parts()),
    }
}

pub async fn list_entries_handler(State(state): State<Arc<JournalState>>) -> JsonReply {
    reply(list_entries_inner(&state.store).await)
}

pub async fn get_entry_handler(
    State(state): State<Arc<JournalState>>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> JsonReply {
    match id {
        Ok(Path(id)) => reply(get_entry_inner(&state.store, id).await),
        Err(_) => reply(ApiError::NotFound("Entry not found".to_string()).into_parts()),
    }
}

pub async fn delete_entry_handler(
    State(state): State<Arc<JournalState>>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> JsonReply {
    match id {
        Ok(Path(id)) => reply(delete_entry_inner(&state.store, id).await),
        Err(_) => reply(ApiError::NotFound("Entry not found".to_string()).into_parts()),
    }
}

pub async fn transcribe_handler(
    State(state): State<Arc<JournalState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> JsonReply {
    let upload = match multipart {
        Ok(m) => read_audio_field(m).await,
        Err(rejection) => Err(ApiError::from(rejection)),
    };

    match upload {
        Ok(upload) => reply(transcribe_inner(state.recognizer.as_ref(), upload).await),
        Err(e) => reply(e.into_parts()),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Scan the multipart body for the `audio` field. Other fields are skipped.
async fn read_audio_field(mut multipart: Multipart) -> std::result::Result<Option<AudioUpload>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await?;
        return Ok(Some(AudioUpload { file_name, data }));
    }
    Ok(None)
}

// ============================================================================
// Unit Tests - call inner functions directly
// ============================================================================
