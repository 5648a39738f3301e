//! Transcription echo service.
//!
//! The browser does speech-to-text itself and posts the resulting text here;
//! the service logs it and sends it straight back. Stateless.

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::page;

#[derive(Debug, Deserialize, Default)]
pub struct TranscriptionEcho {
    pub transcription: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct EchoResponse {
    pub status: String,
    pub transcription: Option<String>,
}

pub fn build_echo_router() -> Router {
    Router::new()
        .route("/", get(page::echo_index))
        .route("/transcribe", post(echo_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn start_echo_server(addr: &str, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Echo HTTP API listening on http://{}", addr);

    axum::serve(listener, build_echo_router())
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Echo server shutting down...");
        })
        .await?;

    Ok(())
}

/// No validation: a missing field echoes back as `null`.
pub fn echo_inner(req: TranscriptionEcho) -> EchoResponse {
    tracing::info!(transcription = ?req.transcription, "Received transcription");
    EchoResponse {
        status: "success".to_string(),
        transcription: req.transcription,
    }
}

pub async fn echo_handler(
    payload: std::result::Result<Json<TranscriptionEcho>, JsonRejection>,
) -> (StatusCode, Json<serde_json::Value>) {
    match payload {
        Ok(Json(req)) => (StatusCode::OK, Json(serde_json::json!(echo_inner(req)))),
        Err(rejection) => {
            let (status, body) = ApiError::from(rejection).into_parts();
            (status, Json(body))
        }
    }
}
