//! HTTP surface.
//!
//! API endpoints:
//! - GET  /         - Health check with dependency report
//! - POST /register - Multipart form: `user_id` + `file` (audio)
//! - POST /verify   - Multipart form: `user_id` + `file` (audio)
//!
//! Verification failures are structured JSON payloads with
//! `verified: false`; they never surface as 5xx responses.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Multipart, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::info;
use voxauth_engine::Engine;

#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
}

pub async fn serve(addr: &str, engine: Arc<Engine>) -> Result<()> {
    let state = AppState { engine };

    let app = Router::new()
        .route("/", get(health))
        .route("/register", post(register))
        .route("/verify", post(verify))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.engine.health())
}

async fn register(State(state): State<AppState>, multipart: Multipart) -> impl IntoResponse {
    let (user_id, audio) = match read_form(multipart).await {
        Ok(parts) => parts,
        Err(msg) => return Json(json!({ "error": msg, "verified": false })),
    };
    info!(user_id, bytes = audio.len(), "registration request");

    match state.engine.register(&user_id, &audio).await {
        Ok(result) => Json(json!(result)),
        // Operation boundary: failures become structured payloads.
        Err(e) => Json(json!({ "error": e.to_string(), "verified": false })),
    }
}

async fn verify(State(state): State<AppState>, multipart: Multipart) -> impl IntoResponse {
    let (user_id, audio) = match read_form(multipart).await {
        Ok(parts) => parts,
        Err(msg) => return Json(json!({ "error": msg, "verified": false })),
    };
    info!(user_id, bytes = audio.len(), "verification request");

    Json(json!(state.engine.verify(&user_id, &audio).await))
}

/// Pulls `user_id` and `file` out of a multipart form.
async fn read_form(mut multipart: Multipart) -> Result<(String, Vec<u8>), String> {
    let mut user_id: Option<String> = None;
    let mut audio: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("invalid multipart form: {e}"))?
    {
        match field.name() {
            Some("user_id") => {
                user_id = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| format!("invalid user_id field: {e}"))?,
                );
            }
            Some("file") => {
                audio = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| format!("invalid file field: {e}"))?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let user_id = user_id.ok_or_else(|| "missing user_id field".to_string())?;
    let audio = audio.ok_or_else(|| "missing file field".to_string())?;
    if audio.is_empty() {
        return Err("empty audio upload".to_string());
    }
    Ok((user_id, audio))
}
