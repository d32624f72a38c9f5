pub mod characters;
pub mod pronunciation;
pub mod sentences;

use crate::models::{HealthResponse, SpeakResponse};
use crate::{AppError, AppState};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::any::Any;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Chinese Tutor Backend is running",
    })
}

/// Over-limit bodies keep their 413; anything else is reported as `message`.
pub(crate) fn json_rejection(state: &AppState, e: JsonRejection, message: &str) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(state.config.max_json_body_mb)
    } else {
        tracing::debug!("Rejected JSON body: {}", e.body_text());
        AppError::BadRequest(message.to_string())
    }
}

pub(crate) fn path_rejection(e: PathRejection) -> AppError {
    tracing::debug!("Rejected path parameter: {}", e.body_text());
    AppError::BadRequest("Invalid path parameter".to_string())
}

/// Speech synthesis happens in the browser; this only echoes the text back.
pub async fn speak(
    text: std::result::Result<Path<String>, PathRejection>,
) -> crate::Result<Json<SpeakResponse>> {
    let Path(text) = text.map_err(path_rejection)?;

    Ok(Json(SpeakResponse {
        message: "Text-to-speech is handled by the browser".to_string(),
        text,
    }))
}

pub async fn not_found() -> AppError {
    AppError::NotFound("Endpoint not found".to_string())
}

/// Turns a handler panic into the generic 500 JSON error.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::Internal(format!("Handler panicked: {}", detail)).into_response()
}
