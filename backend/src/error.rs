use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: max {0}MB allowed")]
    PayloadTooLarge(u64),

    /// Object storage call failed. The first field is the message returned
    /// to the client, the second the upstream detail that only gets logged.
    #[error("Upload error: {1}")]
    Upload(String, String),

    #[error("Database error: {1}")]
    Persist(String, String),

    #[error("AI service error: {1}")]
    Service(String, String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn upload(message: &str, source: impl std::fmt::Display) -> Self {
        AppError::Upload(message.to_string(), source.to_string())
    }

    pub fn persist(message: &str, source: impl std::fmt::Display) -> Self {
        AppError::Persist(message.to_string(), source.to_string())
    }

    pub fn service(message: &str, source: impl std::fmt::Display) -> Self {
        AppError::Service(message.to_string(), source.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upload(..)
            | AppError::Persist(..)
            | AppError::Service(..)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                msg.clone()
            }
            AppError::PayloadTooLarge(max) => {
                tracing::warn!("Payload too large (limit {}MB)", max);
                format!("File too large: max {}MB allowed", max)
            }
            AppError::Upload(msg, detail) => {
                tracing::error!("Upload error: {}", detail);
                msg.clone()
            }
            AppError::Persist(msg, detail) => {
                tracing::error!("Database error: {}", detail);
                msg.clone()
            }
            AppError::Service(msg, detail) => {
                tracing::error!("AI service error: {}", detail);
                msg.clone()
            }
            AppError::NotFound(msg) => msg.clone(),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Something went wrong!".to_string()
            }
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
