use crate::models::{AudioClip, PronunciationEvaluation};
use crate::{tutor, AppError, AppState, Result};
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;

const NO_AUDIO: &str = "No audio file provided";

fn multipart_error(state: &AppState, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(state.config.max_audio_size_mb)
    } else {
        AppError::BadRequest(format!("Failed to read audio upload: {}", e.body_text()))
    }
}

/// Read the `audio` field, enforcing the size cap. Other fields are skipped.
async fn read_audio(state: &AppState, mut multipart: Multipart) -> Result<Option<AudioClip>> {
    let max_size = state.config.max_audio_size_bytes();
    let mut audio = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(state, e))?
    {
        if field.name() != Some("audio") {
            continue;
        }

        let filename = field.file_name().unwrap_or("audio.webm").to_string();
        let content_type = field.content_type().unwrap_or("audio/webm").to_string();
        let data = field.bytes().await.map_err(|e| multipart_error(state, e))?;

        if data.len() as u64 > max_size {
            return Err(AppError::PayloadTooLarge(state.config.max_audio_size_mb));
        }

        if !data.is_empty() {
            audio = Some(AudioClip {
                filename,
                content_type,
                data: data.to_vec(),
            });
        }
    }

    Ok(audio)
}

pub async fn evaluate_pronunciation(
    State(state): State<Arc<AppState>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<PronunciationEvaluation>> {
    let multipart = multipart.map_err(|_| AppError::BadRequest(NO_AUDIO.to_string()))?;
    let clip = read_audio(&state, multipart)
        .await?
        .ok_or_else(|| AppError::BadRequest(NO_AUDIO.to_string()))?;

    tracing::info!(
        "Evaluating pronunciation: {} ({}, {} bytes)",
        clip.filename,
        clip.content_type,
        clip.data.len()
    );

    let result = tutor::evaluate_pronunciation(state.ai.as_ref(), clip)
        .await
        .map_err(|e| AppError::service("Failed to evaluate pronunciation", e))?;

    Ok(Json(result))
}
