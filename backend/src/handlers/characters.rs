use crate::handlers::{json_rejection, path_rejection};
use crate::models::{Character, CreateCharacterRequest, MessageResponse, NewCharacter};
use crate::storage::{self, ImageFolder};
use crate::{db, AppError, AppState, Result};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use std::sync::Arc;

const SAVE_FAILED: &str = "Failed to save character";

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

pub async fn list_characters(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Character>>> {
    let characters = db::list_characters(&state.db)
        .await
        .map_err(|e| AppError::persist("Failed to fetch characters", e))?;

    Ok(Json(characters))
}

/// Decode and upload an optional inline image, returning its public URL.
async fn upload_image(
    state: &AppState,
    folder: ImageFolder,
    payload: Option<String>,
) -> Result<Option<String>> {
    let Some(payload) = non_blank(payload) else {
        return Ok(None);
    };

    let image = storage::decode_image_payload(&payload)
        .map_err(|e| AppError::upload(SAVE_FAILED, e))?;
    let url = state
        .images
        .upload(folder, image)
        .await
        .map_err(|e| AppError::upload(SAVE_FAILED, e))?;

    Ok(Some(url))
}

pub async fn create_character(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CreateCharacterRequest>, JsonRejection>,
) -> Result<Json<Character>> {
    let Json(req) = payload.map_err(|e| json_rejection(&state, e, "Invalid request body"))?;

    let (Some(pinyin), Some(meaning)) = (non_blank(req.pinyin), non_blank(req.meaning)) else {
        return Err(AppError::BadRequest(
            "Pinyin and meaning are required".to_string(),
        ));
    };

    // First failure aborts; an already uploaded character image is kept.
    let character_image = upload_image(&state, ImageFolder::Characters, req.character_image).await?;
    let mnemonic_image = upload_image(&state, ImageFolder::Mnemonics, req.mnemonic_image).await?;

    let new = NewCharacter {
        pinyin,
        meaning,
        hint: non_blank(req.hint),
        character_image,
        mnemonic_image,
    };

    match db::insert_character(&state.db, &new).await {
        Ok(character) => {
            tracing::info!(id = %character.id, pinyin = %character.pinyin, "Saved character");
            Ok(Json(character))
        }
        Err(e) => {
            // Don't leave the images of a record that was never stored behind.
            for url in [&new.character_image, &new.mnemonic_image].into_iter().flatten() {
                if let Err(cleanup) = state.images.delete(url).await {
                    tracing::warn!(url = %url, error = %cleanup, "Failed to remove orphaned image");
                }
            }
            Err(AppError::persist(SAVE_FAILED, e))
        }
    }
}

pub async fn delete_character(
    State(state): State<Arc<AppState>>,
    id: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    let Path(id) = id.map_err(path_rejection)?;
    let removed = db::delete_character(&state.db, &id)
        .await
        .map_err(|e| AppError::persist("Failed to delete character", e))?;

    tracing::info!(id = %id, removed, "Deleted character");
    Ok(Json(MessageResponse {
        message: "Character deleted successfully".to_string(),
    }))
}
