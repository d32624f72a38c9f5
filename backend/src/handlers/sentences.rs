use crate::handlers::json_rejection;
use crate::{tutor, AppError, AppState, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

const WORDS_REQUIRED: &str = "Words array is required";

/// `words` must be a non-empty array of strings.
fn parse_words(body: &Value) -> Option<Vec<String>> {
    let words = body
        .get("words")?
        .as_array()?
        .iter()
        .map(|w| w.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()?;

    (!words.is_empty()).then_some(words)
}

/// Positive whole numbers only, given as `3`, `3.0` or `"3"`; anything else
/// means the default.
fn sentence_count(body: &Value) -> u64 {
    let count = match body.get("sentenceLength") {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= u32::MAX as f64)
                .map(|f| f as u64)
        }),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    count
        .filter(|n| *n > 0)
        .unwrap_or(tutor::DEFAULT_SENTENCE_COUNT)
}

pub async fn generate_sentences(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(body) = payload.map_err(|e| json_rejection(&state, e, WORDS_REQUIRED))?;
    let words =
        parse_words(&body).ok_or_else(|| AppError::BadRequest(WORDS_REQUIRED.to_string()))?;
    let count = sentence_count(&body);

    tracing::info!("Generating {} sentences from {} words", count, words.len());

    let sentences = tutor::generate_sentences(state.ai.as_ref(), &words, count)
        .await
        .map_err(|e| AppError::service("Failed to generate sentences", e))?;

    Ok(Json(sentences))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_words() {
        assert_eq!(
            parse_words(&json!({"words": ["你", "好"]})),
            Some(vec!["你".to_string(), "好".to_string()])
        );
        assert_eq!(parse_words(&json!({"words": []})), None);
        assert_eq!(parse_words(&json!({"words": "你好"})), None);
        assert_eq!(parse_words(&json!({"words": ["你", 1]})), None);
        assert_eq!(parse_words(&json!({})), None);
        assert_eq!(parse_words(&json!(["你"])), None);
    }

    #[test]
    fn test_sentence_count() {
        assert_eq!(sentence_count(&json!({})), 5);
        assert_eq!(sentence_count(&json!({"sentenceLength": 3})), 3);
        assert_eq!(sentence_count(&json!({"sentenceLength": 0})), 5);
        assert_eq!(sentence_count(&json!({"sentenceLength": -2})), 5);
        assert_eq!(sentence_count(&json!({"sentenceLength": "7"})), 7);
        assert_eq!(sentence_count(&json!({"sentenceLength": "seven"})), 5);
        assert_eq!(sentence_count(&json!({"sentenceLength": 3.0})), 3);
        assert_eq!(sentence_count(&json!({"sentenceLength": 2.5})), 5);
        assert_eq!(sentence_count(&json!({"sentenceLength": null})), 5);
    }
}
