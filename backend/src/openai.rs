//! OpenAI REST client for transcription (Whisper) and chat completions.
//!
//! - Transcription: `POST {base}/audio/transcriptions` (multipart)
//! - Chat: `POST {base}/chat/completions` (JSON)
//!
//! No retries and no explicit timeout; reqwest defaults apply.

use crate::config::Config;
use crate::models::AudioClip;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Request failed: {0}")]
    Network(String),

    #[error("OpenAI API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// A single-turn chat request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

#[async_trait]
pub trait TutorAi: Send + Sync {
    /// Speech-to-text in the configured target language.
    async fn transcribe(&self, clip: AudioClip) -> Result<String, AiError>;

    /// Returns the text content of the first completion choice.
    async fn complete(&self, prompt: ChatPrompt) -> Result<String, AiError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorBody {
    message: String,
}

pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    transcription_model: String,
    chat_model: String,
    language: String,
}

impl OpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        transcription_model: impl Into<String>,
        chat_model: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            transcription_model: transcription_model.into(),
            chat_model: chat_model.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.openai_base_url,
            &config.openai_api_key,
            &config.transcription_model,
            &config.chat_model,
            &config.transcription_language,
        )
    }

    async fn read_body(response: reqwest::Response) -> Result<String, AiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AiError::Network(format!("Failed to read response: {}", e)))?;

        if status.is_success() {
            return Ok(body);
        }

        let message = match serde_json::from_str::<OpenAIErrorResponse>(&body) {
            Ok(parsed) => parsed.error.message,
            Err(_) => body,
        };
        Err(AiError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl TutorAi for OpenAiClient {
    async fn transcribe(&self, clip: AudioClip) -> Result<String, AiError> {
        let size = clip.data.len();
        let part = Part::bytes(clip.data)
            .file_name(clip.filename)
            .mime_str(&clip.content_type)
            .map_err(|e| AiError::Malformed(format!("Invalid MIME type: {}", e)))?;

        let form = Form::new()
            .part("file", part)
            .text("model", self.transcription_model.clone())
            .text("language", self.language.clone())
            .text("response_format", "json");

        let response = self
            .http
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        let body = Self::read_body(response).await?;
        let parsed: TranscriptionResponse =
            serde_json::from_str(&body).map_err(|e| AiError::Malformed(e.to_string()))?;

        tracing::info!(
            "Transcription complete: {} bytes of audio -> {} characters",
            size,
            parsed.text.chars().count()
        );
        Ok(parsed.text)
    }

    async fn complete(&self, prompt: ChatPrompt) -> Result<String, AiError> {
        let request = ChatCompletionRequest {
            model: &self.chat_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: prompt.max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Network(e.to_string()))?;

        let body = Self::read_body(response).await?;
        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| AiError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AiError::Malformed("completion has no content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Multipart,
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn fake_transcriptions(headers: HeaderMap, mut multipart: Multipart) -> Json<Value> {
        assert_eq!(
            headers.get("authorization").unwrap().to_str().unwrap(),
            "Bearer sk-test"
        );

        let mut model = String::new();
        let mut language = String::new();
        let mut file_len = 0;
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "model" => model = field.text().await.unwrap(),
                "language" => language = field.text().await.unwrap(),
                "file" => {
                    assert_eq!(field.file_name(), Some("clip.webm"));
                    file_len = field.bytes().await.unwrap().len();
                }
                _ => {}
            }
        }

        Json(json!({ "text": format!("{} {} {}", model, language, file_len) }))
    }

    async fn fake_chat(Json(body): Json<Value>) -> impl IntoResponse {
        let user = body["messages"][1]["content"].as_str().unwrap_or("");
        match user {
            "fail" => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": { "message": "quota exceeded" } })),
            )
                .into_response(),
            "empty" => Json(json!({ "choices": [] })).into_response(),
            _ => Json(json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": format!(
                            "{}|{}|{}",
                            body["model"].as_str().unwrap(),
                            body["messages"][0]["content"].as_str().unwrap(),
                            body["max_tokens"]
                        )
                    }
                }]
            }))
            .into_response(),
        }
    }

    async fn spawn_fake_openai() -> OpenAiClient {
        let app = Router::new()
            .route("/v1/audio/transcriptions", post(fake_transcriptions))
            .route("/v1/chat/completions", post(fake_chat));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        OpenAiClient::new(
            format!("http://{}/v1/", addr),
            "sk-test",
            "whisper-1",
            "gpt-4",
            "zh",
        )
    }

    fn prompt(user: &str) -> ChatPrompt {
        ChatPrompt {
            system: "be a teacher".to_string(),
            user: user.to_string(),
            max_tokens: 42,
        }
    }

    #[tokio::test]
    async fn test_transcribe_sends_model_language_and_file() {
        let client = spawn_fake_openai().await;
        let text = client
            .transcribe(AudioClip {
                filename: "clip.webm".into(),
                content_type: "audio/webm".into(),
                data: vec![0u8; 128],
            })
            .await
            .unwrap();

        assert_eq!(text, "whisper-1 zh 128");
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let client = spawn_fake_openai().await;
        let content = client.complete(prompt("hello")).await.unwrap();
        assert_eq!(content, "gpt-4|be a teacher|42");
    }

    #[tokio::test]
    async fn test_complete_maps_api_error() {
        let client = spawn_fake_openai().await;
        let err = client.complete(prompt("fail")).await.unwrap_err();
        match err {
            AiError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_without_choices_is_malformed() {
        let client = spawn_fake_openai().await;
        let err = client.complete(prompt("empty")).await.unwrap_err();
        assert!(matches!(err, AiError::Malformed(_)));
    }
}
