use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Character {
    pub id: String,
    pub pinyin: String,
    pub meaning: String,
    pub hint: Option<String>,
    pub character_image: Option<String>,
    pub mnemonic_image: Option<String>,
    pub created_at: String,
}

/// Fields of a character ready to be inserted, images already uploaded.
#[derive(Debug, Clone, Default)]
pub struct NewCharacter {
    pub pinyin: String,
    pub meaning: String,
    pub hint: Option<String>,
    pub character_image: Option<String>,
    pub mnemonic_image: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCharacterRequest {
    pub pinyin: Option<String>,
    pub meaning: Option<String>,
    pub hint: Option<String>,
    /// Data URL or bare base64 image payload.
    pub character_image: Option<String>,
    pub mnemonic_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SpeakResponse {
    pub message: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PronunciationEvaluation {
    pub transcription: String,
    /// Free-text feedback; the 1-10 score is embedded in the prose.
    pub evaluation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub chinese: String,
    pub pinyin: String,
    pub english: String,
}

impl Sentence {
    /// Returned in place of model output that is not valid JSON.
    pub fn parse_failure() -> Self {
        Sentence {
            chinese: "解析失败，请重试".to_string(),
            pinyin: "jiě xī shī bài, qǐng chóng shì".to_string(),
            english: "Parsing failed, please try again".to_string(),
        }
    }
}

/// An audio clip received from the client.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}
