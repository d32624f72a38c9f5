//! Pronunciation evaluation and quiz sentence generation on top of [`TutorAi`].

use crate::models::{AudioClip, PronunciationEvaluation, Sentence};
use crate::openai::{AiError, ChatPrompt, TutorAi};
use serde_json::Value;

const EVALUATION_SYSTEM_PROMPT: &str = "You are a Chinese pronunciation expert. Evaluate the pronunciation quality and provide constructive feedback in English. Rate from 1-10 and give specific improvement suggestions.";
const EVALUATION_MAX_TOKENS: u32 = 300;

const SENTENCE_SYSTEM_PROMPT: &str =
    "You are a Chinese language teacher. Generate simple, clear sentences for beginners.";
const SENTENCE_MAX_TOKENS: u32 = 1000;

pub const DEFAULT_SENTENCE_COUNT: u64 = 5;

fn evaluation_prompt(transcription: &str) -> ChatPrompt {
    ChatPrompt {
        system: EVALUATION_SYSTEM_PROMPT.to_string(),
        user: format!(
            "Please evaluate this Chinese pronunciation: \"{}\". Provide a score from 1-10 and specific feedback for improvement.",
            transcription
        ),
        max_tokens: EVALUATION_MAX_TOKENS,
    }
}

/// Transcribe the clip, then ask the chat model to grade the transcription.
pub async fn evaluate_pronunciation(
    ai: &dyn TutorAi,
    clip: AudioClip,
) -> Result<PronunciationEvaluation, AiError> {
    let transcription = ai.transcribe(clip).await?;
    let evaluation = ai.complete(evaluation_prompt(&transcription)).await?;

    Ok(PronunciationEvaluation {
        transcription,
        evaluation,
    })
}

pub fn sentence_prompt(words: &[String], count: u64) -> ChatPrompt {
    let user = format!(
        "Generate {} simple Chinese sentences using these words: {}. \n\
         Each sentence should be appropriate for HSK 1-3 level learners. \n\
         Return the response as a JSON array with objects containing: \n\
         {{ \"chinese\": \"中文句子\", \"pinyin\": \"zhōng wén jù zi\", \"english\": \"English translation\" }}",
        count,
        words.join(", ")
    );

    ChatPrompt {
        system: SENTENCE_SYSTEM_PROMPT.to_string(),
        user,
        max_tokens: SENTENCE_MAX_TOKENS,
    }
}

/// Model output that is not valid JSON becomes the single fallback sentence.
/// Valid JSON passes through unchecked, whatever its shape.
pub fn parse_sentences(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Model returned unparseable sentences, using fallback: {}", e);
            serde_json::json!([Sentence::parse_failure()])
        }
    }
}

pub async fn generate_sentences(
    ai: &dyn TutorAi,
    words: &[String],
    count: u64,
) -> Result<Value, AiError> {
    let raw = ai.complete(sentence_prompt(words, count)).await?;
    Ok(parse_sentences(&raw))
}
