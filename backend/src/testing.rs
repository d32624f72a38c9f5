//! In-process fakes for the external services, shared by unit and router tests.

use crate::models::AudioClip;
use crate::openai::{AiError, ChatPrompt, TutorAi};
use crate::storage::{ImageFolder, ImageStore, ImageUpload, StorageError};
use async_trait::async_trait;
use std::sync::Mutex;

pub struct FakeAi {
    panic: bool,
    transcription: Result<String, String>,
    completion: Result<String, String>,
    transcribe_calls: Mutex<Vec<AudioClip>>,
    complete_calls: Mutex<Vec<ChatPrompt>>,
}

impl FakeAi {
    pub fn new(transcription: Result<String, String>, completion: Result<String, String>) -> Self {
        Self {
            panic: false,
            transcription,
            completion,
            transcribe_calls: Mutex::new(Vec::new()),
            complete_calls: Mutex::new(Vec::new()),
        }
    }

    /// Panics on every call.
    pub fn panicking() -> Self {
        Self {
            panic: true,
            ..Self::new(Ok(String::new()), Ok(String::new()))
        }
    }

    pub fn transcribe_count(&self) -> usize {
        self.transcribe_calls.lock().unwrap().len()
    }

    pub fn transcribed(&self) -> Vec<AudioClip> {
        self.transcribe_calls.lock().unwrap().clone()
    }

    pub fn complete_calls(&self) -> Vec<ChatPrompt> {
        self.complete_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TutorAi for FakeAi {
    async fn transcribe(&self, clip: AudioClip) -> Result<String, AiError> {
        if self.panic {
            panic!("transcription backend exploded");
        }
        self.transcribe_calls.lock().unwrap().push(clip);
        self.transcription.clone().map_err(AiError::Network)
    }

    async fn complete(&self, prompt: ChatPrompt) -> Result<String, AiError> {
        if self.panic {
            panic!("chat backend exploded");
        }
        self.complete_calls.lock().unwrap().push(prompt);
        self.completion.clone().map_err(|message| AiError::Api {
            status: 500,
            message,
        })
    }
}

/// Records uploads and deletes. Uploads fail once `fail_from` uploads have
/// succeeded.
#[derive(Default)]
pub struct FakeImageStore {
    fail_from: Option<usize>,
    uploads: Mutex<Vec<(ImageFolder, ImageUpload)>>,
    deletes: Mutex<Vec<String>>,
}

impl FakeImageStore {
    pub fn failing_after(successes: usize) -> Self {
        Self {
            fail_from: Some(successes),
            ..Default::default()
        }
    }

    pub fn uploads(&self) -> Vec<(ImageFolder, ImageUpload)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for FakeImageStore {
    async fn upload(
        &self,
        folder: ImageFolder,
        image: ImageUpload,
    ) -> Result<String, StorageError> {
        let mut uploads = self.uploads.lock().unwrap();
        if self.fail_from.is_some_and(|n| uploads.len() >= n) {
            return Err(StorageError::Upload("bucket unavailable".to_string()));
        }

        uploads.push((folder, image));
        Ok(format!(
            "https://cdn.test/{}/{}.png",
            folder.as_str(),
            uploads.len()
        ))
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        self.deletes.lock().unwrap().push(url.to_string());
        Ok(())
    }
}
