//! Object storage for character images.
//!
//! Images arrive inline in JSON bodies as data URLs, get decoded here and are
//! written to an S3-compatible bucket (Cloudflare R2). Only the public URL of
//! the stored object is persisted with the character.

use crate::config::Config;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use uuid::Uuid;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    #[error("Failed to upload file: {0}")]
    Upload(String),

    #[error("Failed to delete file: {0}")]
    Delete(String),
}

/// Logical folder an image is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFolder {
    Characters,
    Mnemonics,
}

impl ImageFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFolder::Characters => "characters",
            ImageFolder::Mnemonics => "mnemonics",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub content_type: String,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the image and return its public URL.
    async fn upload(&self, folder: ImageFolder, image: ImageUpload)
        -> Result<String, StorageError>;

    /// Remove an object previously returned by [`ImageStore::upload`].
    async fn delete(&self, url: &str) -> Result<(), StorageError>;
}

/// Decode a `data:<mime>;base64,<payload>` URL or bare base64 text.
pub fn decode_image_payload(payload: &str) -> Result<ImageUpload, StorageError> {
    let payload = payload.trim();

    let (content_type, encoded) = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (header, body) = rest.split_once(',').ok_or_else(|| {
                StorageError::InvalidPayload("data URL has no payload".to_string())
            })?;

            let mut params = header.split(';');
            let mime = params.next().unwrap_or("").trim();
            if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
                return Err(StorageError::InvalidPayload(
                    "only base64 data URLs are supported".to_string(),
                ));
            }

            let mime = if mime.is_empty() {
                DEFAULT_CONTENT_TYPE
            } else {
                mime
            };
            (mime.to_ascii_lowercase(), body)
        }
        None => (DEFAULT_CONTENT_TYPE.to_string(), payload),
    };

    let data = STANDARD
        .decode(encoded.trim())
        .map_err(|e| StorageError::InvalidPayload(format!("bad base64: {}", e)))?;

    if data.is_empty() {
        return Err(StorageError::InvalidPayload("image is empty".to_string()));
    }

    Ok(ImageUpload { data, content_type })
}

fn extension_for(content_type: &str) -> String {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg".to_string(),
        "image/png" => "png".to_string(),
        "image/gif" => "gif".to_string(),
        "image/webp" => "webp".to_string(),
        "image/svg+xml" => "svg".to_string(),
        other => mime_guess::get_mime_extensions_str(other)
            .and_then(|exts| exts.first())
            .map(|ext| ext.to_string())
            .unwrap_or_else(|| "bin".to_string()),
    }
}

fn build_key(prefix: &str, folder: ImageFolder, object_name: &str, ext: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("{}/{}.{}", folder.as_str(), object_name, ext)
    } else {
        format!("{}/{}/{}.{}", prefix, folder.as_str(), object_name, ext)
    }
}

pub struct S3ImageStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url: String,
    folder_prefix: String,
}

impl S3ImageStore {
    pub fn new(
        client: aws_sdk_s3::Client,
        bucket: impl Into<String>,
        public_url: impl Into<String>,
        folder_prefix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
            folder_prefix: folder_prefix.into(),
        }
    }

    /// Build an R2 client (avoid aws-config to reduce dependencies/compile time).
    pub fn from_config(config: &Config) -> Self {
        let s3_config = aws_sdk_s3::Config::builder()
            .endpoint_url(&config.r2_endpoint)
            .credentials_provider(aws_sdk_s3::config::Credentials::new(
                &config.r2_access_key_id,
                &config.r2_secret_access_key,
                None,
                None,
                "r2",
            ))
            .region(aws_sdk_s3::config::Region::new("auto"))
            .build();

        Self::new(
            aws_sdk_s3::Client::from_conf(s3_config),
            &config.r2_bucket_name,
            &config.r2_public_url,
            &config.storage_folder,
        )
    }

    fn public_url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }

    fn key_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.public_url.as_str())?
            .strip_prefix('/')
            .filter(|key| !key.is_empty())
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn upload(
        &self,
        folder: ImageFolder,
        image: ImageUpload,
    ) -> Result<String, StorageError> {
        let ext = extension_for(&image.content_type);
        let key = build_key(
            &self.folder_prefix,
            folder,
            &Uuid::new_v4().to_string(),
            &ext,
        );
        let size = image.data.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(image.data))
            .content_type(&image.content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        tracing::debug!(key = %key, bytes = size, "Uploaded image");
        Ok(self.public_url_for(&key))
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let key = self
            .key_from_url(url)
            .ok_or_else(|| StorageError::Delete(format!("{} is not in this bucket", url)))?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete(e.to_string()))?;

        Ok(())
    }
}
