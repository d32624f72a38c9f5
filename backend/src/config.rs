use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_app_env")]
    pub app_env: String,

    // Only this origin may call the API (credentials allowed)
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_max_audio_size")]
    pub max_audio_size_mb: u64,

    #[serde(default = "default_max_json_body")]
    pub max_json_body_mb: u64,

    // R2 settings
    pub r2_account_id: String,
    pub r2_access_key_id: String,
    pub r2_secret_access_key: String,
    #[serde(default = "default_bucket_name")]
    pub r2_bucket_name: String,
    /// Public base URL the bucket is served from (custom domain or r2.dev).
    pub r2_public_url: String,
    #[serde(default = "default_storage_folder")]
    pub storage_folder: String,

    // Computed R2 endpoint
    #[serde(skip)]
    pub r2_endpoint: String,

    // OpenAI settings
    pub openai_api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_transcription_language")]
    pub transcription_language: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_database_url() -> String {
    "sqlite:./chinese-tutor.db?mode=rwc".to_string()
}

fn default_max_audio_size() -> u64 {
    10
}

fn default_max_json_body() -> u64 {
    50
}

fn default_bucket_name() -> String {
    "chinese-tutor".to_string()
}

fn default_storage_folder() -> String {
    "chinese-tutor".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4".to_string()
}

fn default_transcription_language() -> String {
    "zh".to_string()
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config: Config = envy::from_iter(vars)?;
        config.r2_endpoint = format!("https://{}.r2.cloudflarestorage.com", config.r2_account_id);
        Ok(config)
    }

    pub fn max_audio_size_bytes(&self) -> u64 {
        self.max_audio_size_mb * 1024 * 1024
    }

    /// Body limit for the audio upload route.
    pub fn max_audio_request_bytes(&self) -> usize {
        // Allow some overhead for multipart boundaries/headers.
        ((self.max_audio_size_mb + 1) * 1024 * 1024) as usize
    }

    pub fn max_json_body_bytes(&self) -> usize {
        (self.max_json_body_mb * 1024 * 1024) as usize
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
