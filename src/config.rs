use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_PREFIX: &str = "/api";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Prefix of the account endpoints (`register/`, `login/`, `profile/` ...).
    pub auth_prefix: String,
    /// Prefix of the student, fee-structure and payment endpoints.
    pub records_prefix: String,
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_prefix: DEFAULT_PREFIX.into(),
            records_prefix: DEFAULT_PREFIX.into(),
            timeout: None,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub session_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api = ApiConfig {
            base_url: std::env::var("FEEDESK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
            auth_prefix: std::env::var("FEEDESK_AUTH_PREFIX")
                .unwrap_or_else(|_| DEFAULT_PREFIX.into()),
            records_prefix: std::env::var("FEEDESK_RECORDS_PREFIX")
                .unwrap_or_else(|_| DEFAULT_PREFIX.into()),
            timeout: std::env::var("FEEDESK_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs),
        };
        let session_file = std::env::var("FEEDESK_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());
        Ok(Self { api, session_file })
    }
}

pub fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("feedesk")
        .join("session.json")
}
