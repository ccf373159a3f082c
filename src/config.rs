use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub dir: PathBuf,
    pub background_url: Option<String>,
    pub fetch_attempts: u32,
    pub fetch_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: Option<u16>,
    pub workers: usize,
    pub log_level: Option<String>,
    pub log_json: bool,
    pub gemini: GeminiConfig,
    pub assets: AssetConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The key is taken as-is; a missing one only fails when a generation is attempted.
    pub fn from_env() -> Self {
        let api_key = env::var("GOOGLE_API_KEY").ok();
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        GeminiConfig {
            api_key,
            model,
            base_url,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        AssetConfig {
            dir: PathBuf::from("."),
            background_url: None,
            fetch_attempts: 3,
            fetch_delay: Duration::from_secs(2),
        }
    }
}

impl AssetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let dir = env::var("ASSETS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.dir);
        let background_url = env::var("BACKGROUND_ANIMATION_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let fetch_attempts = env::var("ASSET_FETCH_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.fetch_attempts);
        let fetch_delay = env::var("ASSET_FETCH_DELAY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.fetch_delay);

        AssetConfig {
            dir,
            background_url,
            fetch_attempts,
            fetch_delay,
        }
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    pub fn with_background_url(mut self, url: impl Into<String>) -> Self {
        self.background_url = Some(url.into());
        self
    }

    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.fetch_attempts = attempts;
        self.fetch_delay = delay;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: None,
            workers: 1,
            log_level: None,
            log_json: false,
            gemini: GeminiConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());
        let workers = env::var("WORKERS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(1);
        let log_level = env::var("LOG_LEVEL").ok();
        let log_json = env::var("LOG_JSON").ok().map_or(false, |val| val == "true");

        Config {
            host,
            port,
            workers,
            log_level,
            log_json,
            gemini: GeminiConfig::from_env(),
            assets: AssetConfig::from_env(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_assets(mut self, config: AssetConfig) -> Self {
        self.assets = config;
        self
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(8501)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port_or_default())
    }
}
