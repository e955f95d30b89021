use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::scrape::DEFAULT_CONTENT_SELECTOR;
use crate::{
    FetchSettings, HttpScraper, IngredientParser, JsonFileStore, ParseServiceClient,
    ParseSettings, RecipeImporter, RetrySettings, RetryingScraper, RuleBasedParser,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(String),
}

/// Engine configuration, usually read from a RON file. Omitted fields keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub storage_dir: PathBuf,
    pub load_delay_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
    pub content_selector: String,
    pub scrape_attempts: u32,
    pub retry_delay_ms: u64,
    /// Remote parse service; the rule-based parser is used when unset.
    pub parse_endpoint: Option<String>,
    pub parse_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::default_with_storage(PathBuf::from("."))
    }
}

impl EngineConfig {
    pub fn default_with_storage(storage_dir: PathBuf) -> Self {
        let fetch = FetchSettings::default();
        let retry = RetrySettings::default();
        Self {
            storage_dir,
            load_delay_ms: 500,
            connect_timeout_ms: fetch.connect_timeout.as_millis() as u64,
            request_timeout_ms: fetch.request_timeout.as_millis() as u64,
            max_bytes: fetch.max_bytes,
            content_selector: DEFAULT_CONTENT_SELECTOR.to_string(),
            scrape_attempts: retry.attempts,
            retry_delay_ms: retry.delay.as_millis() as u64,
            parse_endpoint: None,
            parse_timeout_ms: ParseSettings::default().request_timeout.as_millis() as u64,
        }
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_bytes,
            content_selector: self.content_selector.clone(),
            ..FetchSettings::default()
        }
    }

    pub fn retry_settings(&self) -> RetrySettings {
        RetrySettings {
            attempts: self.scrape_attempts.max(1),
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    pub fn parse_settings(&self) -> ParseSettings {
        ParseSettings {
            request_timeout: Duration::from_millis(self.parse_timeout_ms),
            ..ParseSettings::default()
        }
    }

    pub fn open_store(&self) -> JsonFileStore {
        JsonFileStore::new(self.storage_dir.clone())
    }

    /// HTTP scraper with retries, plus the remote or rule-based parser.
    pub fn build_importer(&self) -> RecipeImporter {
        let scraper = RetryingScraper::new(
            HttpScraper::new(self.fetch_settings()),
            self.retry_settings(),
        );
        let parser: Arc<dyn IngredientParser> = match self.parse_endpoint.as_deref() {
            Some(endpoint) => Arc::new(ParseServiceClient::new(endpoint, self.parse_settings())),
            None => Arc::new(RuleBasedParser),
        };
        RecipeImporter::new(Arc::new(scraper), parser)
    }
}
