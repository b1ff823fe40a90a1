//! Server configuration
//!
//! Loaded from an optional JSON file, then overlaid with environment
//! variables. Every field has a default, so `{}` is a valid config file.

use herald_notify::WebhookConfig;
use herald_sentiment::lexicon::LexiconDocument;
use herald_sentiment::{AnalysisEngine, CoinDetector, KeywordScorer, Lexicon, ScoringConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_SERVER_NAME: &str = "herald-news-sentiment";
pub const DEFAULT_TIMEZONE: &str = "Asia/Kuwait";

/// Input size limits enforced before analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_title_chars: usize,
    pub max_summary_chars: usize,
    pub max_source_chars: usize,
    pub max_text_chars: usize,
    pub max_batch_items: usize,
    pub max_filter_coins: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_title_chars: 500,
            max_summary_chars: 2000,
            max_source_chars: 100,
            max_text_chars: 5000,
            max_batch_items: 50,
            max_filter_coins: 10,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server_name: String,
    pub version: String,
    pub timezone: String,
    /// Log filter, `env_logger` syntax
    pub log_level: String,
    pub market_sentiment_ttl_secs: u64,
    /// Analyzed results kept for market sentiment
    pub journal_capacity: usize,
    pub limits: Limits,
    pub scoring: ScoringConfig,
    /// Replaces the built-in lexicon when present
    pub lexicon: Option<LexiconDocument>,
    pub webhook: WebhookConfig,
    /// Name of an external assessor; reported in health output only
    pub assessor: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_name: DEFAULT_SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            log_level: "info".to_string(),
            market_sentiment_ttl_secs: 1800,
            journal_capacity: 10_000,
            limits: Limits::default(),
            scoring: ScoringConfig::default(),
            lexicon: None,
            webhook: WebhookConfig::default(),
            assessor: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Overlay process environment variables
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay variables from `lookup`
    ///
    /// Recognized: `LOG_LEVEL`, `WEBHOOK_URL`, `WEBHOOK_TIMEOUT_SECS`, `TZ`,
    /// `HERALD_ASSESSOR`. Blank values are ignored.
    pub fn with_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(level) = get("LOG_LEVEL") {
            self.log_level = level.to_lowercase();
        }
        if let Some(url) = get("WEBHOOK_URL") {
            self.webhook.url = Some(url);
        }
        if let Some(secs) = get("WEBHOOK_TIMEOUT_SECS") {
            self.webhook.timeout_secs = secs.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("WEBHOOK_TIMEOUT_SECS is not a number: {}", secs))
            })?;
        }
        if let Some(tz) = get("TZ") {
            self.timezone = tz;
        }
        if let Some(assessor) = get("HERALD_ASSESSOR") {
            self.assessor = Some(assessor);
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_name.trim().is_empty() {
            return Err(ConfigError::Invalid("server_name must not be empty".into()));
        }
        let limits = &self.limits;
        for (name, value) in [
            ("max_title_chars", limits.max_title_chars),
            ("max_summary_chars", limits.max_summary_chars),
            ("max_text_chars", limits.max_text_chars),
            ("max_batch_items", limits.max_batch_items),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be positive", name)));
            }
        }
        if self.webhook.timeout_secs == 0 {
            return Err(ConfigError::Invalid("webhook.timeout_secs must be positive".into()));
        }
        self.scoring.validate()?;
        Ok(())
    }

    pub fn market_sentiment_ttl(&self) -> Duration {
        Duration::from_secs(self.market_sentiment_ttl_secs)
    }

    /// Configured lexicon, or the built-in one
    pub fn build_lexicon(&self) -> Result<Lexicon, ConfigError> {
        match &self.lexicon {
            Some(doc) => Ok(Lexicon::from_document(doc.clone())?),
            None => Ok(Lexicon::builtin()),
        }
    }

    /// Analysis engine for this configuration
    pub fn build_engine(&self) -> Result<AnalysisEngine, ConfigError> {
        let lexicon = Arc::new(self.build_lexicon()?);
        let scorer = KeywordScorer::with_config(lexicon, self.scoring)?;
        Ok(AnalysisEngine::new(scorer, CoinDetector::default()))
    }
}
