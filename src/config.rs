use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::align::AlignmentStrategy;
use crate::llm::{LLMConfig, LLMProvider};

/// Configuration for the YouTube Chapter Analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Alignment policy settings
    pub alignment: AlignmentConfig,

    /// Content filtering settings
    pub filter: FilterConfig,

    /// Transcript/chapter fetching settings
    pub fetch: FetchConfig,

    /// LLM action settings
    pub llm: LLMConfig,

    /// Output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Alignment policy to use
    pub strategy: AlignmentStrategy,

    /// Symmetric chapter window widening in seconds (overlap-window strategy)
    pub overlap_offset_seconds: f64,

    /// Start pull-back in seconds (legacy single-assignment strategy)
    pub chapter_offset_seconds: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            strategy: AlignmentStrategy::OverlapWindow,
            overlap_offset_seconds: 5.0,
            chapter_offset_seconds: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Apply the denylist to chapter titles
    pub enable_chapter_filtering: bool,

    /// Apply the denylist to transcript segment text
    pub enable_transcript_filtering: bool,

    /// Case-insensitive substrings that mark sponsorship/ad content
    pub denylist: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enable_chapter_filtering: true,
            enable_transcript_filtering: true,
            denylist: vec![
                "sponsored by".to_string(),
                "today's sponsor".to_string(),
                "sponsor".to_string(),
                "advertisement".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// HTTP request timeout in seconds
    pub request_timeout_seconds: u64,

    /// User agent for watch-page requests
    pub user_agent: String,

    /// Preferred caption language code (e.g. "en")
    pub language: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            language: Some("en".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    pub pretty_json: bool,

    /// Default output file (stdout when unset)
    pub output_file: Option<PathBuf>,

    /// Log level
    pub log_level: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty_json: true,
            output_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_paths = [
            "chapter-analyzer.toml",
            "config/chapter-analyzer.toml",
            "~/.config/chapter-analyzer/config.toml",
            "/etc/chapter-analyzer/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config.with_env_overrides());
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default().with_env_overrides())
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(strategy) = std::env::var("CHAPTER_ANALYZER_STRATEGY") {
            match strategy.parse() {
                Ok(parsed) => self.alignment.strategy = parsed,
                Err(_) => tracing::warn!("Ignoring unknown strategy override: {}", strategy),
            }
        }

        if let Ok(overlap) = std::env::var("CHAPTER_ANALYZER_OVERLAP_SECONDS") {
            if let Ok(parsed) = overlap.parse() {
                self.alignment.overlap_offset_seconds = parsed;
            }
        }

        if let Ok(timeout) = std::env::var("CHAPTER_ANALYZER_FETCH_TIMEOUT") {
            if let Ok(parsed) = timeout.parse() {
                self.fetch.request_timeout_seconds = parsed;
            }
        }

        if let Ok(api_key) = std::env::var("CHAPTER_ANALYZER_LLM_API_KEY") {
            self.llm.api_key = Some(api_key);
        }

        if let Ok(model) = std::env::var("CHAPTER_ANALYZER_LLM_MODEL") {
            self.llm.model = model;
        }

        if let Ok(log_level) = std::env::var("CHAPTER_ANALYZER_LOG_LEVEL") {
            self.output.log_level = log_level;
        }

        self
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.alignment.overlap_offset_seconds < 0.0 {
            return Err(anyhow!("overlap_offset_seconds must be non-negative"));
        }

        if self.alignment.chapter_offset_seconds < 0.0 {
            return Err(anyhow!("chapter_offset_seconds must be non-negative"));
        }

        if self.fetch.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }

        match self.llm.provider {
            LLMProvider::OpenAI | LLMProvider::Gemini => {
                if self.llm.api_key.is_none() {
                    tracing::warn!(
                        "No API key configured for {:?}; LLM actions will fail",
                        self.llm.provider
                    );
                }
            }
            LLMProvider::LMStudio => {
                if self.llm.endpoint.is_none() {
                    return Err(anyhow!("endpoint required for the LMStudio provider"));
                }
            }
        }

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Chapter Analyzer Configuration:\n\
            - Strategy: {}\n\
            - Overlap Offset: {}s\n\
            - Chapter Filtering: {}\n\
            - Transcript Filtering: {}\n\
            - Fetch Timeout: {}s\n\
            - LLM Provider: {:?}",
            self.alignment.strategy.as_str(),
            self.alignment.overlap_offset_seconds,
            self.filter.enable_chapter_filtering,
            self.filter.enable_transcript_filtering,
            self.fetch.request_timeout_seconds,
            self.llm.provider,
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: AlignmentStrategy) -> Self {
        self.config.alignment.strategy = strategy;
        self
    }

    pub fn with_overlap_offset(mut self, seconds: f64) -> Self {
        self.config.alignment.overlap_offset_seconds = seconds;
        self
    }

    pub fn with_chapter_offset(mut self, seconds: f64) -> Self {
        self.config.alignment.chapter_offset_seconds = seconds;
        self
    }

    pub fn with_denylist(mut self, phrases: Vec<String>) -> Self {
        self.config.filter.denylist = phrases;
        self
    }

    pub fn enable_chapter_filtering(mut self, enable: bool) -> Self {
        self.config.filter.enable_chapter_filtering = enable;
        self
    }

    pub fn enable_transcript_filtering(mut self, enable: bool) -> Self {
        self.config.filter.enable_transcript_filtering = enable;
        self
    }

    pub fn with_llm_api_key(mut self, api_key: String) -> Self {
        self.config.llm.api_key = Some(api_key);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
