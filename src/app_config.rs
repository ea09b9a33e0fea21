use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language hint for transcription (passed through verbatim, None = auto)
    #[serde(default)]
    pub language: Option<String>,

    /// Output directory for generated artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Transcription service config
    #[serde(default)]
    pub transcriber: TranscriberConfig,

    /// Cue formatting config
    #[serde(default)]
    pub formatting: FormatConfig,

    /// Burn-in subtitle style
    #[serde(default)]
    pub style: StyleConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: None,
            output_dir: default_output_dir(),
            transcriber: TranscriberConfig::default(),
            formatting: FormatConfig::default(),
            style: StyleConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration, failing fast on anything the pipeline
    /// would otherwise trip over mid-run
    pub fn validate(&self) -> Result<()> {
        self.transcriber.validate()?;
        self.formatting.validate()?;
        self.style.validate()?;

        if self.output_dir.trim().is_empty() {
            return Err(anyhow!("output_dir must not be empty"));
        }

        Ok(())
    }
}

/// Transcription service provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranscriberProvider {
    // @provider: Self-hosted OpenAI-compatible server (faster-whisper-server etc.)
    #[default]
    Local,
    // @provider: OpenAI hosted API
    OpenAI,
}

impl TranscriberProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Local => "Local",
            Self::OpenAI => "OpenAI",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Local => "local".to_string(),
            Self::OpenAI => "openai".to_string(),
        }
    }
}

impl std::fmt::Display for TranscriberProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranscriberProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "openai" => Ok(Self::OpenAI),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Transcription service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriberConfig {
    /// Provider type
    #[serde(default)]
    pub provider: TranscriberProvider,

    /// Model name (e.g. "whisper-1" for OpenAI, "large-v3" for local servers)
    #[serde(default = "default_transcriber_model")]
    pub model: String,

    /// API key for the service (required for OpenAI)
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service base URL
    #[serde(default = "default_transcriber_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_transcriber_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            provider: TranscriberProvider::default(),
            model: default_transcriber_model(),
            api_key: String::new(),
            endpoint: default_transcriber_endpoint(),
            timeout_secs: default_transcriber_timeout_secs(),
        }
    }
}

impl TranscriberConfig {
    /// Validate the transcriber configuration
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(anyhow!(
                "Transcriber endpoint is not configured (provider {})",
                self.provider
            ));
        }

        if self.model.trim().is_empty() {
            return Err(anyhow!("Transcriber model is not configured"));
        }

        if self.provider == TranscriberProvider::OpenAI && self.api_key.trim().is_empty() {
            return Err(anyhow!(
                "Provider {} requires an API key",
                self.provider.display_name()
            ));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow!("Transcriber timeout must be positive"));
        }

        Ok(())
    }
}

/// Cue formatting configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FormatConfig {
    /// Maximum characters per display line
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,

    /// Whether oversized cues are split at all
    #[serde(default = "default_true")]
    pub split_long_cues: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            split_long_cues: true,
        }
    }
}

impl FormatConfig {
    /// Validate the formatting configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_line_length == 0 {
            return Err(anyhow!("max_line_length must be positive"));
        }
        Ok(())
    }
}

/// Burn-in subtitle style.
///
/// Field names follow the wire format of the style payload the render tool
/// historically accepted, hence camelCase.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    /// Font family name
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font size in points
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Text color as #RRGGBB
    #[serde(default = "default_color")]
    pub color: String,

    /// Outline color as #RRGGBB
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,

    /// Outline width in pixels
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: default_font_size(),
            color: default_color(),
            stroke_color: default_stroke_color(),
            stroke_width: default_stroke_width(),
        }
    }
}

impl StyleConfig {
    /// Validate the style configuration.
    ///
    /// Malformed colors are deliberately not rejected here; they degrade to
    /// the default white at render time.
    pub fn validate(&self) -> Result<()> {
        if self.font_family.trim().is_empty() {
            return Err(anyhow!("fontFamily must not be empty"));
        }
        if self.font_size == 0 {
            return Err(anyhow!("fontSize must be positive"));
        }
        Ok(())
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Map onto the log crate's level filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

// Default value functions for serde

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_transcriber_model() -> String {
    "large-v3".to_string()
}

fn default_transcriber_endpoint() -> String {
    "http://localhost:8000".to_string()
}

fn default_transcriber_timeout_secs() -> u64 {
    300
}

fn default_max_line_length() -> usize {
    crate::line_wrap::DEFAULT_MAX_LINE_LENGTH
}

fn default_true() -> bool {
    true
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    24
}

fn default_color() -> String {
    "#FFFFFF".to_string()
}

fn default_stroke_color() -> String {
    "#000000".to_string()
}

fn default_stroke_width() -> u32 {
    2
}
