//! Configuration types for batch summarisation.
//!
//! Every knob the binary exposes ends up in [`SummarizeConfig`], built via
//! [`SummarizeConfigBuilder`]. The batch core itself only needs the pieces
//! it is handed (summarizer, extractor, files, output dir, suffix); the config
//! exists so the CLI and library callers describe a run in one place.

use crate::error::SummarizeError;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Environment variable that switches extraction into placeholder mode.
pub const TEST_MODE_VAR: &str = "SUMMARIZE_CLI_TEST";

/// Configuration for a batch summarisation run.
///
/// # Example
/// ```rust
/// use pdfsumm::{ExecutionMode, SummarizeConfig, SummaryType};
///
/// let config = SummarizeConfig::builder()
///     .summary_type(SummaryType::BulletPoint)
///     .output_dir("summaries")
///     .suffix("bullets")
///     .execution(ExecutionMode::Async)
///     .build()
///     .unwrap();
/// assert_eq!(config.suffix, "bullets");
/// ```
#[derive(Clone)]
pub struct SummarizeConfig {
    /// LLM model identifier. Default: `gpt-4o-mini`.
    pub model: String,

    /// LLM provider name passed to `ProviderFactory`. Default: `openai`.
    pub provider_name: String,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Which built-in prompt to use. Default: [`SummaryType::Concise`].
    pub summary_type: SummaryType,

    /// Directory the summary files are written to. Default: `.`.
    pub output_dir: PathBuf,

    /// Filename suffix joined to the source stem with a hyphen. Default: `summary`.
    ///
    /// An empty suffix produces `{stem}.txt` with no trailing hyphen.
    pub suffix: String,

    /// Synchronous (one file at a time) or staged concurrent run. Default: sync.
    pub execution: ExecutionMode,

    /// Real pdfium extraction or the offline placeholder. Default: real.
    pub extraction: ExtractionMode,

    /// Sampling temperature. Default: 0.0.
    pub temperature: f32,

    /// Maximum tokens in the generated summary. `None` leaves it to the provider.
    pub max_tokens: Option<usize>,

    /// Join string between pages. `None` means the batch default (empty string).
    pub page_delimiter: Option<String>,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            provider_name: "openai".to_string(),
            provider: None,
            summary_type: SummaryType::default(),
            output_dir: PathBuf::from("."),
            suffix: "summary".to_string(),
            execution: ExecutionMode::default(),
            extraction: ExtractionMode::default(),
            temperature: 0.0,
            max_tokens: None,
            page_delimiter: None,
        }
    }
}

impl fmt::Debug for SummarizeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizeConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("summary_type", &self.summary_type)
            .field("output_dir", &self.output_dir)
            .field("suffix", &self.suffix)
            .field("execution", &self.execution)
            .field("extraction", &self.extraction)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("page_delimiter", &self.page_delimiter)
            .finish()
    }
}

impl SummarizeConfig {
    /// Create a new builder for `SummarizeConfig`.
    pub fn builder() -> SummarizeConfigBuilder {
        SummarizeConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SummarizeConfig`].
#[derive(Debug)]
pub struct SummarizeConfigBuilder {
    config: SummarizeConfig,
}

impl SummarizeConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn summary_type(mut self, kind: SummaryType) -> Self {
        self.config.summary_type = kind;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.suffix = suffix.into();
        self
    }

    pub fn execution(mut self, mode: ExecutionMode) -> Self {
        self.config.execution = mode;
        self
    }

    pub fn extraction(mut self, mode: ExtractionMode) -> Self {
        self.config.extraction = mode;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn page_delimiter(mut self, delim: impl Into<String>) -> Self {
        self.config.page_delimiter = Some(delim.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummarizeConfig, SummarizeError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(SummarizeError::InvalidConfig(
                "model name must not be empty".into(),
            ));
        }
        if c.provider.is_none() && c.provider_name.trim().is_empty() {
            return Err(SummarizeError::InvalidConfig(
                "provider name must not be empty".into(),
            ));
        }
        if c.max_tokens == Some(0) {
            return Err(SummarizeError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// The three built-in summary styles.
///
/// Selecting a style only changes the prompt template; the rest of the
/// pipeline is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryType {
    /// Short prose summary (default).
    #[default]
    Concise,
    /// Concise summary formatted as bullet points.
    BulletPoint,
    /// Longer prose summary.
    Detailed,
}

impl SummaryType {
    /// All styles, in the order the CLI lists them.
    pub const ALL: [SummaryType; 3] = [
        SummaryType::Concise,
        SummaryType::BulletPoint,
        SummaryType::Detailed,
    ];

    /// The key used on the command line and in serialised configs.
    pub fn key(self) -> &'static str {
        match self {
            SummaryType::Concise => "concise",
            SummaryType::BulletPoint => "bullet_point",
            SummaryType::Detailed => "detailed",
        }
    }
}

impl fmt::Display for SummaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SummaryType {
    type Err = SummarizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        SummaryType::ALL
            .into_iter()
            .find(|t| t.key() == key)
            .ok_or_else(|| {
                SummarizeError::InvalidConfig(format!(
                    "unknown summary type '{s}' (expected concise, bullet_point or detailed)"
                ))
            })
    }
}

/// How the batch driver schedules work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Extract → summarise → write one file at a time (default).
    #[default]
    Sync,
    /// Three concurrent stages: extract-all, summarise-all, write-all.
    Async,
}

/// Where extracted text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Parse the PDF with pdfium (default).
    #[default]
    Real,
    /// Return a fixed placeholder document without touching the file.
    Placeholder,
}

impl ExtractionMode {
    /// `Placeholder` when `SUMMARIZE_CLI_TEST=1`, otherwise `Real`.
    ///
    /// This is the only place the test-mode variable is consulted; extractors
    /// are always handed their mode explicitly.
    pub fn from_env() -> Self {
        Self::from_flag(std::env::var(TEST_MODE_VAR).ok().as_deref())
    }

    fn from_flag(value: Option<&str>) -> Self {
        match value {
            Some("1") => ExtractionMode::Placeholder,
            _ => ExtractionMode::Real,
        }
    }
}
