/*!
 * Application configuration: loading, validating and saving settings.
 *
 * Configuration lives in a JSON file (`conf.json` by default). Every field
 * has a default, so a partial file works and a missing one is created with
 * the defaults written out. The corpus profile is part of the
 * configuration; a corpus with a different opaque script or tag inventory
 * only needs a different file.
 */

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::language;
use crate::profile::ScriptProfile;

/// Application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Corpus locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Generation service settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Pipeline behavior
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Corpus profile: opaque script ranges, tag classes, size bounds
    #[serde(default)]
    pub profile: ScriptProfile,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Where the corpus lives on disk
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathsConfig {
    /// Original entry markup, one `{id}.html` per entry
    #[serde(default = "default_original_dir")]
    pub original_dir: PathBuf,

    /// Translated plain text, one `{id}.txt` per entry
    #[serde(default = "default_text_dir")]
    pub text_dir: PathBuf,

    /// Assembled output, one `{id}.html` per entry
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Per-entry result ledger
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,

    /// Clean cache
    #[serde(default = "default_clean_cache_path")]
    pub clean_cache_path: PathBuf,

    /// Errata log
    #[serde(default = "default_errata_path")]
    pub errata_path: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            original_dir: default_original_dir(),
            text_dir: default_text_dir(),
            output_dir: default_output_dir(),
            ledger_path: default_ledger_path(),
            clean_cache_path: default_clean_cache_path(),
            errata_path: default_errata_path(),
        }
    }
}

/// Settings for the chat-completions server
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Server base URL, without the /v1 suffix
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name to request
    #[serde(default = "default_model")]
    pub model: String,

    /// Completion token limit per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Retries for transport-level failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between retries in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Pipeline behavior
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Entries processed concurrently
    #[serde(default = "default_parallel")]
    pub parallel: usize,

    /// Generation attempts per fragment before it fails
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Shuffle entries before applying a limit
    #[serde(default)]
    pub shuffle: bool,

    /// Custom prompt template file; the built-in template when absent
    #[serde(default)]
    pub prompt_template: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            max_attempts: default_max_attempts(),
            shuffle: false,
            prompt_template: None,
        }
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

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "fr".to_string()
}

fn default_original_dir() -> PathBuf {
    PathBuf::from("orig")
}

fn default_text_dir() -> PathBuf {
    PathBuf::from("txt")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("fr")
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("results.csv")
}

fn default_clean_cache_path() -> PathBuf {
    PathBuf::from("clean-cache.txt")
}

fn default_errata_path() -> PathBuf {
    PathBuf::from("errata.log")
}

fn default_endpoint() -> String {
    // Local OpenAI-compatible server (LM Studio convention)
    "http://localhost:1234".to_string()
}

fn default_model() -> String {
    "local-model".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    5000
}

fn default_parallel() -> usize {
    2
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            paths: PathsConfig::default(),
            provider: ProviderConfig::default(),
            pipeline: PipelineConfig::default(),
            profile: ScriptProfile::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Load the file if it exists, otherwise create it with defaults
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            log::warn!("Config file not found at {:?}, creating defaults", path.as_ref());
            let config = Config::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// English name of the source language
    pub fn source_language_name(&self) -> Result<String> {
        language::language_name(&self.source_language)
    }

    /// English name of the target language
    pub fn target_language_name(&self) -> Result<String> {
        language::language_name(&self.target_language)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.source_language_name()
            .with_context(|| format!("Bad source language: {}", self.source_language))?;
        self.target_language_name()
            .with_context(|| format!("Bad target language: {}", self.target_language))?;

        if self.provider.endpoint.trim().is_empty() {
            return Err(anyhow!("Provider endpoint must not be empty"));
        }
        if self.provider.model.trim().is_empty() {
            return Err(anyhow!("Provider model must not be empty"));
        }
        if self.pipeline.max_attempts == 0 {
            return Err(anyhow!("pipeline.max_attempts must be at least 1"));
        }
        if self.pipeline.parallel == 0 {
            return Err(anyhow!("pipeline.parallel must be at least 1"));
        }
        if self.profile.size_ratio_min >= self.profile.size_ratio_max {
            return Err(anyhow!(
                "profile.size_ratio_min ({}) must be below size_ratio_max ({})",
                self.profile.size_ratio_min,
                self.profile.size_ratio_max
            ));
        }

        Ok(())
    }
}
