use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. One `Config` value is
/// constructed at process start and passed by reference into the chunker
/// and orchestrator; there is no ambient global state.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Generation service configuration
    pub generation: GenerationConfig,

    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Retry and degradation policy
    #[serde(default)]
    pub retry: RetryConfig,

    /// Validation thresholds
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Whether to reuse results for content-identical chunks
    #[serde(default = "default_true")]
    pub enable_cache: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Generation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GenerationConfig {
    /// Model name (e.g., "exaone3.5:7.8b", "phi4:latest")
    #[serde(default = "default_model")]
    pub model: String,

    /// Service endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Maximum number of concurrent requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Number of chunks submitted to the worker pool at a time
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            concurrent_requests: default_concurrent_requests(),
            batch_size: default_batch_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Chunking configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    /// Minimum chunk size in characters
    #[serde(default = "default_min_chunk_size")]
    pub min_chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: default_max_chunk_size(),
            min_chunk_size: default_min_chunk_size(),
        }
    }
}

/// Retry and bounded-degradation policy
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RetryConfig {
    /// Maximum generation attempts per chunk
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Number of invalid-but-non-empty results after which the last one
    /// is accepted as degraded instead of retrying further
    #[serde(default = "default_degrade_after_invalid")]
    pub degrade_after_invalid: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            degrade_after_invalid: default_degrade_after_invalid(),
        }
    }
}

/// Validation thresholds for generated output
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ValidationConfig {
    /// Minimum output length in characters before it counts as a result
    #[serde(default = "default_min_output_chars")]
    pub min_output_chars: usize,

    /// Minimum ratio of Hangul characters among non-whitespace characters
    #[serde(default = "default_min_hangul_ratio")]
    pub min_hangul_ratio: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_output_chars: default_min_output_chars(),
            min_hangul_ratio: default_min_hangul_ratio(),
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

fn default_model() -> String {
    "exaone3.5:7.8b".to_string()
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_batch_size() -> usize {
    8
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_chunk_size() -> usize {
    3500
}

fn default_min_chunk_size() -> usize {
    1500
}

fn default_max_attempts() -> u32 {
    5
}

fn default_degrade_after_invalid() -> u32 {
    2
}

fn default_min_output_chars() -> usize {
    10
}

fn default_min_hangul_ratio() -> f64 {
    0.3
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.generation.model.is_empty() {
            return Err(anyhow!("Model name must not be empty"));
        }
        if self.generation.concurrent_requests == 0 {
            return Err(anyhow!("concurrent_requests must be at least 1"));
        }
        if self.generation.batch_size == 0 {
            return Err(anyhow!("batch_size must be at least 1"));
        }
        if self.chunking.max_chunk_size == 0 || self.chunking.min_chunk_size == 0 {
            return Err(anyhow!("Chunk sizes must be positive"));
        }
        if self.chunking.min_chunk_size > self.chunking.max_chunk_size {
            return Err(anyhow!(
                "min_chunk_size ({}) must not exceed max_chunk_size ({})",
                self.chunking.min_chunk_size,
                self.chunking.max_chunk_size
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(anyhow!("max_attempts must be at least 1"));
        }
        if self.retry.degrade_after_invalid == 0 {
            return Err(anyhow!("degrade_after_invalid must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.validation.min_hangul_ratio) {
            return Err(anyhow!("min_hangul_ratio must be between 0.0 and 1.0"));
        }
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            generation: GenerationConfig::default(),
            chunking: ChunkingConfig::default(),
            retry: RetryConfig::default(),
            validation: ValidationConfig::default(),
            enable_cache: true,
            log_level: LogLevel::default(),
        }
    }
}
