//! Configuration for the content safety service.
//!
//! Settings are layered from an optional `config.*` file and
//! `CASTELLAN__`-prefixed environment variables over the serde defaults.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{SafetyError, SafetyResult};

/// Top-level configuration for the content safety service
#[derive(Debug, Clone, Deserialize)]
pub struct SafetyConfig {
    #[serde(default = "default_classifier")]
    pub classifier: ClassifierConfig,

    #[serde(default = "default_batching")]
    pub batching: BatchingConfig,

    #[serde(default = "default_dispatch")]
    pub dispatch: DispatchConfig,

    #[serde(default = "default_thresholds")]
    pub thresholds: ThresholdsConfig,
}

/// Content safety classifier endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key sent with every request. Empty for unauthenticated (local
    /// container) deployments.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Bounds for grouping documents into classification batches
#[derive(Debug, Clone, Deserialize)]
pub struct BatchingConfig {
    /// Maximum documents per batch
    #[serde(default = "default_max_documents")]
    pub max_documents: usize,

    /// Maximum aggregate content length per batch, in characters
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

/// Concurrency limits for batch dispatch
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Maximum classification calls in flight at once
    #[serde(default = "default_max_concurrent_batches")]
    pub max_concurrent_batches: usize,
}

/// Per-category severity thresholds on the classifier's 0-7 scale.
/// A reported severity strictly greater than the threshold flags the text.
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_severity")]
    pub hate: u8,

    #[serde(default = "default_severity")]
    pub violence: u8,

    #[serde(default = "default_severity")]
    pub self_harm: u8,

    #[serde(default = "default_severity")]
    pub sexual: u8,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            classifier: default_classifier(),
            batching: default_batching(),
            dispatch: default_dispatch(),
            thresholds: default_thresholds(),
        }
    }
}

impl SafetyConfig {
    /// Load configuration from file and env vars
    pub fn load() -> SafetyResult<Self> {
        Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("CASTELLAN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| SafetyError::Config {
                message: format!("Failed to build config: {}", e),
            })?
            .try_deserialize()
            .map_err(|e| SafetyError::Config {
                message: format!("Failed to deserialize config: {}", e),
            })
    }
}

// ==================== Default Value Functions ====================

fn default_classifier() -> ClassifierConfig {
    ClassifierConfig {
        endpoint: default_endpoint(),
        api_key: String::new(),
        api_key_header: default_api_key_header(),
        api_version: default_api_version(),
        request_timeout_secs: default_request_timeout_secs(),
    }
}

fn default_endpoint() -> String {
    "http://localhost:5000".to_string()
}

fn default_api_key_header() -> String {
    "api-key".to_string()
}

fn default_api_version() -> String {
    "2024-09-01".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_batching() -> BatchingConfig {
    BatchingConfig {
        max_documents: default_max_documents(),
        max_chars: default_max_chars(),
    }
}

fn default_max_documents() -> usize {
    5
}

fn default_max_chars() -> usize {
    10_000
}

fn default_dispatch() -> DispatchConfig {
    DispatchConfig {
        max_concurrent_batches: default_max_concurrent_batches(),
    }
}

fn default_max_concurrent_batches() -> usize {
    10
}

fn default_thresholds() -> ThresholdsConfig {
    ThresholdsConfig {
        hate: default_severity(),
        violence: default_severity(),
        self_harm: default_severity(),
        sexual: default_severity(),
    }
}

fn default_severity() -> u8 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classifier_limits() {
        let config: SafetyConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(config.batching.max_documents, 5);
        assert_eq!(config.batching.max_chars, 10_000);
        assert_eq!(config.dispatch.max_concurrent_batches, 10);
        assert_eq!(config.classifier.api_key_header, "api-key");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: SafetyConfig = serde_json::from_value(serde_json::json!({
            "batching": { "max_documents": 3 },
            "thresholds": { "violence": 4 }
        }))
        .unwrap();
        assert_eq!(config.batching.max_documents, 3);
        assert_eq!(config.batching.max_chars, 10_000);
        assert_eq!(config.thresholds.violence, 4);
        assert_eq!(config.thresholds.hate, 2);
    }
}
