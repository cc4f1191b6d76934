//! Generation-layer configuration.

use crate::backends::gemini::DEFAULT_BASE_URL;
use crate::dispatch::RetryPolicy;
use crate::models::DEFAULT_MODELS;
use crate::pool::KeyFormat;
use serde::{Deserialize, Serialize};

/// Environment variables scanned for credentials, primary name first.
/// Each may hold one key or several separated by the accepted separators.
pub const CREDENTIAL_ENV_VARS: &[&str] =
    &["STUDYFORGE_API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Collects the raw credential source strings from the environment.
pub fn credential_sources_from_env() -> Vec<String> {
    CREDENTIAL_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .collect()
}

/// Configuration for the generation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenConfig {
    /// Base URL of the generation backend.
    #[serde(default = "default_base_url")]
    pub api_base_url: String,
    /// Model preference list, most preferred first.
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    /// Structural signature of a valid credential.
    #[serde(default)]
    pub key_format: KeyFormat,
    /// Retry behaviour for the dispatcher.
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Sampling temperature for every operation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Upper bound on generated tokens per call.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Per-call HTTP timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Extra credential strings appended to the environment sources
    /// (embedded fallback list).
    #[serde(default)]
    pub extra_keys: Vec<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_models() -> Vec<String> {
    DEFAULT_MODELS.iter().map(|m| (*m).to_string()).collect()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    4096
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(),
            models: default_models(),
            key_format: KeyFormat::default(),
            retry: RetryPolicy::default(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            extra_keys: Vec::new(),
        }
    }
}
