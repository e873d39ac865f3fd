//! Configuration loading
//!
//! Layered: defaults < TOML file < environment. Environment keys use the
//! `STOCKCAST` prefix with `__` between section and field, e.g.
//! `STOCKCAST_SERVER__PORT=9000` or `STOCKCAST_MODEL__EPOCHS=10`.
//! Every section is optional so the service runs with no config file at all.

use crate::error::{ForecastError, Result};
use serde::Deserialize;

/// Top-level service configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub consolidator: ConsolidatorConfig,
}

/// HTTP server binding
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Market data provider endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Exchange suffix appended to every uppercased ticker
    #[serde(default = "default_ticker_suffix")]
    pub ticker_suffix: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Per-feature sequence model and training hyperparameters
///
/// `hidden_size` is the single source of truth for the recurrent width;
/// the original implementation carried two conflicting defaults (100 in
/// the training entry point, 150 on the model class) and 100 is the value
/// its endpoint actually exercised.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_sequence_length")]
    pub sequence_length: usize,
    #[serde(default = "default_hidden_size")]
    pub hidden_size: usize,
    #[serde(default = "default_bidirectional")]
    pub bidirectional: bool,
    #[serde(default = "default_dropout")]
    pub dropout: f32,
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// How the consolidation network gets its weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidatorMode {
    /// Freshly initialized random weights, never trained. This mirrors the
    /// original endpoint's behavior and is deliberately kept as a mode
    /// rather than silently "fixed".
    Random,
    /// Fixed constant weights; deterministic and reproducible
    Static,
}

/// Consolidation network shape and weight mode
#[derive(Debug, Clone, Deserialize)]
pub struct ConsolidatorConfig {
    #[serde(default = "default_consolidator_mode")]
    pub mode: ConsolidatorMode,
    #[serde(default = "default_hidden1")]
    pub hidden1: usize,
    #[serde(default = "default_hidden2")]
    pub hidden2: usize,
    #[serde(default = "default_output_size")]
    pub output_size: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}
fn default_ticker_suffix() -> String {
    ".NS".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_sequence_length() -> usize {
    75
}
fn default_hidden_size() -> usize {
    100
}
fn default_bidirectional() -> bool {
    true
}
fn default_dropout() -> f32 {
    0.1
}
fn default_epochs() -> usize {
    50
}
fn default_learning_rate() -> f64 {
    0.01
}
fn default_batch_size() -> usize {
    32
}
fn default_consolidator_mode() -> ConsolidatorMode {
    ConsolidatorMode::Random
}
fn default_hidden1() -> usize {
    64
}
fn default_hidden2() -> usize {
    32
}
fn default_output_size() -> usize {
    1
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ticker_suffix: default_ticker_suffix(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            sequence_length: default_sequence_length(),
            hidden_size: default_hidden_size(),
            bidirectional: default_bidirectional(),
            dropout: default_dropout(),
            epochs: default_epochs(),
            learning_rate: default_learning_rate(),
            batch_size: default_batch_size(),
        }
    }
}

impl Default for ConsolidatorConfig {
    fn default() -> Self {
        Self {
            mode: default_consolidator_mode(),
            hidden1: default_hidden1(),
            hidden2: default_hidden2(),
            output_size: default_output_size(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file plus environment
    pub fn load(path: &str) -> Result<Self> {
        let path = shellexpand::tilde(path).to_string();
        config::Config::builder()
            .add_source(config::File::with_name(&path).required(false))
            .add_source(config::Environment::with_prefix("STOCKCAST").separator("__"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ForecastError::Internal(format!("config load failed: {e}")))
    }
}
