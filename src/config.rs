//! Configuration for the gradient sanity check
//!
//! This module provides the configuration read by the `sanity_check` binary:
//! network sizes, batch size, seed and the gradient checker settings.

use serde::Deserialize;
use std::fs;

use crate::error::{NetworkError, Result};
use crate::gradcheck::{GradCheckConfig, MismatchPolicy, DEFAULT_EPSILON, DEFAULT_TOLERANCE};
use crate::network::Dimensions;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Settings for one sanity-check run, parsed from JSON.
///
/// Only the sizes, batch size and seed are required:
///
/// - **epsilon**: perturbation size (default 1e-4)
/// - **tolerance**: per-index error tolerance (default 1e-5)
/// - **stop_at_first_mismatch**: stop at the first bad index (default false)
/// - **log_level**: one of trace, debug, info, warn, error (default info)
///
/// # Example
///
/// ```json
/// {
///   "input_size": 10,
///   "hidden_size": 5,
///   "output_size": 10,
///   "batch_size": 20,
///   "seed": 31415,
///   "tolerance": 1e-5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SanityCheckConfig {
    /// Number of input features (Dx)
    pub input_size: usize,

    /// Number of hidden units (H)
    pub hidden_size: usize,

    /// Number of classes (Dy)
    pub output_size: usize,

    /// Number of rows in the random batch (N)
    pub batch_size: usize,

    /// Seed for data, labels and parameters
    pub seed: u64,

    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    #[serde(default)]
    pub stop_at_first_mismatch: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SanityCheckConfig {
    fn default() -> Self {
        Self {
            input_size: 10,
            hidden_size: 5,
            output_size: 10,
            batch_size: 20,
            seed: 31415,
            epsilon: DEFAULT_EPSILON,
            tolerance: DEFAULT_TOLERANCE,
            stop_at_first_mismatch: false,
            log_level: default_log_level(),
        }
    }
}

impl SanityCheckConfig {
    pub fn dimensions(&self) -> Result<Dimensions> {
        Dimensions::new(self.input_size, self.hidden_size, self.output_size)
    }

    pub fn grad_check(&self) -> GradCheckConfig {
        GradCheckConfig {
            epsilon: self.epsilon,
            tolerance: self.tolerance,
            policy: if self.stop_at_first_mismatch {
                MismatchPolicy::StopAtFirst
            } else {
                MismatchPolicy::CollectAll
            },
        }
    }
}

/// Loads a sanity-check configuration from a JSON file.
///
/// Reads the file at `path`, deserializes it and validates the values.
///
/// # Examples
///
/// ```no_run
/// use rust_neural_gradcheck::config::load_config;
///
/// let cfg = load_config("config/sanity_check.json").unwrap();
/// assert_eq!(cfg.input_size, 10);
/// ```
pub fn load_config(path: &str) -> Result<SanityCheckConfig> {
    let contents = fs::read_to_string(path)?;
    let config: SanityCheckConfig = serde_json::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Check value ranges that serde cannot express.
pub fn validate_config(config: &SanityCheckConfig) -> Result<()> {
    if config.input_size == 0 || config.hidden_size == 0 || config.output_size == 0 {
        return Err(NetworkError::Config(format!(
            "layer sizes must be positive, got ({}, {}, {})",
            config.input_size, config.hidden_size, config.output_size
        )));
    }

    if config.batch_size == 0 {
        return Err(NetworkError::Config("batch_size must be positive".to_string()));
    }

    if !(config.epsilon.is_finite() && config.epsilon > 0.0) {
        return Err(NetworkError::Config(format!(
            "epsilon must be finite and positive, got {}",
            config.epsilon
        )));
    }

    if !(config.tolerance.is_finite() && config.tolerance > 0.0) {
        return Err(NetworkError::Config(format!(
            "tolerance must be finite and positive, got {}",
            config.tolerance
        )));
    }

    if !VALID_LOG_LEVELS.contains(&config.log_level.as_str()) {
        return Err(NetworkError::Config(format!(
            "Invalid log level '{}'. Must be one of: {}",
            config.log_level,
            VALID_LOG_LEVELS.join(", ")
        )));
    }

    Ok(())
}
