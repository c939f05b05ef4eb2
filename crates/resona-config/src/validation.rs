//! Engine configuration validation.
//!
//! Every range check runs, and all violations are reported together so a bad
//! configuration file can be fixed in one pass.
//!
//! # Example
//!
//! ```rust
//! use resona_config::{EngineConfig, validate_config};
//!
//! let mut config = EngineConfig::default();
//! assert!(validate_config(&config).is_ok());
//!
//! config.sample_rate = -1.0;
//! assert!(validate_config(&config).is_err());
//! ```

use thiserror::Error;

use crate::engine_config::EngineConfig;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Numeric field outside its allowed range.
    #[error("field '{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Dotted path of the field.
        field: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Field value that is not a range violation (NaN, inconsistent pair, ...).
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted path of the field.
        field: String,
        /// Description of the problem.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Accumulates violations across all fields.
#[derive(Default)]
struct Checker {
    errors: Vec<ValidationError>,
}

impl Checker {
    fn range(&mut self, field: &str, value: f64, min: f64, max: f64) {
        if !(value >= min && value <= max) {
            self.errors.push(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                min,
                max,
            });
        }
    }

    fn count(&mut self, field: &str, value: usize, min: usize) {
        if value < min {
            self.errors.push(ValidationError::OutOfRange {
                field: field.to_string(),
                value: value as f64,
                min: min as f64,
                max: f64::INFINITY,
            });
        }
    }

    fn invalid(&mut self, field: &str, reason: impl Into<String>) {
        self.errors.push(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        });
    }

    fn finish(mut self) -> ValidationResult<()> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(ValidationError::Multiple(self.errors)),
        }
    }
}

/// Validate every field of an engine configuration.
pub fn validate_config(config: &EngineConfig) -> ValidationResult<()> {
    let mut check = Checker::default();

    check.count("transform_size", config.transform_size, 2);
    if !config.sample_rate.is_finite() || config.sample_rate <= 0.0 {
        check.invalid("sample_rate", "must be finite and positive");
    }

    check.range("peaks.min_height", config.peaks.min_height, 0.0, 1.0);
    check.count("peaks.min_separation", config.peaks.min_separation, 1);

    check.count("harmonics.max_multiplier", config.harmonics.max_multiplier, 2);
    if !(config.harmonics.tolerance > 0.0 && config.harmonics.tolerance < 1.0) {
        check.invalid("harmonics.tolerance", "must lie strictly between 0 and 1");
    }
    check.range(
        "harmonics.resonance_threshold",
        config.harmonics.resonance_threshold,
        0.0,
        1.0,
    );

    let quality = &config.quality;
    if !(quality.min.is_finite() && quality.max.is_finite()) {
        check.invalid("quality", "bounds must be finite");
    } else if quality.min >= quality.max {
        check.invalid(
            "quality",
            format!("min {} must be below max {}", quality.min, quality.max),
        );
    }
    if !quality.sentinel.is_finite() || quality.sentinel <= 0.0 {
        check.invalid("quality.sentinel", "must be finite and positive");
    }

    check.count("embedding_len", config.embedding_len, 2);
    check.count("window.segment_len", config.window.segment_len, 2);
    if config.window.overlap >= config.window.segment_len {
        check.invalid(
            "window.overlap",
            format!(
                "overlap {} must be smaller than segment_len {}",
                config.window.overlap, config.window.segment_len
            ),
        );
    }

    if !config.perturbation_sigma.is_finite() || config.perturbation_sigma < 0.0 {
        check.invalid("perturbation_sigma", "must be finite and non-negative");
    }

    if config.history_limit == Some(0) {
        check.invalid("history_limit", "must keep at least one entry when set");
    }

    check.finish()
}
