//! Configuration for the resona spectral resonance engine.
//!
//! [`EngineConfig`] collects every tunable of the analysis pipeline: transform
//! size and sample rate, peak and harmonic thresholds, quality-factor bounds,
//! the short-time window, the embedding length, and the operating tier.
//!
//! # Features
//!
//! - **TOML files**: Load and save configurations; missing fields take defaults
//! - **Validation**: Every range is checked and all violations reported at once
//!
//! # Example
//!
//! ```rust,no_run
//! use resona_config::EngineConfig;
//! use resona_core::OperatingTier;
//!
//! let config = EngineConfig::load("engine.toml").unwrap();
//!
//! let tuned = EngineConfig::default()
//!     .with_sample_rate(48000.0)
//!     .with_tier(OperatingTier::Boosted);
//! tuned.save("tuned.toml").unwrap();
//! ```

mod engine_config;
mod error;

/// Engine configuration validation.
pub mod validation;

pub use engine_config::{EngineConfig, HarmonicConfig, PeakConfig, QualityConfig, WindowConfig};
pub use error::{ConfigError, FileOp};
pub use validation::{ValidationError, ValidationResult, validate_config};
