//! Engine configuration file format and operations.

use resona_core::OperatingTier;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, FileOp};
use crate::validation::validate_config;

/// Tunables for a resonance analysis engine.
///
/// Every field has a default, so a configuration file only needs to name the
/// values it changes.
///
/// # TOML Format
///
/// ```toml
/// transform_size = 8192
/// sample_rate = 48000.0
/// operating_tier = "turbo"
/// seed = 7
///
/// [peaks]
/// min_height = 0.4
/// min_separation = 12
///
/// [harmonics]
/// tolerance = 0.03
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of bins `N`; inputs are truncated or zero-padded to this length.
    pub transform_size: usize,

    /// Sample rate `R` in Hz.
    pub sample_rate: f64,

    /// Maximum length of the complex signal-state embedding.
    pub embedding_len: usize,

    /// Standard deviation of the imaginary noise in the perturbed-complex domain.
    pub perturbation_sigma: f64,

    /// Tier recorded on every analysis result.
    pub operating_tier: OperatingTier,

    /// Scale the enhancement factor by the magnitude of the field energy reading.
    pub scale_enhancement_by_field: bool,

    /// Keep at most this many results in history (oldest dropped first).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_limit: Option<usize>,

    /// Seed for the perturbation RNG; entropy-seeded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Peak detection settings.
    pub peaks: PeakConfig,

    /// Harmonic matching settings.
    pub harmonics: HarmonicConfig,

    /// Quality factor bounds and sentinel.
    pub quality: QualityConfig,

    /// Short-time transform settings for the windowed domain.
    pub window: WindowConfig,
}

/// Peak detection settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PeakConfig {
    /// Minimum normalized amplitude for a local maximum to count.
    pub min_height: f64,
    /// Minimum index distance between accepted peaks.
    pub min_separation: usize,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            min_height: 0.5,
            min_separation: 10,
        }
    }
}

/// Harmonic matching settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HarmonicConfig {
    /// Highest integer multiple of the fundamental searched.
    pub max_multiplier: usize,
    /// Allowed relative deviation `|actual − target| / target`.
    pub tolerance: f64,
    /// Amplitude a harmonic bin must exceed.
    pub resonance_threshold: f64,
}

impl Default for HarmonicConfig {
    fn default() -> Self {
        Self {
            max_multiplier: 10,
            tolerance: 0.05,
            resonance_threshold: 0.5,
        }
    }
}

/// Quality factor bounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QualityConfig {
    /// Lower clamp.
    pub min: f64,
    /// Upper clamp.
    pub max: f64,
    /// Q reported when the half-power bandwidth collapses to zero.
    pub sentinel: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 1000.0,
            sentinel: 100.0,
        }
    }
}

/// Short-time transform settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Samples per segment.
    pub segment_len: usize,
    /// Samples shared by consecutive segments.
    pub overlap: usize,
}

impl WindowConfig {
    /// Distance between consecutive segment starts.
    pub fn hop(&self) -> usize {
        self.segment_len.saturating_sub(self.overlap).max(1)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            segment_len: 256,
            overlap: 128,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transform_size: 4096,
            sample_rate: 44100.0,
            peaks: PeakConfig::default(),
            harmonics: HarmonicConfig::default(),
            quality: QualityConfig::default(),
            window: WindowConfig::default(),
            embedding_len: 256,
            perturbation_sigma: 0.1,
            operating_tier: OperatingTier::default(),
            scale_enhancement_by_field: false,
            history_limit: None,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Set the transform size.
    pub fn with_transform_size(mut self, size: usize) -> Self {
        self.transform_size = size;
        self
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the operating tier.
    pub fn with_tier(mut self, tier: OperatingTier) -> Self {
        self.operating_tier = tier;
        self
    }

    /// Seed the perturbation RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cap the analysis history.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Frequency resolution in Hz.
    pub fn bin_width(&self) -> f64 {
        self.sample_rate / self.transform_size as f64
    }

    /// Check every field range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self)?;
        Ok(())
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io(FileOp::Read, path, e))?;
        Self::from_toml(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::io(FileOp::CreateDir, parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::io(FileOp::Write, path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
