//! Resona Analysis - Spectral resonance analysis engine
//!
//! Takes a raw real-valued signal through a fixed pipeline:
//!
//! - [`conditioner`] - Optional enhancement gain and Gaussian perturbation
//! - [`transform`] - Spectrum under a selectable [`TransformDomain`](resona_core::TransformDomain)
//! - [`peaks`] - Local maxima with a minimum bin separation
//! - [`harmonics`] - Fundamental frequency and tolerance-banded harmonic series
//! - [`bandwidth`] - Half-power (-3 dB) bandwidth and quality factor
//! - [`coherence`] - Amplitude, phase and external field coherence blend
//! - [`classify`] - Resonance type decision procedure
//! - [`encoder`] - Normalized complex state embedding
//! - [`metrics`] - Fingerprinted, memoized metric catalogue
//!
//! [`ResonanceEngine`] runs the pipeline, owns the analysis history and the
//! metric cache, and builds [`Summary`] reports. External enhancement and
//! field readings come from the [`collaborators`] traits and are always read
//! best-effort.
//!
//! ## Example
//!
//! ```rust
//! use resona_analysis::ResonanceEngine;
//! use resona_config::EngineConfig;
//! use resona_core::{MetricKind, TransformDomain};
//!
//! let mut engine = ResonanceEngine::new(EngineConfig::default()).unwrap();
//! let signal: Vec<f64> = (0..4096)
//!     .map(|i| (2.0 * std::f64::consts::PI * 1000.0 * i as f64 / 44100.0).sin())
//!     .collect();
//!
//! let result = engine.analyze(&signal, TransformDomain::Windowed, false).unwrap();
//! let metrics = engine.compute_metrics(&result, Some(&[MetricKind::QualityFactor]));
//! assert!(metrics[&MetricKind::QualityFactor].verify(&result));
//!
//! let summary = engine.summary(&result, Some(&metrics));
//! println!("{}", summary.to_json().unwrap());
//! ```

pub mod bandwidth;
pub mod classify;
pub mod coherence;
pub mod collaborators;
pub mod conditioner;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod fft;
pub mod harmonics;
pub mod metrics;
pub mod peaks;
pub mod result;
pub mod summary;
pub mod transform;

// Re-export main types
pub use bandwidth::{HalfPowerBand, adjust_quality, half_power_band};
pub use classify::classify;
pub use coherence::coherence;
pub use collaborators::{
    Collaborators, EnhancementProvider, FieldCoherenceProvider, FixedEnhancement, FixedField,
    OscillatingEnhancement, Unavailable,
};
pub use conditioner::condition;
pub use encoder::encode_state;
pub use engine::ResonanceEngine;
pub use error::{AnalysisError, ProviderError};
pub use fft::{Fft, hann};
pub use harmonics::{Fundamental, Harmonic, locate_fundamental, match_harmonics};
pub use metrics::{Metric, MetricsCatalogue};
pub use peaks::find_peaks;
pub use result::AnalysisResult;
pub use summary::{Summary, quantum_score};
pub use transform::SpectralTransformer;
