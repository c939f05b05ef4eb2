//! Closed tag sets used across the analysis pipeline.
//!
//! Each tag is a plain enum dispatched with `match`; the variant sets are
//! fixed, so no trait objects are involved.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Strategy used to turn a sample buffer into a [`Spectrum`](crate::Spectrum).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TransformDomain {
    /// Per-sample magnitude on the FFT frequency axis
    Time,
    /// Plain discrete Fourier transform
    #[default]
    Frequency,
    /// Short-time transform, per-bin maximum across segments
    Windowed,
    /// DFT after adding Gaussian imaginary noise to every sample
    PerturbedComplex,
    /// DFT after weighting by an external coherence reading
    ExternallyWeighted,
}

impl TransformDomain {
    /// All domains in declaration order.
    pub const ALL: [TransformDomain; 5] = [
        Self::Time,
        Self::Frequency,
        Self::Windowed,
        Self::PerturbedComplex,
        Self::ExternallyWeighted,
    ];

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Frequency => "frequency",
            Self::Windowed => "windowed",
            Self::PerturbedComplex => "perturbed_complex",
            Self::ExternallyWeighted => "externally_weighted",
        }
    }
}

impl fmt::Display for TransformDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classification of a resonance pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResonanceType {
    /// Single dominant partial, no harmonic series
    Fundamental,
    /// Three or more harmonic partials above threshold
    Harmonic,
    /// Dominant partial below 100 Hz
    Subharmonic,
    /// High-coherence class (coherence above 0.8)
    Quantum,
    /// Fallback when nothing else matches
    BeatFrequency,
    /// Resonance driven by the external field
    FieldEnhanced,
    /// Fixed-node standing pattern
    StandingWave,
    /// Resonance induced by a neighbouring source
    Sympathetic,
}

impl ResonanceType {
    /// All resonance types in declaration order.
    pub const ALL: [ResonanceType; 8] = [
        Self::Fundamental,
        Self::Harmonic,
        Self::Subharmonic,
        Self::Quantum,
        Self::BeatFrequency,
        Self::FieldEnhanced,
        Self::StandingWave,
        Self::Sympathetic,
    ];

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fundamental => "fundamental",
            Self::Harmonic => "harmonic",
            Self::Subharmonic => "subharmonic",
            Self::Quantum => "quantum",
            Self::BeatFrequency => "beat_frequency",
            Self::FieldEnhanced => "field_enhanced",
            Self::StandingWave => "standing_wave",
            Self::Sympathetic => "sympathetic",
        }
    }
}

impl fmt::Display for ResonanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered performance tier attached to every analysis.
///
/// Each tier runs 2.5x faster than the one below it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OperatingTier {
    /// 2.0x
    #[default]
    Standard,
    /// 5.0x
    Boosted,
    /// 12.5x
    Accelerated,
    /// 31.25x
    Turbo,
    /// 78.125x
    Peak,
}

impl OperatingTier {
    /// All tiers, lowest first.
    pub const ALL: [OperatingTier; 5] = [
        Self::Standard,
        Self::Boosted,
        Self::Accelerated,
        Self::Turbo,
        Self::Peak,
    ];

    /// Fixed speed multiplier for the tier.
    pub fn speed_multiplier(self) -> f64 {
        match self {
            Self::Standard => 2.0,
            Self::Boosted => 5.0,
            Self::Accelerated => 12.5,
            Self::Turbo => 31.25,
            Self::Peak => 78.125,
        }
    }

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Boosted => "boosted",
            Self::Accelerated => "accelerated",
            Self::Turbo => "turbo",
            Self::Peak => "peak",
        }
    }
}

impl fmt::Display for OperatingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Entry in the metrics catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Overall resonance strength
    Strength,
    /// Adjusted, clamped Q
    QualityFactor,
    /// Half-power bandwidth in Hz
    Bandwidth,
    /// Inverse quality factor
    Damping,
    /// Phase at the fundamental bin
    Phase,
    /// Blended coherence score
    Coherence,
    /// Amplitude at the fundamental bin
    Amplitude,
    /// Balance of harmonic energy against the fundamental
    HarmonicBalance,
}

impl MetricKind {
    /// The full catalogue in declaration order.
    pub const ALL: [MetricKind; 8] = [
        Self::Strength,
        Self::QualityFactor,
        Self::Bandwidth,
        Self::Damping,
        Self::Phase,
        Self::Coherence,
        Self::Amplitude,
        Self::HarmonicBalance,
    ];

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::QualityFactor => "quality_factor",
            Self::Bandwidth => "bandwidth",
            Self::Damping => "damping",
            Self::Phase => "phase",
            Self::Coherence => "coherence",
            Self::Amplitude => "amplitude",
            Self::HarmonicBalance => "harmonic_balance",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
