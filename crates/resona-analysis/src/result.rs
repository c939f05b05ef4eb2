//! The immutable record produced by one analysis.

use resona_core::{OperatingTier, ResonancePeak, ResonanceType, Spectrum, Timestamp, TransformDomain};
use rustfft::num_complex::Complex;

/// Resonance state of one analysed signal.
///
/// Created once per [`ResonanceEngine::analyze`](crate::ResonanceEngine::analyze)
/// call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Normalized spectrum of the conditioned signal
    pub spectrum: Spectrum,
    /// Peaks sorted by amplitude, descending
    pub peaks: Vec<ResonancePeak>,
    /// Fundamental frequency in Hz (0.0 when none could be located)
    pub fundamental_hz: f64,
    /// Accepted harmonic frequencies, ascending multiplier order
    pub harmonics: Vec<f64>,
    /// Half-power bandwidth around the fundamental, Hz
    pub bandwidth_hz: f64,
    /// Blended coherence in `[0, 1]`
    pub coherence: f64,
    /// Strongest peak scaled by coherence, in `[0, 1]`
    pub resonance_strength: f64,
    /// Adjusted quality factor in `[quality.min, quality.max]`
    pub quality_factor: f64,
    /// Classified pattern
    pub resonance_type: ResonanceType,
    /// Tier the engine was configured with
    pub operating_tier: OperatingTier,
    /// Transform strategy used
    pub domain: TransformDomain,
    /// Unique, strictly increasing per engine
    pub timestamp: Timestamp,
    /// Normalized complex embedding of the spectrum
    pub embedding: Option<Vec<Complex<f64>>>,
}

impl AnalysisResult {
    /// Number of accepted harmonics.
    pub fn harmonic_count(&self) -> usize {
        self.harmonics.len()
    }

    /// Amplitude of the strongest peak, 0.0 when there are none.
    pub fn strongest_peak(&self) -> f64 {
        self.peaks.first().map_or(0.0, |p| p.amplitude)
    }
}
