//! Resonance pattern classification.

use resona_core::ResonanceType;

/// Coherence above which a result is classed as [`ResonanceType::Quantum`].
pub const QUANTUM_COHERENCE: f64 = 0.8;

/// Fundamentals below this frequency (Hz) are classed as subharmonic.
pub const SUBHARMONIC_CEILING_HZ: f64 = 100.0;

/// Minimum harmonic count for [`ResonanceType::Harmonic`].
pub const HARMONIC_MIN_COUNT: usize = 3;

/// Map coherence, harmonic count and fundamental to a resonance type.
///
/// First match wins:
///
/// 1. `coherence > 0.8` → `Quantum`
/// 2. `harmonics ≥ 3 && f0 > 0` → `Harmonic`
/// 3. `harmonics == 0 && f0 > 0` → `Fundamental`
/// 4. `0 < f0 < 100` → `Subharmonic`
/// 5. otherwise → `BeatFrequency`
pub fn classify(coherence: f64, harmonics: usize, f0: f64) -> ResonanceType {
    if coherence > QUANTUM_COHERENCE {
        ResonanceType::Quantum
    } else if harmonics >= HARMONIC_MIN_COUNT && f0 > 0.0 {
        ResonanceType::Harmonic
    } else if harmonics == 0 && f0 > 0.0 {
        ResonanceType::Fundamental
    } else if f0 > 0.0 && f0 < SUBHARMONIC_CEILING_HZ {
        ResonanceType::Subharmonic
    } else {
        ResonanceType::BeatFrequency
    }
}

/// [`classify`] with the upstream fundamental as a `Result`.
///
/// A failed fundamental search classifies as [`ResonanceType::Fundamental`].
pub fn classify_or_fallback<E: core::fmt::Display>(
    coherence: f64,
    harmonics: usize,
    f0: Result<f64, E>,
) -> ResonanceType {
    match f0 {
        Ok(f0) => classify(coherence, harmonics, f0),
        Err(error) => {
            tracing::warn!(%error, "classification fell back to fundamental");
            ResonanceType::Fundamental
        }
    }
}
