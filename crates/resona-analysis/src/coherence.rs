//! Coherence blending.
//!
//! Three terms are combined into a single `[0, 1]` score:
//!
//! | Term | Weight | Source |
//! |------|--------|--------|
//! | amplitude regularity | 0.3 | `1 / (1 + σ(a) / max(μ(a), 1e-10))` |
//! | phase regularity | 0.3 | `1 − σ(φ) / 2π` |
//! | field coherence | 0.4 | external field reading (0.5 when unreadable) |

use core::f64::consts::TAU;

use resona_core::{Spectrum, clamp, mean, std_dev};

use crate::collaborators::Collaborators;

/// Weight of the amplitude regularity term.
pub const AMPLITUDE_WEIGHT: f64 = 0.3;
/// Weight of the phase regularity term.
pub const PHASE_WEIGHT: f64 = 0.3;
/// Weight of the external field term.
pub const FIELD_WEIGHT: f64 = 0.4;

const MEAN_FLOOR: f64 = 1e-10;

/// Amplitude regularity: 1 for a flat spectrum, approaching 0 as it spikes.
pub fn amplitude_term(amplitudes: &[f64]) -> f64 {
    1.0 / (1.0 + std_dev(amplitudes) / mean(amplitudes).max(MEAN_FLOOR))
}

/// Phase regularity: 1 when all phases agree.
pub fn phase_term(phases: &[f64]) -> f64 {
    1.0 - std_dev(phases) / TAU
}

/// Blend the three terms for a given field reading.
pub fn blend(spectrum: &Spectrum, field_coherence: f64) -> f64 {
    let blended = AMPLITUDE_WEIGHT * amplitude_term(&spectrum.amplitudes)
        + PHASE_WEIGHT * phase_term(&spectrum.phases)
        + FIELD_WEIGHT * field_coherence;
    clamp(blended, 0.0, 1.0)
}

/// Coherence score of a spectrum, reading the field term best-effort.
pub fn coherence(spectrum: &Spectrum, collaborators: &Collaborators) -> f64 {
    blend(spectrum, collaborators.field_coherence_or_default())
}
