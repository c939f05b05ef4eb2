//! Fundamental frequency and harmonic series location.
//!
//! The fundamental is the dominant bin of the spectrum (restricted to positive
//! frequencies when the global maximum sits on the negative half). Harmonics
//! are the bins nearest each integer multiple `n·f0`, accepted only within a
//! relative tolerance of the target and above the resonance threshold.

use resona_config::HarmonicConfig;
use resona_core::Spectrum;

use crate::error::AnalysisError;

/// The dominant partial of a spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fundamental {
    /// Frequency in Hz, never negative
    pub frequency: f64,
    /// Bin index the frequency was read from
    pub bin: usize,
    /// Normalized amplitude at that bin
    pub amplitude: f64,
}

/// One accepted partial of a harmonic series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonic {
    /// Integer multiple of the fundamental, starting at 2
    pub multiplier: usize,
    /// Target frequency `multiplier · f0`
    pub target: f64,
    /// Frequency of the matched bin
    pub frequency: f64,
    /// Amplitude of the matched bin
    pub amplitude: f64,
}

/// Index of the first maximum amplitude among the bins accepted by `include`.
fn argmax(spectrum: &Spectrum, include: impl Fn(f64) -> bool) -> Option<usize> {
    spectrum
        .bins()
        .enumerate()
        .filter(|(_, (f, a, _))| include(*f) && !a.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, (_, a, _))| match best {
            Some((_, ba)) if ba >= a => best,
            _ => Some((i, a)),
        })
        .map(|(i, _)| i)
}

/// Locate the fundamental frequency.
///
/// Fails with [`AnalysisError::Degenerate`] when the spectrum is empty or
/// carries no energy.
pub fn locate_fundamental(spectrum: &Spectrum) -> Result<Fundamental, AnalysisError> {
    if spectrum.is_empty() {
        return Err(AnalysisError::Degenerate("empty spectrum has no fundamental"));
    }
    if spectrum.is_silent() {
        return Err(AnalysisError::Degenerate("silent spectrum has no fundamental"));
    }

    let mut bin = argmax(spectrum, |_| true)
        .ok_or(AnalysisError::NonFinite("fundamental amplitude"))?;

    if spectrum.frequencies[bin] < 0.0
        && let Some(positive) = argmax(spectrum, |f| f > 0.0)
    {
        bin = positive;
    }

    Ok(Fundamental {
        frequency: spectrum.frequencies[bin].max(0.0),
        bin,
        amplitude: spectrum.amplitudes[bin],
    })
}

/// Match harmonic partials of `f0`.
///
/// Searches multipliers `2..=max_multiplier` in ascending order. Returns an
/// empty series when `f0` is not positive.
pub fn match_harmonics(spectrum: &Spectrum, f0: f64, config: &HarmonicConfig) -> Vec<Harmonic> {
    if !(f0 > 0.0 && f0.is_finite()) {
        return Vec::new();
    }

    (2..=config.max_multiplier)
        .filter_map(|n| {
            let target = n as f64 * f0;
            let bin = spectrum.nearest_bin(target)?;
            let frequency = spectrum.frequencies[bin];
            let amplitude = spectrum.amplitudes[bin];
            let deviation = (frequency - target).abs() / target;

            (deviation <= config.tolerance && amplitude > config.resonance_threshold).then_some(
                Harmonic {
                    multiplier: n,
                    target,
                    frequency,
                    amplitude,
                },
            )
        })
        .collect()
}

/// Frequencies of the accepted harmonics, in ascending multiplier order.
pub fn harmonic_frequencies(harmonics: &[Harmonic]) -> Vec<f64> {
    harmonics.iter().map(|h| h.frequency).collect()
}
