//! Signal conditioning ahead of the spectral transform.
//!
//! Enhancement is best-effort: when the enhancement factor cannot be read, or
//! the perturbation distribution cannot be built from it (a negative or
//! non-finite deviation), the input passes through unchanged.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use resona_core::max_abs;

use crate::collaborators::Collaborators;
use crate::error::AnalysisError;

/// Gain applied per unit of enhancement factor.
pub const ENHANCEMENT_GAIN: f64 = 0.1;

/// Perturbation standard deviation per unit of peak level and enhancement.
pub const PERTURBATION_SCALE: f64 = 0.01;

/// Condition a raw signal for analysis.
///
/// Fails only for an empty signal. With `apply_enhancement` set, every sample
/// is scaled by `1 + 0.1·e` and zero-mean Gaussian noise with standard
/// deviation `0.01 · max|x| · e` is added, where `e` is the enhancement factor.
pub fn condition<R: Rng + ?Sized>(
    signal: &[f64],
    apply_enhancement: bool,
    collaborators: &Collaborators,
    rng: &mut R,
) -> Result<Vec<f64>, AnalysisError> {
    if signal.is_empty() {
        return Err(AnalysisError::InvalidInput("signal is empty".into()));
    }
    if !apply_enhancement {
        return Ok(signal.to_vec());
    }

    match enhance(signal, collaborators, rng) {
        Ok(enhanced) => Ok(enhanced),
        Err(error) => {
            tracing::warn!(%error, "signal enhancement skipped");
            Ok(signal.to_vec())
        }
    }
}

fn enhance<R: Rng + ?Sized>(
    signal: &[f64],
    collaborators: &Collaborators,
    rng: &mut R,
) -> Result<Vec<f64>, AnalysisError> {
    let factor = collaborators.enhancement_factor()?;
    let gain = 1.0 + factor * ENHANCEMENT_GAIN;
    let sigma = PERTURBATION_SCALE * max_abs(signal) * factor;
    // Normal::new only rejects non-finite deviations
    if sigma.is_nan() || sigma < 0.0 {
        return Err(AnalysisError::Distribution(format!(
            "perturbation deviation {sigma} is not a valid standard deviation"
        )));
    }
    let noise = Normal::new(0.0, sigma).map_err(|e| AnalysisError::Distribution(e.to_string()))?;

    Ok(signal
        .iter()
        .map(|&x| x * gain + noise.sample(rng))
        .collect())
}
