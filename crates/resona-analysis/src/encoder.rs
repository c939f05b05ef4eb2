//! Complex state embedding of an analysed spectrum.

use resona_core::Spectrum;
use rustfft::num_complex::Complex;

use crate::error::AnalysisError;

/// Embedding returned when encoding fails.
pub fn fallback_embedding() -> Vec<Complex<f64>> {
    vec![Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)]
}

/// L2 norm of a complex vector.
pub fn l2_norm(values: &[Complex<f64>]) -> f64 {
    values.iter().map(Complex::norm_sqr).sum::<f64>().sqrt()
}

fn normalize(values: &mut [Complex<f64>]) {
    let norm = l2_norm(values);
    if norm > 0.0 {
        for v in values.iter_mut() {
            *v /= norm;
        }
    }
}

/// Build the embedding, reporting failures.
///
/// Bins with negative frequency stay zero. The vector is L2-normalized,
/// scaled by `√coherence`, and normalized again, so its norm is 1 unless
/// the spectrum is silent or `coherence` is 0.
pub fn try_encode(
    spectrum: &Spectrum,
    coherence: f64,
    max_len: usize,
) -> Result<Vec<Complex<f64>>, AnalysisError> {
    if spectrum.is_empty() || max_len == 0 {
        return Err(AnalysisError::Degenerate("nothing to embed"));
    }
    if !(coherence.is_finite() && coherence >= 0.0) {
        return Err(AnalysisError::NonFinite("embedding coherence"));
    }

    let len = max_len.min(spectrum.len());
    let mut embedding: Vec<Complex<f64>> = spectrum
        .bins()
        .take(len)
        .map(|(freq, amp, phase)| {
            if freq >= 0.0 {
                Complex::from_polar(amp, phase)
            } else {
                Complex::new(0.0, 0.0)
            }
        })
        .collect();

    if embedding.iter().any(|c| !c.re.is_finite() || !c.im.is_finite()) {
        return Err(AnalysisError::NonFinite("embedding"));
    }

    normalize(&mut embedding);
    let scale = coherence.sqrt();
    for v in &mut embedding {
        *v *= scale;
    }
    normalize(&mut embedding);

    Ok(embedding)
}

/// Build the embedding, substituting [`fallback_embedding`] on failure.
pub fn encode_state(spectrum: &Spectrum, coherence: f64, max_len: usize) -> Vec<Complex<f64>> {
    try_encode(spectrum, coherence, max_len).unwrap_or_else(|error| {
        tracing::warn!(%error, "state encoding fell back to unit vector");
        fallback_embedding()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use resona_core::bin_frequencies;

    fn spectrum(amps: Vec<f64>, phases: Vec<f64>) -> Spectrum {
        let n = amps.len();
        Spectrum::new(bin_frequencies(n, n as f64), amps, phases).unwrap()
    }

    #[test]
    fn test_unit_norm_and_length() {
        let s = spectrum(vec![0.5; 512], vec![0.25; 512]);
        let e = encode_state(&s, 0.7, 256);
        assert_eq!(e.len(), 256);
        assert!((l2_norm(&e) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_spectrum_sets_length() {
        let s = spectrum(vec![1.0; 8], vec![0.0; 8]);
        assert_eq!(encode_state(&s, 0.5, 256).len(), 8);
    }

    #[test]
    fn test_negative_bins_are_zero() {
        let s = spectrum(vec![1.0; 8], vec![0.0; 8]);
        let e = encode_state(&s, 1.0, 8);
        // bins 4..8 are negative frequencies for n = 8
        assert!(e[4..].iter().all(|c| c.norm() == 0.0));
        assert!((e[0].re - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_phase_carried_into_argument() {
        let s = spectrum(vec![1.0, 0.0, 0.0, 0.0], vec![0.0, 0.0, 0.0, 0.0]);
        let mut phased = s.clone();
        phased.phases[0] = 1.0;
        let e = encode_state(&phased, 1.0, 4);
        assert!((e[0].arg() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_coherence_gives_zero_vector() {
        let s = spectrum(vec![1.0; 16], vec![0.0; 16]);
        let e = encode_state(&s, 0.0, 16);
        assert_eq!(l2_norm(&e), 0.0);
    }

    #[test]
    fn test_failures_use_fallback() {
        let empty = Spectrum::new(vec![], vec![], vec![]).unwrap();
        assert_eq!(encode_state(&empty, 0.5, 256), fallback_embedding());

        let mut bad = spectrum(vec![1.0; 4], vec![0.0; 4]);
        bad.amplitudes[1] = f64::NAN;
        assert_eq!(encode_state(&bad, 0.5, 4), fallback_embedding());
        assert_eq!(encode_state(&spectrum(vec![1.0; 4], vec![0.0; 4]), f64::NAN, 4), fallback_embedding());
    }
}
