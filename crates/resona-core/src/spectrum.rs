//! Aligned frequency / amplitude / phase spectra and the peaks drawn from them.

use serde::{Deserialize, Serialize};

/// Frequency-domain representation produced by a spectral transform.
///
/// The three sequences are always the same length (the transform size) and
/// index-aligned: bin `k` is `(frequencies[k], amplitudes[k], phases[k])`.
/// After normalization the largest amplitude is exactly 1.0, or every
/// amplitude is 0.0 for a silent input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Signed bin frequencies in Hz (two-sided FFT layout)
    pub frequencies: Vec<f64>,
    /// Non-negative amplitudes, normalized to a maximum of 1.0
    pub amplitudes: Vec<f64>,
    /// Phases in radians, within `(-π, π]`
    pub phases: Vec<f64>,
}

impl Spectrum {
    /// Build a spectrum from aligned sequences.
    ///
    /// Returns `None` when the lengths disagree.
    pub fn new(frequencies: Vec<f64>, amplitudes: Vec<f64>, phases: Vec<f64>) -> Option<Self> {
        if frequencies.len() != amplitudes.len() || amplitudes.len() != phases.len() {
            return None;
        }
        Some(Self {
            frequencies,
            amplitudes,
            phases,
        })
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// True when the spectrum has no bins.
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Largest amplitude, 0.0 for an empty spectrum.
    pub fn max_amplitude(&self) -> f64 {
        self.amplitudes.iter().fold(0.0_f64, |acc, &a| acc.max(a))
    }

    /// True when no bin carries energy.
    pub fn is_silent(&self) -> bool {
        crate::math::is_silent(&self.amplitudes)
    }

    /// Divide every amplitude by the maximum so the peak is exactly 1.0.
    ///
    /// No-op when the maximum is zero.
    pub fn normalize(&mut self) {
        let max = self.max_amplitude();
        if max > 0.0 {
            for a in &mut self.amplitudes {
                *a /= max;
            }
        }
    }

    /// Index of the bin whose frequency is closest to `freq_hz`.
    ///
    /// Ties resolve to the lowest index. Returns `None` for an empty spectrum.
    pub fn nearest_bin(&self, freq_hz: f64) -> Option<usize> {
        self.frequencies
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &f)| {
                let d = (f - freq_hz).abs();
                match best {
                    Some((_, bd)) if bd <= d => best,
                    _ => Some((i, d)),
                }
            })
            .map(|(i, _)| i)
    }

    /// Iterate over `(frequency, amplitude, phase)` triples.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.frequencies
            .iter()
            .zip(&self.amplitudes)
            .zip(&self.phases)
            .map(|((&f, &a), &p)| (f, a, p))
    }
}

/// A local maximum of a spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResonancePeak {
    /// Peak frequency in Hz
    pub frequency: f64,
    /// Normalized amplitude at the peak
    pub amplitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Spectrum {
        Spectrum::new(
            vec![0.0, 10.0, 20.0, -20.0, -10.0],
            vec![0.0, 2.0, 4.0, 4.0, 2.0],
            vec![0.0; 5],
        )
        .unwrap()
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        assert!(Spectrum::new(vec![0.0], vec![], vec![]).is_none());
    }

    #[test]
    fn test_normalize_peak_is_one() {
        let mut s = sample();
        s.normalize();
        assert_eq!(s.max_amplitude(), 1.0);
        assert_eq!(s.amplitudes[1], 0.5);
    }

    #[test]
    fn test_normalize_silent_is_noop() {
        let mut s = Spectrum::new(vec![0.0, 1.0], vec![0.0, 0.0], vec![0.0, 0.0]).unwrap();
        s.normalize();
        assert!(s.is_silent());
    }

    #[test]
    fn test_nearest_bin() {
        let s = sample();
        assert_eq!(s.nearest_bin(11.0), Some(1));
        assert_eq!(s.nearest_bin(-19.0), Some(3));
        assert_eq!(s.nearest_bin(1000.0), Some(2));
        let empty = Spectrum::new(vec![], vec![], vec![]).unwrap();
        assert_eq!(empty.nearest_bin(1.0), None);
    }
}
