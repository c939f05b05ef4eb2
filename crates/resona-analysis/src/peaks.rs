//! Peak detection on normalized spectra.

use resona_config::PeakConfig;
use resona_core::{ResonancePeak, Spectrum};

/// Find resonance peaks in a spectrum.
///
/// A peak is an interior bin with non-negative frequency whose amplitude is
/// not exceeded by either neighbour and reaches `min_height`. Candidates are
/// taken in index order; one within `min_separation` bins of an already
/// accepted peak is skipped. The result is sorted by amplitude, descending.
pub fn find_peaks(spectrum: &Spectrum, min_height: f64, min_separation: usize) -> Vec<ResonancePeak> {
    let amps = &spectrum.amplitudes;
    if amps.len() < 3 {
        return Vec::new();
    }

    let mut accepted: Vec<usize> = Vec::new();

    for i in 1..amps.len() - 1 {
        let mag = amps[i];
        if spectrum.frequencies[i] >= 0.0
            && mag >= min_height
            && mag >= amps[i - 1]
            && mag >= amps[i + 1]
        {
            // Check minimum distance from existing peaks
            let too_close = accepted.iter().any(|&j| i - j < min_separation);
            if !too_close {
                accepted.push(i);
            }
        }
    }

    let mut peaks: Vec<ResonancePeak> = accepted
        .into_iter()
        .map(|i| ResonancePeak {
            frequency: spectrum.frequencies[i],
            amplitude: amps[i],
        })
        .collect();

    // Sort by amplitude (descending), stable for equal amplitudes
    peaks.sort_by(|a, b| b.amplitude.total_cmp(&a.amplitude));
    peaks
}

/// [`find_peaks`] with thresholds from a [`PeakConfig`].
pub fn find_peaks_with(spectrum: &Spectrum, config: &PeakConfig) -> Vec<ResonancePeak> {
    find_peaks(spectrum, config.min_height, config.min_separation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resona_core::bin_frequencies;

    fn spectrum(amplitudes: Vec<f64>) -> Spectrum {
        let n = amplitudes.len();
        Spectrum::new(bin_frequencies(n, n as f64), amplitudes, vec![0.0; n]).unwrap()
    }

    #[test]
    fn test_peaks_sorted_descending() {
        let mut amps = vec![0.0; 64];
        amps[5] = 0.6;
        amps[20] = 1.0;
        amps[12] = 0.8;
        let peaks = find_peaks(&spectrum(amps), 0.5, 3);
        let found: Vec<f64> = peaks.iter().map(|p| p.amplitude).collect();
        assert_eq!(found, vec![1.0, 0.8, 0.6]);
        assert_eq!(peaks[0].frequency, 20.0);
    }

    #[test]
    fn test_below_threshold_ignored() {
        let mut amps = vec![0.0; 32];
        amps[4] = 0.49;
        amps[10] = 0.5;
        let peaks = find_peaks(&spectrum(amps), 0.5, 1);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].frequency, 10.0);
    }

    #[test]
    fn test_separation_keeps_first_in_index_order() {
        let mut amps = vec![0.0; 64];
        amps[10] = 0.6;
        amps[14] = 1.0;
        amps[30] = 0.7;
        let peaks = find_peaks(&spectrum(amps), 0.5, 10);
        // bin 14 is within 10 of the earlier bin 10, so it is skipped
        let freqs: Vec<f64> = peaks.iter().map(|p| p.frequency).collect();
        assert_eq!(freqs, vec![30.0, 10.0]);
    }

    #[test]
    fn test_negative_frequencies_excluded() {
        let mut amps = vec![0.0; 32];
        amps[24] = 1.0; // frequency -8
        let peaks = find_peaks(&spectrum(amps), 0.5, 1);
        assert!(peaks.is_empty());
    }

    #[test]
    fn test_plateau_counts_once_with_separation() {
        let mut amps = vec![0.0; 32];
        amps[6] = 0.9;
        amps[7] = 0.9;
        let peaks = find_peaks(&spectrum(amps), 0.5, 2);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].frequency, 6.0);
    }

    #[test]
    fn test_edges_and_tiny_spectra() {
        let mut amps = vec![0.0; 16];
        amps[0] = 1.0;
        assert!(find_peaks(&spectrum(amps), 0.5, 1).is_empty());
        assert!(find_peaks(&spectrum(vec![1.0, 0.0]), 0.5, 1).is_empty());
    }

    #[test]
    fn test_silent_spectrum_has_no_peaks() {
        assert!(find_peaks_with(&spectrum(vec![0.0; 128]), &PeakConfig::default()).is_empty());
    }
}
