//! Half-power (-3 dB) bandwidth and quality factor.

use std::f64::consts::SQRT_2;

use resona_config::QualityConfig;
use resona_core::{Spectrum, clamp};

/// Quality-factor gain per unit of enhancement factor.
pub const QUALITY_ENHANCEMENT_GAIN: f64 = 0.3;

/// Result of the half-power walk around the fundamental.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPowerBand {
    /// `|freq(upper) − freq(lower)|` in Hz
    pub bandwidth: f64,
    /// First bin below the threshold walking down (or bin 0)
    pub lower_bin: usize,
    /// First bin below the threshold walking up (or the last bin)
    pub upper_bin: usize,
    /// Unadjusted quality factor `f0 / bandwidth`
    pub quality_factor: f64,
}

impl HalfPowerBand {
    const DEGENERATE: HalfPowerBand = HalfPowerBand {
        bandwidth: 0.0,
        lower_bin: 0,
        upper_bin: 0,
        quality_factor: 1.0,
    };
}

/// Walk outward from the bin nearest `f0` to the half-power crossings.
///
/// When the fundamental bin carries no amplitude the band is empty and the
/// quality factor is 1.0. A zero-width band reports `sentinel` as its quality
/// factor.
pub fn half_power_band(spectrum: &Spectrum, f0: f64, sentinel: f64) -> HalfPowerBand {
    let Some(center) = spectrum.nearest_bin(f0) else {
        return HalfPowerBand::DEGENERATE;
    };
    let amps = &spectrum.amplitudes;
    let a0 = amps[center];
    if !(a0 > 0.0) {
        return HalfPowerBand {
            lower_bin: center,
            upper_bin: center,
            ..HalfPowerBand::DEGENERATE
        };
    }

    let threshold = a0 / SQRT_2;

    let mut lower = center;
    while lower > 0 && amps[lower] >= threshold {
        lower -= 1;
    }

    let mut upper = center;
    while upper < amps.len() - 1 && amps[upper] >= threshold {
        upper += 1;
    }

    let bandwidth = (spectrum.frequencies[upper] - spectrum.frequencies[lower]).abs();
    let quality_factor = if bandwidth > 0.0 { f0 / bandwidth } else { sentinel };

    HalfPowerBand {
        bandwidth,
        lower_bin: lower,
        upper_bin: upper,
        quality_factor,
    }
}

/// Apply the enhancement and coherence adjustments, then clamp.
///
/// `Q' = clamp(Q · (1 + 0.3·e) · coherence, min, max)`
pub fn adjust_quality(raw: f64, enhancement: f64, coherence: f64, bounds: &QualityConfig) -> f64 {
    let adjusted = raw * (1.0 + enhancement * QUALITY_ENHANCEMENT_GAIN) * coherence;
    clamp(adjusted, bounds.min, bounds.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resona_core::bin_frequencies;

    /// 64 bins at 10 Hz resolution.
    fn spectrum(amps: Vec<f64>) -> Spectrum {
        let n = amps.len();
        Spectrum::new(bin_frequencies(n, n as f64 * 10.0), amps, vec![0.0; n]).unwrap()
    }

    fn resonance_at(center: usize, shape: &[f64]) -> Vec<f64> {
        let mut amps = vec![0.0; 64];
        let half = shape.len() / 2;
        for (k, &a) in shape.iter().enumerate() {
            amps[center + k - half] = a;
        }
        amps
    }

    #[test]
    fn test_walk_stops_at_first_bin_below_threshold() {
        // 0.75 >= 1/sqrt(2) (~0.707), 0.6 is below
        let amps = resonance_at(20, &[0.2, 0.6, 0.75, 1.0, 0.8, 0.5, 0.1]);
        let band = half_power_band(&spectrum(amps), 200.0, 100.0);
        assert_eq!(band.lower_bin, 18);
        assert_eq!(band.upper_bin, 22);
        assert_eq!(band.bandwidth, 40.0);
        assert_eq!(band.quality_factor, 5.0);
    }

    #[test]
    fn test_isolated_bin_spans_neighbours() {
        let amps = resonance_at(10, &[0.0, 1.0, 0.0]);
        let band = half_power_band(&spectrum(amps), 100.0, 100.0);
        assert_eq!((band.lower_bin, band.upper_bin), (9, 11));
        assert_eq!(band.bandwidth, 20.0);
    }

    #[test]
    fn test_walk_clamped_at_edges() {
        let band = half_power_band(&spectrum(vec![1.0; 64]), 0.0, 100.0);
        assert_eq!(band.lower_bin, 0);
        assert_eq!(band.upper_bin, 63);
        // bin 63 is -10 Hz
        assert_eq!(band.bandwidth, 10.0);
        assert_eq!(band.quality_factor, 0.0);
    }

    #[test]
    fn test_zero_amplitude_fundamental() {
        let band = half_power_band(&spectrum(vec![0.0; 64]), 100.0, 100.0);
        assert_eq!(band.bandwidth, 0.0);
        assert_eq!(band.quality_factor, 1.0);
    }

    #[test]
    fn test_zero_width_band_uses_sentinel() {
        // Two-bin spectrum, both loud: the walk cannot leave the DC bin
        let s = Spectrum::new(vec![0.0, 0.0], vec![1.0, 1.0], vec![0.0, 0.0]).unwrap();
        let band = half_power_band(&s, 0.0, 100.0);
        assert_eq!(band.bandwidth, 0.0);
        assert_eq!(band.quality_factor, 100.0);
    }

    #[test]
    fn test_adjust_quality_clamps() {
        let bounds = QualityConfig::default();
        assert_eq!(adjust_quality(50.0, 0.0, 0.5, &bounds), 25.0);
        assert_eq!(adjust_quality(50.0, 1.0, 1.0, &bounds), 65.0);
        assert_eq!(adjust_quality(5000.0, 1.0, 1.0, &bounds), 1000.0);
        assert_eq!(adjust_quality(0.5, 0.0, 0.1, &bounds), 1.0);
        assert_eq!(adjust_quality(f64::NAN, 0.0, 1.0, &bounds), 1.0);
    }
}
