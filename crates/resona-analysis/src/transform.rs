//! Spectral transforms under a selectable [`TransformDomain`].
//!
//! Every domain produces a [`Spectrum`] on the same two-sided `N`-bin
//! frequency axis, with amplitudes normalized to a peak of 1.0. A domain that
//! fails (collaborator unavailable, non-finite output) falls back to the plain
//! [`TransformDomain::Frequency`] transform of the same input; the transform
//! never returns an error.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use resona_config::{EngineConfig, WindowConfig};
use resona_core::{Spectrum, TransformDomain, bin_frequencies, wrap_phase};
use rustfft::num_complex::Complex;
use std::f64::consts::PI;

use crate::collaborators::Collaborators;
use crate::error::AnalysisError;
use crate::fft::{Fft, hann};

/// Weight applied per unit of external coherence in the externally-weighted domain.
pub const EXTERNAL_WEIGHT_GAIN: f64 = 0.5;

/// Turns conditioned samples into spectra.
///
/// Holds the FFT plan and the frequency axis for one transform size, so
/// repeated analyses reuse both.
#[derive(Debug)]
pub struct SpectralTransformer {
    fft: Fft,
    sample_rate: f64,
    frequencies: Vec<f64>,
    window: WindowConfig,
    perturbation_sigma: f64,
}

impl SpectralTransformer {
    /// Create a transformer for `size` bins at `sample_rate`.
    pub fn new(size: usize, sample_rate: f64) -> Self {
        let defaults = EngineConfig::default();
        Self {
            fft: Fft::new(size),
            sample_rate,
            frequencies: bin_frequencies(size, sample_rate),
            window: defaults.window,
            perturbation_sigma: defaults.perturbation_sigma,
        }
    }

    /// Create a transformer from an engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            window: config.window,
            perturbation_sigma: config.perturbation_sigma,
            ..Self::new(config.transform_size, config.sample_rate)
        }
    }

    /// Transform size `N`.
    pub fn size(&self) -> usize {
        self.fft.size()
    }

    /// Sample rate `R`.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// The shared frequency axis.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Transform `samples` under `domain`.
    ///
    /// The input is truncated or zero-padded to `N` first. Never fails: any
    /// domain error degrades to the Frequency transform.
    pub fn transform<R: Rng + ?Sized>(
        &self,
        samples: &[f64],
        domain: TransformDomain,
        collaborators: &Collaborators,
        rng: &mut R,
    ) -> Spectrum {
        let padded = self.fit(samples);

        let mut spectrum = match self.try_transform(&padded, domain, collaborators, rng) {
            Ok(spectrum) => spectrum,
            Err(error) => {
                tracing::warn!(%domain, %error, "transform failed, falling back to frequency domain");
                let mut fallback = self.frequency(&padded);
                scrub_non_finite(&mut fallback);
                fallback
            }
        };

        spectrum.normalize();
        spectrum
    }

    fn try_transform<R: Rng + ?Sized>(
        &self,
        padded: &[f64],
        domain: TransformDomain,
        collaborators: &Collaborators,
        rng: &mut R,
    ) -> Result<Spectrum, AnalysisError> {
        let spectrum = match domain {
            TransformDomain::Frequency => self.frequency(padded),
            TransformDomain::Time => self.time(padded),
            TransformDomain::Windowed => self.windowed(padded),
            TransformDomain::PerturbedComplex => self.perturbed(padded, rng)?,
            TransformDomain::ExternallyWeighted => {
                let w = collaborators.field_coherence()?;
                let gain = 1.0 + w * EXTERNAL_WEIGHT_GAIN;
                let weighted: Vec<f64> = padded.iter().map(|&x| x * gain).collect();
                self.frequency(&weighted)
            }
        };

        if spectrum.amplitudes.iter().chain(&spectrum.phases).all(|v| v.is_finite()) {
            Ok(spectrum)
        } else {
            Err(AnalysisError::NonFinite("spectral transform"))
        }
    }

    /// Truncate or zero-pad to exactly `N` samples.
    fn fit(&self, samples: &[f64]) -> Vec<f64> {
        let mut padded: Vec<f64> = samples.iter().take(self.size()).copied().collect();
        padded.resize(self.size(), 0.0);
        padded
    }

    fn from_bins(&self, bins: &[Complex<f64>]) -> Spectrum {
        Spectrum {
            frequencies: self.frequencies.clone(),
            amplitudes: bins.iter().map(|c| c.norm()).collect(),
            phases: bins.iter().map(|c| wrap_phase(c.arg())).collect(),
        }
    }

    fn frequency(&self, padded: &[f64]) -> Spectrum {
        self.from_bins(&self.fft.forward(padded))
    }

    fn time(&self, padded: &[f64]) -> Spectrum {
        Spectrum {
            frequencies: self.frequencies.clone(),
            amplitudes: padded.iter().map(|x| x.abs()).collect(),
            phases: padded
                .iter()
                .map(|&x| if x < 0.0 { PI } else { 0.0 })
                .collect(),
        }
    }

    fn perturbed<R: Rng + ?Sized>(
        &self,
        padded: &[f64],
        rng: &mut R,
    ) -> Result<Spectrum, AnalysisError> {
        let noise = Normal::new(0.0, self.perturbation_sigma)
            .map_err(|e| AnalysisError::Distribution(e.to_string()))?;
        let mut buffer: Vec<Complex<f64>> = padded
            .iter()
            .map(|&x| Complex::new(x, noise.sample(rng)))
            .collect();
        self.fft.forward_complex(&mut buffer);
        Ok(self.from_bins(&buffer))
    }

    /// Short-time transform: Hann-windowed segments, each zero-padded to `N`.
    ///
    /// The input is extended by `segment_len / 2` zeros on both sides and the
    /// last segment is zero-filled past the end, so every input sample sits
    /// strictly inside at least one window. The hop is capped at
    /// `segment_len − 1` for the same reason. Amplitude per bin is the maximum
    /// across segments; phase is taken from the first segment.
    fn windowed(&self, padded: &[f64]) -> Spectrum {
        let size = self.size();
        let segment_len = self.window.segment_len.min(size).max(2);
        let hop = self.window.hop().min(segment_len - 1);
        let boundary = segment_len / 2;

        let mut extended = vec![0.0_f64; boundary];
        extended.extend_from_slice(padded);
        extended.resize(extended.len() + boundary, 0.0);
        let num_frames = extended.len().saturating_sub(segment_len).div_ceil(hop) + 1;
        extended.resize((num_frames - 1) * hop + segment_len, 0.0);

        let window = hann(segment_len);
        let mut amplitudes = vec![0.0_f64; size];
        let mut first_frame: Vec<Complex<f64>> = Vec::new();

        for (frame_idx, segment) in extended
            .windows(segment_len)
            .step_by(hop)
            .take(num_frames)
            .enumerate()
        {
            let mut frame = vec![Complex::new(0.0, 0.0); size];
            for (slot, (&sample, &coeff)) in frame.iter_mut().zip(segment.iter().zip(&window)) {
                *slot = Complex::new(sample * coeff, 0.0);
            }
            self.fft.forward_complex(&mut frame);

            for (amp, bin) in amplitudes.iter_mut().zip(&frame) {
                *amp = amp.max(bin.norm());
            }
            if frame_idx == 0 {
                first_frame = frame;
            }
        }

        Spectrum {
            frequencies: self.frequencies.clone(),
            amplitudes,
            phases: first_frame.iter().map(|c| wrap_phase(c.arg())).collect(),
        }
    }
}

/// Replace NaN and infinities left after a fallback with zero.
fn scrub_non_finite(spectrum: &mut Spectrum) {
    for v in spectrum.amplitudes.iter_mut().chain(spectrum.phases.iter_mut()) {
        if !v.is_finite() {
            *v = 0.0;
        }
    }
}
