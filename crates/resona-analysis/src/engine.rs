//! The resonance analysis facade.
//!
//! [`ResonanceEngine`] runs the full pipeline for one signal, records the
//! result in its history and serves the metric catalogue for any result it
//! produced. It is single-threaded by contract: mutation goes through
//! `&mut self`, and callers that share an engine across threads wrap it in a
//! lock.

use std::collections::HashMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use resona_config::{ConfigError, EngineConfig};
use resona_core::{MetricKind, MonotonicClock, TransformDomain, clamp};

use crate::bandwidth::{adjust_quality, half_power_band};
use crate::classify::classify_or_fallback;
use crate::coherence::coherence;
use crate::collaborators::{Collaborators, EnhancementProvider, FieldCoherenceProvider};
use crate::conditioner::condition;
use crate::encoder::encode_state;
use crate::error::AnalysisError;
use crate::harmonics::{harmonic_frequencies, locate_fundamental, match_harmonics};
use crate::metrics::{Metric, MetricsCatalogue};
use crate::peaks::find_peaks_with;
use crate::result::AnalysisResult;
use crate::summary::Summary;
use crate::transform::SpectralTransformer;

/// Spectral resonance analysis engine.
///
/// # Example
///
/// ```rust
/// use resona_analysis::ResonanceEngine;
/// use resona_config::EngineConfig;
/// use resona_core::TransformDomain;
///
/// let mut engine = ResonanceEngine::new(EngineConfig::default().with_seed(7)).unwrap();
/// let tone: Vec<f64> = (0..4096)
///     .map(|i| (2.0 * std::f64::consts::PI * 440.0 * i as f64 / 44100.0).sin())
///     .collect();
///
/// let result = engine.analyze(&tone, TransformDomain::Frequency, false).unwrap();
/// assert!((result.fundamental_hz - 440.0).abs() < 44100.0 / 4096.0);
///
/// let metrics = engine.compute_metrics(&result, None);
/// assert_eq!(metrics.len(), 8);
/// ```
pub struct ResonanceEngine {
    config: EngineConfig,
    transformer: SpectralTransformer,
    collaborators: Collaborators,
    rng: StdRng,
    clock: MonotonicClock,
    history: Vec<AnalysisResult>,
    metrics: MetricsCatalogue,
}

impl std::fmt::Debug for ResonanceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResonanceEngine")
            .field("config", &self.config)
            .field("collaborators", &self.collaborators)
            .field("history", &self.history.len())
            .field("cached_metrics", &self.metrics.len())
            .finish_non_exhaustive()
    }
}

impl ResonanceEngine {
    /// Create an engine with the default collaborators.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_collaborators(config, Collaborators::default())
    }

    /// Create an engine reading the given collaborators.
    ///
    /// Fails when `config` does not validate.
    pub fn with_collaborators(
        config: EngineConfig,
        collaborators: Collaborators,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            transformer: SpectralTransformer::from_config(&config),
            collaborators: collaborators.with_field_scaling(config.scale_enhancement_by_field),
            rng,
            clock: MonotonicClock::new(),
            history: Vec::new(),
            metrics: MetricsCatalogue::new(),
            config,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The collaborator handles.
    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Replace the enhancement provider for subsequent analyses.
    pub fn set_enhancement_provider(&mut self, provider: Arc<dyn EnhancementProvider>) {
        self.collaborators.set_enhancement(provider);
    }

    /// Replace the field provider for subsequent analyses.
    pub fn set_field_provider(&mut self, provider: Arc<dyn FieldCoherenceProvider>) {
        self.collaborators.set_field(provider);
    }

    /// Analyse one signal.
    ///
    /// The only error is [`AnalysisError::AnalysisFailed`] wrapping
    /// [`AnalysisError::InvalidInput`] for an empty signal. Every other
    /// failure inside the pipeline degrades to a documented fallback.
    pub fn analyze(
        &mut self,
        signal: &[f64],
        domain: TransformDomain,
        apply_enhancement: bool,
    ) -> Result<AnalysisResult, AnalysisError> {
        if signal.is_empty() {
            return Err(AnalysisError::failed(AnalysisError::InvalidInput(
                "signal is empty".into(),
            )));
        }

        self.collaborators
            .advance(signal.len() as f64 / self.config.sample_rate);

        let conditioned = condition(signal, apply_enhancement, &self.collaborators, &mut self.rng)
            .map_err(AnalysisError::failed)?;

        let spectrum =
            self.transformer
                .transform(&conditioned, domain, &self.collaborators, &mut self.rng);

        let peaks = find_peaks_with(&spectrum, &self.config.peaks);

        let fundamental = locate_fundamental(&spectrum);
        let f0 = fundamental.as_ref().map_or(0.0, |f| f.frequency);
        let harmonics = harmonic_frequencies(&match_harmonics(&spectrum, f0, &self.config.harmonics));

        let coherence = coherence(&spectrum, &self.collaborators);

        let band = half_power_band(&spectrum, f0, self.config.quality.sentinel);
        let quality_factor = adjust_quality(
            band.quality_factor,
            self.collaborators.enhancement_or_default(),
            coherence,
            &self.config.quality,
        );

        let strongest = peaks.first().map_or(0.0, |p| p.amplitude);
        let resonance_strength = clamp(strongest * coherence, 0.0, 1.0);

        let resonance_type = classify_or_fallback(
            coherence,
            harmonics.len(),
            fundamental.as_ref().map(|f| f.frequency),
        );

        let embedding = encode_state(&spectrum, coherence, self.config.embedding_len);

        let result = AnalysisResult {
            spectrum,
            peaks,
            fundamental_hz: f0,
            harmonics,
            bandwidth_hz: band.bandwidth,
            coherence,
            resonance_strength,
            quality_factor,
            resonance_type,
            operating_tier: self.config.operating_tier,
            domain,
            timestamp: self.clock.tick(),
            embedding: Some(embedding),
        };

        tracing::debug!(
            timestamp = %result.timestamp,
            %domain,
            fundamental_hz = result.fundamental_hz,
            coherence = result.coherence,
            quality_factor = result.quality_factor,
            resonance_type = %result.resonance_type,
            "analysis complete"
        );

        self.history.push(result.clone());
        if let Some(limit) = self.config.history_limit {
            self.trim_history(limit);
        }

        Ok(result)
    }

    /// Compute the requested metrics for `result`, all eight when `None`.
    ///
    /// Results are memoized by `(kind, result.timestamp)`, so repeated calls
    /// return identical values and fingerprints.
    pub fn compute_metrics(
        &mut self,
        result: &AnalysisResult,
        kinds: Option<&[MetricKind]>,
    ) -> HashMap<MetricKind, Metric> {
        self.metrics
            .compute(result, kinds, &self.collaborators, &self.config)
    }

    /// Aggregate the history around `result` and optional metrics.
    pub fn summary(
        &self,
        result: &AnalysisResult,
        metrics: Option<&HashMap<MetricKind, Metric>>,
    ) -> Summary {
        Summary::build(&self.history, result, metrics, &self.collaborators)
    }

    /// All results produced so far, oldest first.
    pub fn history(&self) -> &[AnalysisResult] {
        &self.history
    }

    /// The most recent result.
    pub fn latest(&self) -> Option<&AnalysisResult> {
        self.history.last()
    }

    /// Drop the oldest results so at most `keep` remain.
    ///
    /// Cached metrics are unaffected.
    pub fn trim_history(&mut self, keep: usize) {
        if self.history.len() > keep {
            let excess = self.history.len() - keep;
            self.history.drain(..excess);
        }
    }

    /// Number of memoized metrics.
    pub fn cache_len(&self) -> usize {
        self.metrics.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{FixedEnhancement, OscillatingEnhancement, Unavailable};
    use resona_core::ResonanceType;
    use std::f64::consts::PI;

    fn engine() -> ResonanceEngine {
        ResonanceEngine::new(EngineConfig::default().with_seed(42)).unwrap()
    }

    fn tone(freq: f64, len: usize, sample_rate: f64) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            transform_size: 1,
            ..EngineConfig::default()
        };
        assert!(ResonanceEngine::new(config).is_err());
    }

    #[test]
    fn test_empty_signal_is_the_only_hard_failure() {
        let mut engine = engine();
        let err = engine
            .analyze(&[], TransformDomain::Frequency, false)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::AnalysisFailed { .. }));
        assert!(matches!(err.root_cause(), AnalysisError::InvalidInput(_)));
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_silent_signal_falls_back_to_fundamental() {
        let mut engine = engine();
        let result = engine
            .analyze(&[0.0; 4096], TransformDomain::Frequency, false)
            .unwrap();
        assert_eq!(result.resonance_strength, 0.0);
        assert!(result.peaks.is_empty());
        assert_eq!(result.resonance_type, ResonanceType::Fundamental);
        assert_eq!(result.fundamental_hz, 0.0);
        assert_eq!(result.quality_factor, 1.0);
    }

    #[test]
    fn test_history_grows_with_unique_timestamps() {
        let mut engine = engine();
        let signal = tone(440.0, 1024, 44100.0);
        for _ in 0..5 {
            engine
                .analyze(&signal, TransformDomain::Frequency, false)
                .unwrap();
        }
        let stamps: Vec<_> = engine.history().iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps.len(), 5);
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(engine.latest().map(|r| r.timestamp), stamps.last().copied());
    }

    #[test]
    fn test_history_limit_and_trim() {
        let mut engine =
            ResonanceEngine::new(EngineConfig::default().with_seed(1).with_history_limit(3)).unwrap();
        let signal = tone(220.0, 512, 44100.0);
        for _ in 0..5 {
            engine
                .analyze(&signal, TransformDomain::Time, false)
                .unwrap();
        }
        assert_eq!(engine.history().len(), 3);

        engine.trim_history(1);
        assert_eq!(engine.history().len(), 1);
        engine.trim_history(10);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_metrics_survive_history_trim() {
        let mut engine = engine();
        let result = engine
            .analyze(&tone(440.0, 4096, 44100.0), TransformDomain::Frequency, false)
            .unwrap();
        let first = engine.compute_metrics(&result, None);
        engine.trim_history(0);
        assert_eq!(engine.cache_len(), 8);
        assert_eq!(engine.compute_metrics(&result, None), first);
    }

    #[test]
    fn test_provider_advanced_once_per_analysis() {
        let osc = Arc::new(OscillatingEnhancement::new(0.2, 0.1, 1.0));
        let collaborators = Collaborators::default();
        let mut engine = ResonanceEngine::with_collaborators(
            EngineConfig::default().with_seed(3),
            collaborators,
        )
        .unwrap();
        engine.set_enhancement_provider(osc.clone());

        let signal = vec![0.1; 4410];
        engine
            .analyze(&signal, TransformDomain::Frequency, true)
            .unwrap();
        engine
            .analyze(&signal, TransformDomain::Frequency, true)
            .unwrap();
        assert!((osc.elapsed().unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_offline_collaborators_still_analyze() {
        let collaborators = Collaborators::new(Arc::new(Unavailable), Arc::new(Unavailable));
        let mut engine = ResonanceEngine::with_collaborators(
            EngineConfig::default().with_seed(5),
            collaborators,
        )
        .unwrap();
        for domain in TransformDomain::ALL {
            let result = engine
                .analyze(&tone(1000.0, 2048, 44100.0), domain, true)
                .unwrap();
            assert!((0.0..=1.0).contains(&result.coherence));
            assert!((1.0..=1000.0).contains(&result.quality_factor));
        }
    }

    #[test]
    fn test_seeded_engines_agree() {
        let signal = tone(300.0, 2048, 44100.0);
        let run = || {
            let mut engine = ResonanceEngine::new(EngineConfig::default().with_seed(9)).unwrap();
            engine.set_enhancement_provider(Arc::new(FixedEnhancement(0.5)));
            engine
                .analyze(&signal, TransformDomain::PerturbedComplex, true)
                .unwrap()
        };
        let (a, b) = (run(), run());
        assert_eq!(a.spectrum, b.spectrum);
        assert_eq!(a.coherence, b.coherence);
    }

    #[test]
    fn test_summary_reflects_history() {
        let mut engine = engine();
        let result = engine
            .analyze(&tone(440.0, 4096, 44100.0), TransformDomain::Frequency, false)
            .unwrap();
        engine
            .analyze(&[0.0; 256], TransformDomain::Frequency, false)
            .unwrap();
        let metrics = engine.compute_metrics(&result, None);
        let summary = engine.summary(&result, Some(&metrics));

        assert_eq!(summary.analyses, 2);
        assert_eq!(summary.type_counts.values().sum::<usize>(), 2);
        assert_eq!(summary.type_counts.len(), ResonanceType::ALL.len());
        assert_eq!(summary.metrics.len(), 8);
        assert_eq!(summary.speed_multiplier, 2.0);
        assert!((0.0..=1.0).contains(&summary.quantum_score));

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"quantum_score\""));
        assert!(json.contains("\"operating_tier\": \"standard\""));
    }
}
