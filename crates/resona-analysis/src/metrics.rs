//! Metric catalogue with integrity fingerprints and memoization.
//!
//! Each [`Metric`] carries a BLAKE3 fingerprint over the canonical JSON of its
//! own fields plus the parent result's type, tier and timestamp. Computed
//! metrics are cached by `(kind, timestamp)` for the lifetime of the
//! catalogue; entries are never invalidated.

use std::collections::HashMap;

use resona_config::EngineConfig;
use resona_core::{MetricKind, OperatingTier, ResonanceType, Timestamp, clamp, mean};
use serde::{Deserialize, Serialize};

use crate::bandwidth::half_power_band;
use crate::collaborators::Collaborators;
use crate::error::AnalysisError;
use crate::harmonics::{locate_fundamental, match_harmonics};
use crate::result::AnalysisResult;

/// Damping and harmonic-balance gain per unit of enhancement factor.
pub const METRIC_ENHANCEMENT_GAIN: f64 = 0.1;

/// Harmonic-to-fundamental amplitude ratio scored as perfectly balanced.
pub const BALANCED_RATIO: f64 = 0.5;

/// A named scalar derived from an [`AnalysisResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Which catalogue entry this is
    pub kind: MetricKind,
    /// Metric value
    pub value: f64,
    /// Timestamp of the parent result
    pub timestamp: Timestamp,
    /// Lowercase hex BLAKE3 digest
    pub fingerprint: String,
}

#[derive(Serialize)]
struct FingerprintPayload<'a> {
    kind: MetricKind,
    value: f64,
    timestamp: &'a Timestamp,
    resonance_type: ResonanceType,
    operating_tier: OperatingTier,
}

fn fingerprint(kind: MetricKind, value: f64, result: &AnalysisResult) -> Result<String, AnalysisError> {
    let payload = FingerprintPayload {
        kind,
        value,
        timestamp: &result.timestamp,
        resonance_type: result.resonance_type,
        operating_tier: result.operating_tier,
    };
    let bytes = serde_json::to_vec(&payload)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

impl Metric {
    /// Build a metric for `result` and attach its fingerprint.
    pub fn sealed(kind: MetricKind, value: f64, result: &AnalysisResult) -> Result<Self, AnalysisError> {
        Ok(Self {
            kind,
            value,
            timestamp: result.timestamp,
            fingerprint: fingerprint(kind, value, result)?,
        })
    }

    /// Zero-valued metric used when a derivation fails.
    pub fn zeroed(kind: MetricKind, result: &AnalysisResult) -> Self {
        Self {
            kind,
            value: 0.0,
            timestamp: result.timestamp,
            fingerprint: fingerprint(kind, 0.0, result).unwrap_or_default(),
        }
    }

    /// Recompute the fingerprint against `result` and compare.
    pub fn verify(&self, result: &AnalysisResult) -> bool {
        self.timestamp == result.timestamp
            && fingerprint(self.kind, self.value, result).is_ok_and(|fp| fp == self.fingerprint)
    }
}

/// Whether deriving `kind` reads the enhancement factor.
fn needs_enhancement(kind: MetricKind) -> bool {
    matches!(kind, MetricKind::Damping | MetricKind::HarmonicBalance)
}

/// Derive the value of one metric.
///
/// `enhancement` is only consulted for damping and harmonic balance.
pub fn derive(
    kind: MetricKind,
    result: &AnalysisResult,
    enhancement: f64,
    config: &EngineConfig,
) -> Result<f64, AnalysisError> {
    let spectrum = &result.spectrum;
    let value = match kind {
        MetricKind::Strength => result.resonance_strength,
        MetricKind::QualityFactor => result.quality_factor,
        MetricKind::Coherence => result.coherence,
        MetricKind::Damping => {
            (1.0 / result.quality_factor * (1.0 + enhancement * METRIC_ENHANCEMENT_GAIN)).min(1.0)
        }
        MetricKind::Bandwidth => {
            let f0 = locate_fundamental(spectrum)?.frequency;
            half_power_band(spectrum, f0, config.quality.sentinel).bandwidth
        }
        MetricKind::Amplitude => locate_fundamental(spectrum)?.amplitude,
        MetricKind::Phase => spectrum.phases[locate_fundamental(spectrum)?.bin],
        MetricKind::HarmonicBalance => {
            let fundamental = locate_fundamental(spectrum)?;
            let series = match_harmonics(spectrum, fundamental.frequency, &config.harmonics);
            if series.is_empty() {
                0.0
            } else {
                let amplitudes: Vec<f64> = series.iter().map(|h| h.amplitude).collect();
                let ratio = mean(&amplitudes) / fundamental.amplitude;
                let balance = clamp(1.0 - (ratio - BALANCED_RATIO).abs() / BALANCED_RATIO, 0.0, 1.0);
                balance * (1.0 + enhancement * METRIC_ENHANCEMENT_GAIN)
            }
        }
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::NonFinite("metric value"))
    }
}

/// Append-only cache of metrics keyed by `(kind, result timestamp)`.
#[derive(Debug, Default)]
pub struct MetricsCatalogue {
    cache: HashMap<(MetricKind, Timestamp), Metric>,
}

impl MetricsCatalogue {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached metrics.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// True when nothing has been computed yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Cached metric, if any.
    pub fn get(&self, kind: MetricKind, timestamp: Timestamp) -> Option<&Metric> {
        self.cache.get(&(kind, timestamp))
    }

    /// Compute (or fetch from cache) the requested metrics for `result`.
    ///
    /// `None` requests the whole catalogue. A metric that cannot be derived
    /// is cached as a zero-valued metric of its kind.
    pub fn compute(
        &mut self,
        result: &AnalysisResult,
        kinds: Option<&[MetricKind]>,
        collaborators: &Collaborators,
        config: &EngineConfig,
    ) -> HashMap<MetricKind, Metric> {
        let kinds = kinds.unwrap_or(&MetricKind::ALL);
        let mut enhancement: Option<f64> = None;
        let mut out = HashMap::with_capacity(kinds.len());

        for &kind in kinds {
            let key = (kind, result.timestamp);
            if let Some(hit) = self.cache.get(&key) {
                out.insert(kind, hit.clone());
                continue;
            }

            let e = if needs_enhancement(kind) {
                *enhancement.get_or_insert_with(|| collaborators.enhancement_or_default())
            } else {
                0.0
            };

            let metric = derive(kind, result, e, config)
                .and_then(|value| Metric::sealed(kind, value, result))
                .unwrap_or_else(|error| {
                    tracing::warn!(%kind, %error, "metric computation failed, storing zero");
                    Metric::zeroed(kind, result)
                });

            self.cache.insert(key, metric.clone());
            out.insert(kind, metric);
        }

        out
    }
}
