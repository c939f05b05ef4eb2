//! Aggregated report over an engine's history.

use std::collections::{BTreeMap, HashMap};

use resona_core::{MetricKind, OperatingTier, ResonanceType, clamp, mean};
use serde::Serialize;

use crate::collaborators::Collaborators;
use crate::error::AnalysisError;
use crate::metrics::Metric;
use crate::result::AnalysisResult;

/// Field-energy gain in the quantum score.
pub const QUANTUM_ENERGY_GAIN: f64 = 0.1;

/// Snapshot of the analyses performed so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of results in history
    pub analyses: usize,
    /// Mean coherence over history
    pub average_coherence: f64,
    /// Mean resonance strength over history
    pub average_strength: f64,
    /// Mean quality factor over history
    pub average_quality_factor: f64,
    /// How often each resonance type was produced
    pub type_counts: BTreeMap<ResonanceType, usize>,
    /// Type of the summarized result
    pub latest_type: ResonanceType,
    /// Tier of the summarized result
    pub operating_tier: OperatingTier,
    /// Speed multiplier of that tier
    pub speed_multiplier: f64,
    /// Values of the supplied metrics
    pub metrics: BTreeMap<MetricKind, f64>,
    /// Coherence weighted by the external field, in `[0, 1]`
    pub quantum_score: f64,
}

/// `clamp(coherence · field_coherence · (1 + 0.1·|field_energy|), 0, 1)`
pub fn quantum_score(coherence: f64, field_coherence: f64, field_energy: f64) -> f64 {
    clamp(
        coherence * field_coherence * (1.0 + QUANTUM_ENERGY_GAIN * field_energy.abs()),
        0.0,
        1.0,
    )
}

impl Summary {
    /// Summarize `history` around `result`.
    ///
    /// Every [`ResonanceType`] appears in `type_counts`, with zero for types
    /// never produced.
    pub fn build(
        history: &[AnalysisResult],
        result: &AnalysisResult,
        metrics: Option<&HashMap<MetricKind, Metric>>,
        collaborators: &Collaborators,
    ) -> Self {
        let coherences: Vec<f64> = history.iter().map(|r| r.coherence).collect();
        let strengths: Vec<f64> = history.iter().map(|r| r.resonance_strength).collect();
        let qualities: Vec<f64> = history.iter().map(|r| r.quality_factor).collect();

        let mut type_counts: BTreeMap<ResonanceType, usize> =
            ResonanceType::ALL.iter().map(|&t| (t, 0)).collect();
        for r in history {
            *type_counts.entry(r.resonance_type).or_default() += 1;
        }

        let metrics = metrics
            .map(|m| m.iter().map(|(&kind, metric)| (kind, metric.value)).collect())
            .unwrap_or_default();

        Self {
            analyses: history.len(),
            average_coherence: mean(&coherences),
            average_strength: mean(&strengths),
            average_quality_factor: mean(&qualities),
            type_counts,
            latest_type: result.resonance_type,
            operating_tier: result.operating_tier,
            speed_multiplier: result.operating_tier.speed_multiplier(),
            metrics,
            quantum_score: quantum_score(
                result.coherence,
                collaborators.field_coherence_or_default(),
                collaborators.field_energy_or_default(),
            ),
        }
    }

    /// Pretty-printed JSON rendering.
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantum_score() {
        assert_eq!(quantum_score(0.8, 0.5, 0.0), 0.4);
        assert!((quantum_score(0.8, 0.5, -2.0) - 0.48).abs() < 1e-12);
        assert_eq!(quantum_score(1.0, 1.0, 50.0), 1.0);
        assert_eq!(quantum_score(0.5, -1.0, 0.0), 0.0);
    }
}
