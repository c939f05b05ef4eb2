//! External enhancement and field-coherence collaborators.
//!
//! Both collaborators are owned and evolved outside the engine. The engine only
//! reads them (and asks the enhancement provider to advance once per analysis),
//! and every read is best-effort: a failure is logged and replaced by a
//! documented default rather than aborting the pipeline.
//!
//! [`Collaborators`] is the single place where that policy lives. Pipeline
//! steps that must know whether a read failed call the `Result`-returning
//! accessors; everything else uses the `*_or_default` variants.

use std::f64::consts::PI;
use std::sync::{Arc, Mutex};

use crate::error::ProviderError;

/// Field coherence used when the field collaborator cannot be read.
pub const DEFAULT_FIELD_COHERENCE: f64 = 0.5;

/// Field energy used when the field collaborator cannot be read.
pub const DEFAULT_FIELD_ENERGY: f64 = 0.0;

/// Enhancement factor used for scaling when the provider cannot be read.
pub const DEFAULT_ENHANCEMENT: f64 = 0.0;

/// Source of the enhancement coefficient.
///
/// The factor is conventionally in `[0, 1]` but not clamped.
pub trait EnhancementProvider: Send + Sync {
    /// Current enhancement coefficient.
    fn enhancement_factor(&self) -> Result<f64, ProviderError>;

    /// Let the provider evolve its internal state by `dt` seconds.
    fn advance(&self, dt: f64) -> Result<(), ProviderError>;
}

/// Source of the external field readings.
pub trait FieldCoherenceProvider: Send + Sync {
    /// Scalar coherence of the external field.
    fn field_coherence(&self) -> Result<f64, ProviderError>;

    /// Scalar energy of the external field.
    fn field_energy(&self) -> Result<f64, ProviderError>;
}

/// Enhancement provider with a constant factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedEnhancement(pub f64);

impl EnhancementProvider for FixedEnhancement {
    fn enhancement_factor(&self) -> Result<f64, ProviderError> {
        Ok(self.0)
    }

    fn advance(&self, _dt: f64) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Field provider with constant readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedField {
    /// Reported field coherence.
    pub coherence: f64,
    /// Reported field energy.
    pub energy: f64,
}

impl Default for FixedField {
    fn default() -> Self {
        Self {
            coherence: DEFAULT_FIELD_COHERENCE,
            energy: DEFAULT_FIELD_ENERGY,
        }
    }
}

impl FieldCoherenceProvider for FixedField {
    fn field_coherence(&self) -> Result<f64, ProviderError> {
        Ok(self.coherence)
    }

    fn field_energy(&self) -> Result<f64, ProviderError> {
        Ok(self.energy)
    }
}

/// Enhancement that oscillates sinusoidally as time advances.
///
/// `factor(t) = base + depth · sin(2π · rate · t)`
#[derive(Debug)]
pub struct OscillatingEnhancement {
    base: f64,
    depth: f64,
    rate_hz: f64,
    elapsed: Mutex<f64>,
}

impl OscillatingEnhancement {
    /// Create an oscillator starting at `t = 0`.
    pub fn new(base: f64, depth: f64, rate_hz: f64) -> Self {
        Self {
            base,
            depth,
            rate_hz,
            elapsed: Mutex::new(0.0),
        }
    }

    /// Seconds advanced so far.
    pub fn elapsed(&self) -> Result<f64, ProviderError> {
        self.elapsed
            .lock()
            .map(|t| *t)
            .map_err(|_| ProviderError::Unavailable("oscillator state poisoned".into()))
    }
}

impl EnhancementProvider for OscillatingEnhancement {
    fn enhancement_factor(&self) -> Result<f64, ProviderError> {
        let t = self.elapsed()?;
        Ok(self.base + self.depth * (2.0 * PI * self.rate_hz * t).sin())
    }

    fn advance(&self, dt: f64) -> Result<(), ProviderError> {
        if !dt.is_finite() {
            return Err(ProviderError::NonFinite {
                reading: "dt",
                value: dt,
            });
        }
        let mut elapsed = self
            .elapsed
            .lock()
            .map_err(|_| ProviderError::Unavailable("oscillator state poisoned".into()))?;
        *elapsed += dt;
        Ok(())
    }
}

/// Collaborator whose every read fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl EnhancementProvider for Unavailable {
    fn enhancement_factor(&self) -> Result<f64, ProviderError> {
        Err(ProviderError::Unavailable("enhancement provider offline".into()))
    }

    fn advance(&self, _dt: f64) -> Result<(), ProviderError> {
        Err(ProviderError::Unavailable("enhancement provider offline".into()))
    }
}

impl FieldCoherenceProvider for Unavailable {
    fn field_coherence(&self) -> Result<f64, ProviderError> {
        Err(ProviderError::Unavailable("field provider offline".into()))
    }

    fn field_energy(&self) -> Result<f64, ProviderError> {
        Err(ProviderError::Unavailable("field provider offline".into()))
    }
}

fn finite(reading: &'static str, value: f64) -> Result<f64, ProviderError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProviderError::NonFinite { reading, value })
    }
}

/// Substitute `default` for a failed read, logging the failure.
pub fn best_effort(reading: &'static str, read: Result<f64, ProviderError>, default: f64) -> f64 {
    match read {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(reading, %error, default, "collaborator read failed, using default");
            default
        }
    }
}

/// The engine's handles to both external collaborators.
#[derive(Clone)]
pub struct Collaborators {
    enhancement: Arc<dyn EnhancementProvider>,
    field: Arc<dyn FieldCoherenceProvider>,
    scale_by_field: bool,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::new(
            Arc::new(FixedEnhancement(DEFAULT_ENHANCEMENT)),
            Arc::new(FixedField::default()),
        )
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("scale_by_field", &self.scale_by_field)
            .finish_non_exhaustive()
    }
}

impl Collaborators {
    /// Pair an enhancement provider with a field provider.
    pub fn new(
        enhancement: Arc<dyn EnhancementProvider>,
        field: Arc<dyn FieldCoherenceProvider>,
    ) -> Self {
        Self {
            enhancement,
            field,
            scale_by_field: false,
        }
    }

    /// Scale the enhancement factor by `|field_energy|`.
    pub fn with_field_scaling(mut self, enabled: bool) -> Self {
        self.scale_by_field = enabled;
        self
    }

    /// Replace the enhancement provider.
    pub fn set_enhancement(&mut self, provider: Arc<dyn EnhancementProvider>) {
        self.enhancement = provider;
    }

    /// Replace the field provider.
    pub fn set_field(&mut self, provider: Arc<dyn FieldCoherenceProvider>) {
        self.field = provider;
    }

    /// Enhancement factor, optionally scaled by the field energy magnitude.
    pub fn enhancement_factor(&self) -> Result<f64, ProviderError> {
        let base = finite("enhancement_factor", self.enhancement.enhancement_factor()?)?;
        if self.scale_by_field {
            let energy = finite("field_energy", self.field.field_energy()?)?;
            Ok(base * energy.abs())
        } else {
            Ok(base)
        }
    }

    /// Field coherence reading.
    pub fn field_coherence(&self) -> Result<f64, ProviderError> {
        finite("field_coherence", self.field.field_coherence()?)
    }

    /// Field energy reading.
    pub fn field_energy(&self) -> Result<f64, ProviderError> {
        finite("field_energy", self.field.field_energy()?)
    }

    /// Enhancement factor, or 0.0 (no scaling) when unreadable.
    pub fn enhancement_or_default(&self) -> f64 {
        best_effort("enhancement_factor", self.enhancement_factor(), DEFAULT_ENHANCEMENT)
    }

    /// Field coherence, or 0.5 when unreadable.
    pub fn field_coherence_or_default(&self) -> f64 {
        best_effort("field_coherence", self.field_coherence(), DEFAULT_FIELD_COHERENCE)
    }

    /// Field energy, or 0.0 when unreadable.
    pub fn field_energy_or_default(&self) -> f64 {
        best_effort("field_energy", self.field_energy(), DEFAULT_FIELD_ENERGY)
    }

    /// Advance the enhancement provider; failures are logged and swallowed.
    pub fn advance(&self, dt: f64) {
        if let Err(error) = self.enhancement.advance(dt) {
            tracing::warn!(dt, %error, "enhancement provider failed to advance");
        }
    }
}
