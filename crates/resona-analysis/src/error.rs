//! Error types for the analysis pipeline.
//!
//! Only [`AnalysisError::AnalysisFailed`] ever reaches a caller of
//! [`ResonanceEngine::analyze`](crate::ResonanceEngine::analyze). Every other
//! variant is produced by an internal step and converted to that step's
//! documented fallback value at a single call site.

use thiserror::Error;

/// Failure reading an external collaborator.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    /// The collaborator could not produce a reading.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    /// The collaborator produced NaN or an infinity.
    #[error("collaborator returned non-finite {reading}: {value}")]
    NonFinite {
        /// Name of the reading.
        reading: &'static str,
        /// The offending value.
        value: f64,
    },
}

/// Errors raised inside the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The top-level signal was unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Hard failure returned to the caller.
    #[error("analysis failed: {source}")]
    AnalysisFailed {
        /// The underlying cause.
        #[source]
        source: Box<AnalysisError>,
    },

    /// An external collaborator read failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The step needs spectral energy and the spectrum has none.
    #[error("degenerate spectrum: {0}")]
    Degenerate(&'static str),

    /// A numeric step produced NaN or an infinity.
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    /// A random distribution could not be constructed.
    #[error("invalid distribution: {0}")]
    Distribution(String),

    /// Canonical serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Wrap an error as the caller-visible hard failure.
    pub fn failed(source: AnalysisError) -> Self {
        AnalysisError::AnalysisFailed {
            source: Box::new(source),
        }
    }

    /// The innermost cause, unwrapping any `AnalysisFailed` layers.
    pub fn root_cause(&self) -> &AnalysisError {
        match self {
            AnalysisError::AnalysisFailed { source } => source.root_cause(),
            other => other,
        }
    }
}
