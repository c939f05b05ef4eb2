//! Resona Core - data model for spectral resonance analysis
//!
//! This crate holds the value types shared by the configuration and analysis
//! crates. Everything here is an immutable value object or a pure function.
//!
//! # Data Model
//!
//! - [`Spectrum`] - Aligned frequency / amplitude / phase sequences
//! - [`ResonancePeak`] - A local maximum of a spectrum
//! - [`Timestamp`] / [`MonotonicClock`] - Unique analysis timestamps
//!
//! # Tags
//!
//! - [`TransformDomain`] - Spectral transform strategy
//! - [`ResonanceType`] - Classification of a resonance pattern
//! - [`OperatingTier`] - Ordered tier with a fixed speed multiplier
//! - [`MetricKind`] - Entries of the metrics catalogue
//!
//! # Math
//!
//! - Statistics: [`mean`], [`std_dev`], [`max_abs`]
//! - Layout: [`bin_frequencies`], [`wrap_phase`]
//!
//! # Example
//!
//! ```rust
//! use resona_core::{Spectrum, bin_frequencies};
//!
//! let frequencies = bin_frequencies(4, 8.0);
//! let mut spectrum = Spectrum::new(frequencies, vec![0.0, 4.0, 1.0, 2.0], vec![0.0; 4]).unwrap();
//! spectrum.normalize();
//! assert_eq!(spectrum.max_amplitude(), 1.0);
//! ```

pub mod math;
pub mod spectrum;
pub mod tags;
pub mod timestamp;

pub use math::{bin_frequencies, clamp, is_silent, max_abs, mean, std_dev, wrap_phase};
pub use spectrum::{ResonancePeak, Spectrum};
pub use tags::{MetricKind, OperatingTier, ResonanceType, TransformDomain};
pub use timestamp::{MonotonicClock, Timestamp};
