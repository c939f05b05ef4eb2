//! Numeric helpers shared by the analysis pipeline.
//!
//! # Statistics
//!
//! - [`mean`] / [`std_dev`] - Arithmetic mean and population standard deviation
//! - [`max_abs`] - Largest absolute value of a buffer
//!
//! # Spectral Layout
//!
//! - [`bin_frequencies`] - Standard FFT bin-frequency axis (negative-wrapped)
//! - [`wrap_phase`] - Map an angle into `(-π, π]`
//!
//! # Utilities
//!
//! - [`clamp`] - Value limiting that tolerates reversed bounds
//! - [`is_silent`] - True when every value is exactly zero

use core::f64::consts::PI;

/// Arithmetic mean of a buffer.
///
/// Returns 0.0 for an empty buffer.
///
/// # Example
/// ```rust
/// use resona_core::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
/// assert_eq!(mean(&[]), 0.0);
/// ```
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`, not `n - 1`).
///
/// Returns 0.0 for an empty buffer.
///
/// # Example
/// ```rust
/// use resona_core::std_dev;
///
/// assert!((std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-12);
/// ```
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    let variance = values.iter().map(|v| (v - mu) * (v - mu)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Largest absolute value in a buffer, 0.0 when empty.
#[inline]
pub fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

/// True when the buffer is empty or every value is exactly zero.
#[inline]
pub fn is_silent(values: &[f64]) -> bool {
    values.iter().all(|&v| v == 0.0)
}

/// Clamp a value to `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: reversed bounds are swapped and a
/// NaN input yields `min`.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    if value.is_nan() {
        lo
    } else if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

/// Map an angle in radians into `(-π, π]`.
///
/// `atan2` already returns `[-π, π]`; the only correction needed for its
/// output is `-π → π`. Arbitrary angles are wrapped first.
#[inline]
pub fn wrap_phase(angle: f64) -> f64 {
    let mut wrapped = angle;
    if !(-PI..=PI).contains(&wrapped) {
        wrapped = (wrapped + PI).rem_euclid(2.0 * PI) - PI;
    }
    if wrapped <= -PI { PI } else { wrapped }
}

/// Bin-center frequencies for an `size`-point FFT at `sample_rate`.
///
/// Bins `k < size / 2` map to `k · R / N`; the rest wrap to negative
/// frequencies `(k − N) · R / N`, matching the conventional two-sided layout.
/// For odd sizes the positive half includes bin `(N − 1) / 2`.
///
/// # Example
/// ```rust
/// use resona_core::bin_frequencies;
///
/// let f = bin_frequencies(4, 8.0);
/// assert_eq!(f, vec![0.0, 2.0, -4.0, -2.0]);
/// ```
pub fn bin_frequencies(size: usize, sample_rate: f64) -> Vec<f64> {
    if size == 0 {
        return Vec::new();
    }
    let n = size as f64;
    let positive = size.div_ceil(2);
    (0..size)
        .map(|k| {
            if k < positive {
                k as f64 * sample_rate / n
            } else {
                (k as f64 - n) * sample_rate / n
            }
        })
        .collect()
}
