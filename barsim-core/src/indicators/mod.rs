//! Rolling-average indicators over close-price slices.
//!
//! Outputs align 1:1 with the input; warm-up entries are NaN.

pub mod ema;
pub mod sma;

pub use ema::ema;
pub use sma::sma;

#[cfg(test)]
pub(crate) const DEFAULT_EPSILON: f64 = 1e-9;

#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "expected {expected}, got {actual}"
    );
}
