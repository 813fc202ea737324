//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * value[t] + (1 - alpha) * EMA[t-1],
//! alpha = 2 / (window + 1). Seed: SMA of the first `window` values.

/// Compute the EMA of `values` with the given window.
///
/// Entries before the seed window fills are NaN; a NaN in the seed window
/// leaves the whole output NaN.
pub fn ema(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "EMA window must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if n < window {
        return result;
    }

    let alpha = 2.0 / (window as f64 + 1.0);

    let mut sum = 0.0;
    for &v in values.iter().take(window) {
        if v.is_nan() {
            return result;
        }
        sum += v;
    }
    let seed = sum / window as f64;
    result[window - 1] = seed;

    let mut prev = seed;
    for i in window..n {
        if values[i].is_nan() {
            // NaN taints the recursion from here on.
            break;
        }
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = prev;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_seed_is_sma() {
        let values = [10.0, 12.0, 14.0, 16.0];
        let result = ema(&values, 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 12.0, DEFAULT_EPSILON);
        // alpha = 0.5: 0.5*16 + 0.5*12 = 14
        assert_approx(result[3], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_1_tracks_values() {
        let values = [5.0, 7.0, 9.0];
        let result = ema(&values, 1);
        assert_approx(result[0], 5.0, DEFAULT_EPSILON);
        assert_approx(result[1], 7.0, DEFAULT_EPSILON);
        assert_approx(result[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_nan_in_seed_window() {
        let values = [10.0, f64::NAN, 14.0, 16.0];
        let result = ema(&values, 3);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn ema_too_few_values() {
        let result = ema(&[1.0], 5);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
