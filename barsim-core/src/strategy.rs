//! Strategy contract and the SMA crossover reference strategy.

use crate::domain::Bar;
use crate::indicators::sma;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A strategy supplies one target weight per bar timestamp.
///
/// Weights are fractions of total equity in [-1, 1]: positive long, negative
/// short, zero flat. Timestamps absent from the returned map are treated as
/// weight 0 by the simulation loop.
pub trait Strategy {
    /// Number of bars that must elapse before the loop starts rebalancing.
    fn min_history_bars(&self) -> usize {
        0
    }

    /// Target weight per bar timestamp, aligned to the input bars.
    fn generate_target_weights(&self, bars: &[Bar]) -> HashMap<DateTime<Utc>, f64>;
}

/// Long when the short SMA is above the long SMA, short when below, flat
/// while either average is still warming up.
#[derive(Debug, Clone)]
pub struct SmaCrossStrategy {
    pub short_window: usize,
    pub long_window: usize,
}

impl SmaCrossStrategy {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
        }
    }
}

impl Default for SmaCrossStrategy {
    fn default() -> Self {
        Self::new(20, 50)
    }
}

impl Strategy for SmaCrossStrategy {
    fn min_history_bars(&self) -> usize {
        self.short_window.max(self.long_window)
    }

    fn generate_target_weights(&self, bars: &[Bar]) -> HashMap<DateTime<Utc>, f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let sma_short = sma(&closes, self.short_window);
        let sma_long = sma(&closes, self.long_window);

        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                let weight = if sma_short[i].is_nan() || sma_long[i].is_nan() {
                    0.0
                } else if sma_short[i] > sma_long[i] {
                    1.0
                } else if sma_short[i] < sma_long[i] {
                    -1.0
                } else {
                    0.0
                };
                (bar.timestamp, weight)
            })
            .collect()
    }
}
