//! Risk overlay — stop-loss / take-profit weight adjustment.
//!
//! The overlay is a pure read-only function of portfolio state and a proposed
//! weight. It never trades; it only overrides the requested allocation when a
//! threshold is breached at the evaluation price.

use crate::domain::Portfolio;
use serde::{Deserialize, Serialize};

/// Stop thresholds expressed as fractions of the average entry price
/// (0.05 = 5%). An unset threshold never triggers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StopConfig {
    pub stop_loss_pct: Option<f64>,
    pub take_profit_pct: Option<f64>,
}

impl StopConfig {
    pub fn new(stop_loss_pct: Option<f64>, take_profit_pct: Option<f64>) -> Self {
        Self {
            stop_loss_pct,
            take_profit_pct,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stop_loss_pct.is_none() && self.take_profit_pct.is_none()
    }
}

/// Seam for an external risk overlay consulted by the simulation loop.
pub trait WeightOverlay {
    /// Map a requested target weight to an effective one, given the current
    /// portfolio state and evaluation price.
    fn adjust_weight(
        &self,
        portfolio: &Portfolio,
        symbol: &str,
        price: f64,
        requested_weight: f64,
    ) -> f64;
}

/// Stop-based overlay: forces a flatten (weight 0) when a stop-loss or
/// take-profit threshold is breached, unless the strategy is explicitly
/// requesting a reversal, which implicitly flattens and re-enters.
#[derive(Debug, Clone, Default)]
pub struct StopRiskOverlay {
    stops: StopConfig,
}

impl StopRiskOverlay {
    pub fn new(stops: StopConfig) -> Self {
        Self { stops }
    }
}

impl WeightOverlay for StopRiskOverlay {
    fn adjust_weight(
        &self,
        portfolio: &Portfolio,
        symbol: &str,
        price: f64,
        requested_weight: f64,
    ) -> f64 {
        let position = match portfolio.position(symbol) {
            Some(pos) if !pos.is_flat() => pos,
            _ => return requested_weight,
        };

        let avg_price = position.average_price;
        if !avg_price.is_finite() || avg_price <= 0.0 {
            return requested_weight;
        }

        let long = position.is_long();
        let stop_loss_hit = self.stops.stop_loss_pct.is_some_and(|pct| {
            if long {
                price <= avg_price * (1.0 - pct)
            } else {
                price >= avg_price * (1.0 + pct)
            }
        });
        let take_profit_hit = self.stops.take_profit_pct.is_some_and(|pct| {
            if long {
                price >= avg_price * (1.0 + pct)
            } else {
                price <= avg_price * (1.0 - pct)
            }
        });

        if stop_loss_hit || take_profit_hit {
            let reversal = requested_weight != 0.0 && (requested_weight > 0.0) != long;
            if reversal {
                return requested_weight;
            }
            return 0.0;
        }

        requested_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portfolio_with(quantity: f64, average_price: f64) -> Portfolio {
        let mut portfolio = Portfolio::new(100_000.0);
        let pos = portfolio.get_or_create_position("TEST");
        pos.quantity = quantity;
        pos.average_price = average_price;
        portfolio
    }

    fn overlay(stop_loss: Option<f64>, take_profit: Option<f64>) -> StopRiskOverlay {
        StopRiskOverlay::new(StopConfig::new(stop_loss, take_profit))
    }

    #[test]
    fn flat_position_passes_weight_through() {
        let portfolio = Portfolio::new(100_000.0);
        let overlay = overlay(Some(0.05), Some(0.10));
        assert_eq!(overlay.adjust_weight(&portfolio, "TEST", 50.0, 0.7), 0.7);
    }

    #[test]
    fn long_stop_loss_forces_flatten() {
        let portfolio = portfolio_with(100.0, 100.0);
        let overlay = overlay(Some(0.05), None);
        // 94 <= 95 threshold
        assert_eq!(overlay.adjust_weight(&portfolio, "TEST", 94.0, 1.0), 0.0);
    }

    #[test]
    fn long_take_profit_forces_flatten() {
        let portfolio = portfolio_with(100.0, 100.0);
        let overlay = overlay(None, Some(0.10));
        assert_eq!(overlay.adjust_weight(&portfolio, "TEST", 111.0, 1.0), 0.0);
    }

    #[test]
    fn short_stop_loss_forces_flatten() {
        let portfolio = portfolio_with(-100.0, 100.0);
        let overlay = overlay(Some(0.05), None);
        // price rose to 106 >= 105 threshold
        assert_eq!(overlay.adjust_weight(&portfolio, "TEST", 106.0, -1.0), 0.0);
    }

    #[test]
    fn short_take_profit_forces_flatten() {
        let portfolio = portfolio_with(-100.0, 100.0);
        let overlay = overlay(None, Some(0.10));
        assert_eq!(overlay.adjust_weight(&portfolio, "TEST", 89.0, -1.0), 0.0);
    }

    #[test]
    fn unset_thresholds_never_trigger() {
        let portfolio = portfolio_with(100.0, 100.0);
        let overlay = overlay(None, None);
        assert_eq!(overlay.adjust_weight(&portfolio, "TEST", 1.0, 0.8), 0.8);
    }

    #[test]
    fn no_trigger_passes_weight_through() {
        let portfolio = portfolio_with(100.0, 100.0);
        let overlay = overlay(Some(0.05), Some(0.10));
        assert_eq!(overlay.adjust_weight(&portfolio, "TEST", 98.0, 0.6), 0.6);
    }

    #[test]
    fn explicit_reversal_is_allowed_through_trigger() {
        let portfolio = portfolio_with(100.0, 100.0);
        let overlay = overlay(Some(0.05), None);
        // Stop-loss breached, but the strategy wants to flip short.
        assert_eq!(overlay.adjust_weight(&portfolio, "TEST", 94.0, -0.5), -0.5);
    }

    #[test]
    fn same_direction_request_still_flattens_on_trigger() {
        let portfolio = portfolio_with(-100.0, 100.0);
        let overlay = overlay(Some(0.05), None);
        assert_eq!(overlay.adjust_weight(&portfolio, "TEST", 106.0, -0.8), 0.0);
    }

    #[test]
    fn corrupt_average_price_passes_weight_through() {
        let mut portfolio = Portfolio::new(100_000.0);
        let pos = portfolio.get_or_create_position("TEST");
        pos.quantity = 100.0;
        pos.average_price = f64::NAN;
        let overlay = overlay(Some(0.05), None);
        assert_eq!(overlay.adjust_weight(&portfolio, "TEST", 1.0, 0.3), 0.3);
    }
}
