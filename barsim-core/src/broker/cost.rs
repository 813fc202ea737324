//! Cost model — slippage and commission calculation.
//!
//! Slippage is directional: buyers pay more, sellers receive less.
//! Commission is a fraction of notional, debited from cash on both sides.

use crate::domain::OrderSide;

/// Execution friction: fixed basis-point slippage plus proportional commission.
#[derive(Debug, Clone)]
pub struct CostModel {
    /// Slippage in basis points, applied adversely to the order side.
    pub slippage_bps: f64,
    /// Commission as a fraction of notional (0.0005 = 5 bps per side).
    pub commission_rate: f64,
}

impl CostModel {
    pub fn new(slippage_bps: f64, commission_rate: f64) -> Self {
        Self {
            slippage_bps,
            commission_rate,
        }
    }

    pub fn frictionless() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Apply slippage to a raw price: `price * (1 + sign * bps/10_000)`.
    ///
    /// Buys execute above the raw price, sells below — always adverse.
    pub fn execution_price(&self, raw_price: f64, side: OrderSide) -> f64 {
        raw_price * (1.0 + side.sign() * self.slippage_bps / 10_000.0)
    }

    /// Commission for a fill: `notional * commission_rate`.
    pub fn commission(&self, notional: f64) -> f64 {
        notional * self.commission_rate
    }
}
