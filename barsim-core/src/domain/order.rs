//! Order side for market execution.

use serde::{Deserialize, Serialize};

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Signed direction: +1 for buys, -1 for sells.
    pub fn sign(self) -> f64 {
        match self {
            OrderSide::Buy => 1.0,
            OrderSide::Sell => -1.0,
        }
    }

    /// The side that closes a position of the given signed quantity.
    pub fn closing(quantity: f64) -> OrderSide {
        if quantity > 0.0 {
            OrderSide::Sell
        } else {
            OrderSide::Buy
        }
    }
}
