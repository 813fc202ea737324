//! Position — signed quantity and cost basis for one symbol.

use crate::domain::fill::Fill;
use crate::domain::order::OrderSide;
use serde::{Deserialize, Serialize};

/// Signed position with volume-weighted cost basis.
///
/// Invariant: `quantity == 0.0` if and only if `average_price == 0.0` — a flat
/// position carries no cost basis. Positions are created flat, mutated only by
/// `apply_fill`, and never removed (a closed position stays in the portfolio
/// at zero and may be reused).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    /// Positive = long, negative = short, zero = flat.
    pub quantity: f64,
    /// Cost basis per unit of the current position. Non-negative.
    pub average_price: f64,
}

impl Position {
    pub fn new(symbol: String) -> Self {
        Self {
            symbol,
            quantity: 0.0,
            average_price: 0.0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.quantity == 0.0
    }

    pub fn is_long(&self) -> bool {
        self.quantity > 0.0
    }

    pub fn is_short(&self) -> bool {
        self.quantity < 0.0
    }

    pub fn market_value(&self, current_price: f64) -> f64 {
        self.quantity * current_price
    }

    /// Apply one fill to this position.
    ///
    /// Accounting rules:
    /// - zero-quantity fills are a no-op
    /// - closing to exactly flat resets the basis to zero (realized P&L is
    ///   implied by the cash movement the broker already applied)
    /// - opening from flat or adding in the same direction updates the basis
    ///   as a volume-weighted average
    /// - reducing keeps the basis; crossing through flat to the opposite side
    ///   restarts the basis at the fill's execution price
    pub fn apply_fill(&mut self, fill: &Fill) {
        if fill.quantity == 0.0 {
            return;
        }
        let delta = match fill.side {
            OrderSide::Buy => fill.quantity,
            OrderSide::Sell => -fill.quantity,
        };
        let new_quantity = self.quantity + delta;

        if new_quantity == 0.0 {
            self.quantity = 0.0;
            self.average_price = 0.0;
            return;
        }

        let adding = self.quantity == 0.0
            || (self.quantity > 0.0 && delta > 0.0)
            || (self.quantity < 0.0 && delta < 0.0);

        if adding {
            let total_cost =
                self.average_price * self.quantity.abs() + fill.price * delta.abs();
            self.quantity = new_quantity;
            self.average_price = total_cost / self.quantity.abs();
        } else {
            let reversed = (new_quantity > 0.0) != (self.quantity > 0.0);
            self.quantity = new_quantity;
            if reversed {
                self.average_price = fill.price;
            }
            // Partial reduction leaves the basis unchanged.
        }
    }
}
