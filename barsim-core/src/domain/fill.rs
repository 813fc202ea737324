//! Fill — immutable record of one executed trade.

use crate::domain::order::OrderSide;
use serde::{Deserialize, Serialize};

/// A single executed trade.
///
/// `quantity` is always the positive traded size; direction lives in `side`.
/// `price` is the post-slippage execution price. Fills are created once by the
/// broker, appended to its ledger, and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    /// Strictly increasing per broker instance.
    pub order_id: u64,
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: f64,
    pub price: f64,
    /// Transaction fee, a fraction of notional. Always non-negative.
    pub commission: f64,
    /// Absolute price impact times quantity. Always non-negative.
    pub slippage: f64,
}
