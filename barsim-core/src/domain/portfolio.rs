//! Portfolio — aggregate state of cash + all positions.

use crate::domain::position::Position;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cash plus a symbol → Position map.
///
/// The broker exclusively owns its portfolio; the risk overlay only ever
/// receives a shared reference. Positions are created lazily on first access
/// and kept forever, possibly flat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub cash: f64,
    pub positions: HashMap<String, Position>,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            positions: HashMap::new(),
        }
    }

    /// Return the position for `symbol`, creating a flat one if absent.
    pub fn get_or_create_position(&mut self, symbol: &str) -> &mut Position {
        self.positions
            .entry(symbol.to_string())
            .or_insert_with(|| Position::new(symbol.to_string()))
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    /// Total equity = cash + sum of position market values.
    ///
    /// A symbol missing from `last_prices` contributes nothing; supplying
    /// correct quotes is the caller's responsibility.
    pub fn total_equity(&self, last_prices: &HashMap<String, f64>) -> f64 {
        let position_value: f64 = self
            .positions
            .iter()
            .map(|(symbol, pos)| {
                let price = last_prices.get(symbol).copied().unwrap_or(0.0);
                pos.market_value(price)
            })
            .sum();
        self.cash + position_value
    }
}
