//! Paper broker — turns target allocations into trades against the ledger.
//!
//! The broker exclusively owns one `Portfolio` for one symbol and an
//! append-only fill list. It is the only component that moves cash: every
//! trade debits/credits notional at the slipped price and always debits
//! commission, then applies the fill to the position ledger.

pub mod cost;

pub use cost::CostModel;

use crate::domain::{Fill, OrderSide, Portfolio};
use std::collections::HashMap;

/// Simulated market-order broker for a single symbol.
#[derive(Debug, Clone)]
pub struct PaperBroker {
    symbol: String,
    cost_model: CostModel,
    portfolio: Portfolio,
    fills: Vec<Fill>,
    next_order_id: u64,
}

impl PaperBroker {
    pub fn new(symbol: &str, initial_cash: f64, cost_model: CostModel) -> Self {
        Self {
            symbol: symbol.to_string(),
            cost_model,
            portfolio: Portfolio::new(initial_cash),
            fills: Vec::new(),
            next_order_id: 1,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// All fills executed so far, in execution order.
    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    /// Consume the broker, yielding its fill ledger.
    pub fn into_fills(self) -> Vec<Fill> {
        self.fills
    }

    /// Execute one immediate market trade of `quantity` units at `price`.
    ///
    /// Zero-quantity requests are silently skipped. Slippage moves the
    /// execution price against the order side; commission always debits cash.
    pub fn apply_trade(&mut self, side: OrderSide, quantity: f64, price: f64) {
        if quantity == 0.0 {
            return;
        }
        let execution_price = self.cost_model.execution_price(price, side);
        let notional = quantity.abs() * execution_price;
        let commission = self.cost_model.commission(notional);

        self.portfolio.cash -= side.sign() * notional + commission;

        let fill = Fill {
            order_id: self.next_order_id,
            symbol: self.symbol.clone(),
            side,
            quantity: quantity.abs(),
            price: execution_price,
            commission,
            slippage: (execution_price - price).abs() * quantity.abs(),
        };
        self.next_order_id += 1;

        self.portfolio
            .get_or_create_position(&self.symbol)
            .apply_fill(&fill);
        self.fills.push(fill);
    }

    /// Trade to the whole-share position worth `weight` of current equity.
    ///
    /// `target_shares = floor(weight * equity / price)` — floor truncates
    /// toward negative infinity, so a negative target can overshoot the short
    /// by one share versus truncation toward zero. If the target equals the
    /// current (truncated) share count, no trade happens and no fill is made.
    pub fn rebalance_to_target_weight(&mut self, weight: f64, price: f64) {
        let equity = self.equity(price);
        let target_notional = weight * equity;
        let target_shares = (target_notional / price).floor() as i64;

        let current_shares = self
            .portfolio
            .get_or_create_position(&self.symbol)
            .quantity
            .trunc() as i64;

        let delta_shares = target_shares - current_shares;
        if delta_shares == 0 {
            return;
        }
        let side = if delta_shares > 0 {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        };
        self.apply_trade(side, delta_shares.unsigned_abs() as f64, price);
    }

    /// Fully flatten the current position with one opposing trade at `price`.
    pub fn close_position(&mut self, price: f64) {
        let quantity = self
            .portfolio
            .get_or_create_position(&self.symbol)
            .quantity;
        if quantity == 0.0 {
            return;
        }
        self.apply_trade(OrderSide::closing(quantity), quantity.abs(), price);
    }

    /// Mark-to-market equity at `price`.
    pub fn equity(&self, price: f64) -> f64 {
        let prices = HashMap::from([(self.symbol.clone(), price)]);
        self.portfolio.total_equity(&prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frictionless_broker(cash: f64) -> PaperBroker {
        PaperBroker::new("TEST", cash, CostModel::frictionless())
    }

    #[test]
    fn zero_quantity_trade_is_skipped() {
        let mut broker = frictionless_broker(100_000.0);
        broker.apply_trade(OrderSide::Buy, 0.0, 100.0);
        assert!(broker.fills().is_empty());
        assert_eq!(broker.portfolio().cash, 100_000.0);
    }

    #[test]
    fn buy_debits_cash_and_opens_position() {
        let mut broker = frictionless_broker(100_000.0);
        broker.apply_trade(OrderSide::Buy, 100.0, 100.0);
        assert_eq!(broker.portfolio().cash, 90_000.0);
        let pos = broker.portfolio().position("TEST").unwrap();
        assert_eq!(pos.quantity, 100.0);
        assert_eq!(pos.average_price, 100.0);
    }

    #[test]
    fn sell_credits_cash() {
        let mut broker = frictionless_broker(100_000.0);
        broker.apply_trade(OrderSide::Sell, 50.0, 200.0);
        assert_eq!(broker.portfolio().cash, 110_000.0);
        assert_eq!(broker.portfolio().position("TEST").unwrap().quantity, -50.0);
    }

    #[test]
    fn commission_debits_cash_on_both_sides() {
        let mut broker = PaperBroker::new("TEST", 100_000.0, CostModel::new(0.0, 0.001));
        broker.apply_trade(OrderSide::Buy, 100.0, 100.0);
        // -10_000 notional - 10 commission
        assert!((broker.portfolio().cash - 89_990.0).abs() < 1e-9);
        broker.apply_trade(OrderSide::Sell, 100.0, 100.0);
        // +10_000 notional - 10 commission
        assert!((broker.portfolio().cash - 99_980.0).abs() < 1e-9);
    }

    #[test]
    fn slippage_is_adverse_and_recorded() {
        let mut broker = PaperBroker::new("TEST", 100_000.0, CostModel::new(10.0, 0.0));
        broker.apply_trade(OrderSide::Buy, 100.0, 100.0);
        let fill = &broker.fills()[0];
        assert!((fill.price - 100.10).abs() < 1e-10);
        assert!((fill.slippage - 10.0).abs() < 1e-9); // 0.10 * 100 shares
    }

    #[test]
    fn order_ids_strictly_increase() {
        let mut broker = frictionless_broker(100_000.0);
        broker.apply_trade(OrderSide::Buy, 10.0, 100.0);
        broker.apply_trade(OrderSide::Sell, 5.0, 100.0);
        broker.apply_trade(OrderSide::Sell, 5.0, 100.0);
        let ids: Vec<u64> = broker.fills().iter().map(|f| f.order_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn rebalance_full_weight_no_frictions() {
        // Scenario A: weight 1.0 at price 100 with 100k cash => 1000 shares, cash 0.
        let mut broker = frictionless_broker(100_000.0);
        broker.rebalance_to_target_weight(1.0, 100.0);
        assert_eq!(broker.fills().len(), 1);
        let fill = &broker.fills()[0];
        assert_eq!(fill.side, OrderSide::Buy);
        assert_eq!(fill.quantity, 1000.0);
        assert_eq!(fill.price, 100.0);
        assert_eq!(broker.portfolio().cash, 0.0);
    }

    #[test]
    fn rebalance_is_idempotent_at_target() {
        let mut broker = frictionless_broker(100_000.0);
        broker.rebalance_to_target_weight(0.5, 100.0);
        assert_eq!(broker.fills().len(), 1);
        broker.rebalance_to_target_weight(0.5, 100.0);
        assert_eq!(broker.fills().len(), 1);
    }

    #[test]
    fn rebalance_negative_weight_floors_toward_negative_infinity() {
        // -0.5 * 100_000 / 99 = -505.05..., floor => -506 shares short.
        let mut broker = frictionless_broker(100_000.0);
        broker.rebalance_to_target_weight(-0.5, 99.0);
        let pos = broker.portfolio().position("TEST").unwrap();
        assert_eq!(pos.quantity, -506.0);
    }

    #[test]
    fn close_position_flattens_long_and_short() {
        let mut broker = frictionless_broker(100_000.0);
        broker.apply_trade(OrderSide::Buy, 100.0, 100.0);
        broker.close_position(110.0);
        assert!(broker.portfolio().position("TEST").unwrap().is_flat());
        assert_eq!(broker.portfolio().cash, 101_000.0);

        broker.apply_trade(OrderSide::Sell, 50.0, 100.0);
        broker.close_position(90.0);
        assert!(broker.portfolio().position("TEST").unwrap().is_flat());
        assert_eq!(broker.fills().len(), 4);
    }

    #[test]
    fn close_flat_position_is_noop() {
        let mut broker = frictionless_broker(100_000.0);
        broker.close_position(100.0);
        assert!(broker.fills().is_empty());
    }

    #[test]
    fn equity_marks_open_position() {
        let mut broker = frictionless_broker(100_000.0);
        broker.apply_trade(OrderSide::Buy, 100.0, 100.0);
        assert_eq!(broker.equity(110.0), 101_000.0);
    }
}
