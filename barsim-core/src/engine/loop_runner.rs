//! Bar-by-bar simulation loop — the heart of the engine.

use crate::broker::{CostModel, PaperBroker};
use crate::domain::{Bar, Portfolio};
use crate::risk::{StopConfig, WeightOverlay};
use crate::strategy::Strategy;
use thiserror::Error;

use super::state::{EngineConfig, RunResult};

/// Structural input errors. Raised before the loop starts; per-bar numeric
/// degeneracies are absorbed by the carry-forward policy instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("bar sequence is empty")]
    EmptyData,

    #[error("bars must be ordered ascending by timestamp without duplicates (offending index {0})")]
    UnorderedBars(usize),
}

/// Run a simulation over an ordered bar sequence.
///
/// Per bar, in strict order:
/// 1. A non-finite or non-positive close records the previous bar's equity
///    (0 for the first bar) and leaves the portfolio untouched.
/// 2. With stops configured and a non-flat position, the bar's high/low are
///    checked against thresholds from the average entry price. Stop-loss
///    takes precedence over take-profit in the same bar; the exit executes
///    at the exact threshold price.
/// 3. Once `i + 1 >= min_history_bars`, the requested weight (0 if the
///    strategy supplied none for this timestamp) passes through the overlay
///    against the current, possibly just-flattened position, and the broker
///    rebalances at the close.
/// 4. Equity at the close is recorded.
pub fn run_backtest(
    bars: &[Bar],
    strategy: &dyn Strategy,
    config: &EngineConfig,
    overlay: Option<&dyn WeightOverlay>,
) -> Result<RunResult, EngineError> {
    if bars.is_empty() {
        return Err(EngineError::EmptyData);
    }
    for i in 1..bars.len() {
        if bars[i].timestamp <= bars[i - 1].timestamp {
            return Err(EngineError::UnorderedBars(i));
        }
    }

    let weights = strategy.generate_target_weights(bars);
    let min_bars = strategy.min_history_bars();

    let mut broker = PaperBroker::new(
        &config.symbol,
        config.initial_cash,
        CostModel::new(config.slippage_bps, config.commission_rate),
    );
    let mut equity_curve = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        // ─── Phase 1: degraded close ───
        if !bar.has_valid_close() {
            equity_curve.push(equity_curve.last().copied().unwrap_or(0.0));
            continue;
        }

        // ─── Phase 2: intrabar stops ───
        if let Some(stops) = &config.stops {
            if let Some(exit_price) =
                intrabar_stop_exit(broker.portfolio(), &config.symbol, stops, bar)
            {
                broker.close_position(exit_price);
            }
        }

        // ─── Phase 3: rebalance ───
        if i + 1 >= min_bars {
            let requested = weights.get(&bar.timestamp).copied().unwrap_or(0.0);
            let effective = match overlay {
                Some(overlay) => {
                    overlay.adjust_weight(broker.portfolio(), &config.symbol, bar.close, requested)
                }
                None => requested,
            };
            broker.rebalance_to_target_weight(effective, bar.close);
        }

        // ─── Phase 4: record equity ───
        equity_curve.push(broker.equity(bar.close));
    }

    let final_equity = equity_curve.last().copied().unwrap_or(config.initial_cash);
    let first_equity = equity_curve.first().copied().unwrap_or(config.initial_cash);
    let return_total = if first_equity != 0.0 {
        final_equity / first_equity - 1.0
    } else {
        0.0
    };

    Ok(RunResult {
        equity_curve,
        fills: broker.into_fills(),
        final_equity,
        return_total,
    })
}

/// Check the bar's intrabar extremes against the stop thresholds.
///
/// Returns the exact threshold price to exit at, or None. Stop-loss is
/// checked first so it wins the same-bar tie against take-profit. Non-finite
/// extremes never trigger.
fn intrabar_stop_exit(
    portfolio: &Portfolio,
    symbol: &str,
    stops: &StopConfig,
    bar: &Bar,
) -> Option<f64> {
    let position = portfolio.position(symbol).filter(|p| !p.is_flat())?;
    let avg_price = position.average_price;
    if !avg_price.is_finite() || avg_price <= 0.0 {
        return None;
    }
    let long = position.is_long();

    if let Some(pct) = stops.stop_loss_pct {
        let threshold = if long {
            avg_price * (1.0 - pct)
        } else {
            avg_price * (1.0 + pct)
        };
        let touched = if long {
            bar.low.is_finite() && bar.low <= threshold
        } else {
            bar.high.is_finite() && bar.high >= threshold
        };
        if touched && threshold > 0.0 {
            return Some(threshold);
        }
    }

    if let Some(pct) = stops.take_profit_pct {
        let threshold = if long {
            avg_price * (1.0 + pct)
        } else {
            avg_price * (1.0 - pct)
        };
        let touched = if long {
            bar.high.is_finite() && bar.high >= threshold
        } else {
            bar.low.is_finite() && bar.low <= threshold
        };
        if touched && threshold > 0.0 {
            return Some(threshold);
        }
    }

    None
}
