//! Engine configuration and run result types.

use crate::domain::Fill;
use crate::risk::StopConfig;
use serde::{Deserialize, Serialize};

/// Configuration for a single simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub symbol: String,
    pub initial_cash: f64,
    /// Slippage in basis points, always adverse to the order side.
    pub slippage_bps: f64,
    /// Commission as a fraction of notional, debited on both sides.
    pub commission_rate: f64,
    /// Intrabar stop thresholds. None disables intrabar stop detection.
    pub stops: Option<StopConfig>,
}

impl EngineConfig {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            initial_cash: 100_000.0,
            slippage_bps: 1.0,
            commission_rate: 0.0005,
            stops: None,
        }
    }

    /// Zero slippage, zero commission — for tests and baselines.
    pub fn frictionless(symbol: &str) -> Self {
        Self {
            slippage_bps: 0.0,
            commission_rate: 0.0,
            ..Self::new(symbol)
        }
    }

    pub fn with_stops(mut self, stops: StopConfig) -> Self {
        self.stops = if stops.is_empty() { None } else { Some(stops) };
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new("TEST")
    }
}

/// Result of a complete simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Equity at each bar close, aligned 1:1 with the input bars.
    pub equity_curve: Vec<f64>,
    /// All fills generated during the run, in execution order.
    pub fills: Vec<Fill>,
    /// Equity at the final bar.
    pub final_equity: f64,
    /// Total return over the run: final / first recorded equity - 1.
    pub return_total: f64,
}

impl RunResult {
    pub fn fill_count(&self) -> usize {
        self.fills.len()
    }
}
