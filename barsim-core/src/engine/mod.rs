//! Simulation engine — bar-by-bar orchestration of stops, overlay, broker.
//!
//! Strict per-bar ordering:
//! 1. Degraded close (non-finite or non-positive): carry the previous
//!    recorded equity forward, portfolio untouched
//! 2. Intrabar stop detection against the bar's high/low, stop-loss first
//! 3. Warm-up-gated rebalance to the overlay-adjusted target weight
//! 4. Record equity at the close

pub mod loop_runner;
pub mod state;

pub use loop_runner::{run_backtest, EngineError};
pub use state::{EngineConfig, RunResult};
