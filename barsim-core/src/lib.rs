//! BarSim Core — the single-instrument simulation engine.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, fills, positions, portfolio)
//! - Paper broker with slippage/commission cost model
//! - Risk overlay (stop-loss / take-profit weight adjustment)
//! - Bar-by-bar simulation loop with intrabar stop detection
//! - Strategy trait and the SMA crossover reference strategy
//! - Rolling-average indicators

pub mod broker;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod risk;
pub mod strategy;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all core types are Send + Sync, so a caller may
    /// move a simulation run onto a worker thread.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Fill>();
        require_sync::<domain::Fill>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();
        require_send::<domain::Portfolio>();
        require_sync::<domain::Portfolio>();

        require_send::<broker::PaperBroker>();
        require_sync::<broker::PaperBroker>();
        require_send::<risk::StopConfig>();
        require_sync::<risk::StopConfig>();
        require_send::<engine::EngineConfig>();
        require_sync::<engine::EngineConfig>();
        require_send::<engine::RunResult>();
        require_sync::<engine::RunResult>();
    }
}
