//! BarSim Runner — everything around the engine: data in, metrics and
//! artifacts out.
//!
//! - CSV OHLCV ingestion with forgiving header mapping
//! - Deterministic synthetic bar generation (geometric Brownian motion)
//! - Performance metrics over equity curves
//! - Result artifact export (equity CSV, summary JSON)

pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod synthetic;

pub use data_loader::{load_csv, LoadError};
pub use export::{write_equity_csv, write_summary_json, ExportError};
pub use metrics::PerformanceSummary;
pub use synthetic::{generate_gbm, GbmParams};
