//! Deterministic synthetic bar generation.
//!
//! Geometric Brownian motion closes with a small intraday band for high/low.
//! The per-symbol RNG seed is derived from the master seed via BLAKE3, so the
//! same (seed, symbol, params) always produces identical bars.

use barsim_core::domain::Bar;
use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Trading days per year used to scale drift and volatility.
const PERIODS_PER_YEAR: f64 = 252.0;

/// Parameters for the GBM generator. Drift and volatility are annualized.
#[derive(Debug, Clone)]
pub struct GbmParams {
    pub start_price: f64,
    pub periods: usize,
    pub drift: f64,
    pub volatility: f64,
    pub seed: u64,
}

impl Default for GbmParams {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            periods: 1000,
            drift: 0.07,
            volatility: 0.20,
            seed: 42,
        }
    }
}

/// Generate daily bars for `symbol` via geometric Brownian motion.
pub fn generate_gbm(symbol: &str, params: &GbmParams) -> Vec<Bar> {
    let mut rng = StdRng::from_seed(derive_seed(params.seed, symbol));

    let dt = 1.0 / PERIODS_PER_YEAR;
    let shock_mean = (params.drift - 0.5 * params.volatility * params.volatility) * dt;
    let shock_std = params.volatility * dt.sqrt();

    let start = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
    let mut bars = Vec::with_capacity(params.periods);
    let mut log_price = params.start_price.ln();
    let mut prev_close = params.start_price;

    for i in 0..params.periods {
        log_price += shock_mean + shock_std * standard_normal(&mut rng);
        let close = log_price.exp();
        let open = prev_close;

        // High/low as a noise band around the open/close envelope.
        let intraday_std = close * params.volatility / PERIODS_PER_YEAR.sqrt();
        let band = standard_normal(&mut rng).abs() * 0.25 * intraday_std;
        let high = open.max(close) + band;
        let low = (open.min(close) - band).max(0.0);

        // Log-normal volume around e^12 shares.
        let volume = (12.0 + 0.5 * standard_normal(&mut rng)).exp();

        bars.push(Bar {
            timestamp: start + Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume,
        });
        prev_close = close;
    }

    bars
}

/// Derive a 32-byte RNG seed from the master seed and symbol name.
fn derive_seed(master_seed: u64, symbol: &str) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&master_seed.to_le_bytes());
    hasher.update(symbol.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Standard normal sample via Box-Muller.
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}
