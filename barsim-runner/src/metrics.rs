//! Performance metrics — pure functions over equity curves.
//!
//! Every metric is a pure function: equity curve in, scalar out. Degenerate
//! inputs (short curves, zero variance, non-positive equity) return 0.0.

use serde::{Deserialize, Serialize};

/// Trading periods per year for annualization.
const PERIODS_PER_YEAR: f64 = 252.0;

/// Aggregate performance statistics for a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub final_equity: f64,
    pub total_return: f64,
    pub annual_return: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
}

impl PerformanceSummary {
    /// Compute all metrics from an equity curve.
    pub fn compute(equity_curve: &[f64]) -> Self {
        Self {
            final_equity: equity_curve.last().copied().unwrap_or(0.0),
            total_return: total_return(equity_curve),
            annual_return: annualized_return(equity_curve),
            sharpe: sharpe_ratio(equity_curve, 0.0),
            max_drawdown: max_drawdown(equity_curve),
        }
    }
}

/// Per-bar simple returns; the first entry is 0 by convention.
pub fn returns(equity_curve: &[f64]) -> Vec<f64> {
    if equity_curve.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(equity_curve.len());
    out.push(0.0);
    for pair in equity_curve.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        out.push(if prev != 0.0 { cur / prev - 1.0 } else { 0.0 });
    }
    out
}

/// Total return as a fraction: final / initial - 1.
pub fn total_return(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let initial = equity_curve[0];
    let final_eq = equity_curve[equity_curve.len() - 1];
    if initial <= 0.0 {
        return 0.0;
    }
    final_eq / initial - 1.0
}

/// Geometric annualized return, assuming 252 periods per year.
pub fn annualized_return(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let initial = equity_curve[0];
    let final_eq = equity_curve[equity_curve.len() - 1];
    if initial <= 0.0 || final_eq <= 0.0 {
        return 0.0;
    }
    let years = (equity_curve.len() - 1) as f64 / PERIODS_PER_YEAR;
    if years <= 0.0 {
        return 0.0;
    }
    (final_eq / initial).powf(1.0 / years) - 1.0
}

/// Annualized Sharpe ratio from per-bar returns (population std).
pub fn sharpe_ratio(equity_curve: &[f64], risk_free_rate: f64) -> f64 {
    let rets = returns(equity_curve);
    if rets.len() < 2 {
        return 0.0;
    }
    let period_rf = risk_free_rate / PERIODS_PER_YEAR;
    let excess: Vec<f64> = rets.iter().map(|r| r - period_rf).collect();
    let mean = mean(&excess);
    let std = std_dev(&excess);
    if std < 1e-15 {
        return 0.0;
    }
    mean / std * PERIODS_PER_YEAR.sqrt()
}

/// Deepest peak-to-trough drawdown as a non-positive fraction.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let mut running_max = f64::MIN;
    let mut worst = 0.0_f64;
    for &eq in equity_curve {
        running_max = running_max.max(eq);
        if running_max > 0.0 {
            worst = worst.min(eq / running_max - 1.0);
        }
    }
    worst
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
