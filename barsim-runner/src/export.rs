//! Result artifact export: equity curve CSV and summary JSON.

use crate::metrics::PerformanceSummary;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors from writing result artifacts.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),

    #[error("equity curve has {equity} points but {timestamps} timestamps")]
    LengthMismatch { timestamps: usize, equity: usize },
}

/// Write the equity curve as a two-column CSV: timestamp,equity.
pub fn write_equity_csv(
    path: impl AsRef<Path>,
    timestamps: &[DateTime<Utc>],
    equity: &[f64],
) -> Result<(), ExportError> {
    if timestamps.len() != equity.len() {
        return Err(ExportError::LengthMismatch {
            timestamps: timestamps.len(),
            equity: equity.len(),
        });
    }

    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record(["timestamp", "equity"])?;
    for (ts, eq) in timestamps.iter().zip(equity) {
        writer.write_record([ts.to_rfc3339(), format!("{eq:.2}")])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the performance summary as pretty-printed JSON.
pub fn write_summary_json(
    path: impl AsRef<Path>,
    summary: &PerformanceSummary,
) -> Result<(), ExportError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn equity_csv_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("equity.csv");
        write_equity_csv(&path, &[ts(2), ts(3)], &[100_000.0, 100_250.5]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "timestamp,equity");
        assert!(lines[1].starts_with("2024-01-02"));
        assert!(lines[1].ends_with("100000.00"));
        assert!(lines[2].ends_with("100250.50"));
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("equity.csv");
        let err = write_equity_csv(&path, &[ts(2)], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            ExportError::LengthMismatch {
                timestamps: 1,
                equity: 2
            }
        ));
    }

    #[test]
    fn summary_json_is_readable_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let summary = PerformanceSummary {
            final_equity: 105_000.0,
            total_return: 0.05,
            annual_return: 0.12,
            sharpe: 1.4,
            max_drawdown: -0.08,
        };
        write_summary_json(&path, &summary).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: PerformanceSummary = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.final_equity, 105_000.0);
        assert_eq!(parsed.max_drawdown, -0.08);
    }
}
