//! CSV OHLCV ingestion with forgiving header mapping.
//!
//! Accepted headers (case-insensitive): timestamp/datetime/date, open, high,
//! low, close/adj close/adj_close, volume/vol. Extra columns are ignored.
//! Missing open/high/low values fall back to the close; missing volume is 0.
//! Rows are sorted ascending by timestamp.

use barsim_core::domain::Bar;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::path::Path;
use thiserror::Error;

/// Errors from the CSV loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing a required '{0}' column")]
    MissingColumn(&'static str),

    #[error("unparseable timestamp '{value}' at row {row}")]
    BadTimestamp { row: usize, value: String },
}

/// Column indices resolved from the header row.
struct ColumnMap {
    timestamp: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: usize,
    volume: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let find = |names: &[&str]| -> Option<usize> {
            headers
                .iter()
                .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
        };

        let timestamp = find(&["timestamp", "datetime", "date"])
            .ok_or(LoadError::MissingColumn("timestamp"))?;
        let close = find(&["close", "adj close", "adj_close", "adjusted close"])
            .ok_or(LoadError::MissingColumn("close"))?;

        Ok(Self {
            timestamp,
            open: find(&["open"]),
            high: find(&["high"]),
            low: find(&["low"]),
            close,
            volume: find(&["volume", "vol"]),
        })
    }
}

/// Load OHLCV bars from a CSV file.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Bar>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;

    let columns = ColumnMap::resolve(reader.headers()?)?;

    let mut bars = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let raw_ts = record.get(columns.timestamp).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| LoadError::BadTimestamp {
            row: row + 2, // 1-based, after the header
            value: raw_ts.to_string(),
        })?;

        let close = parse_field(&record, Some(columns.close));
        let bar = Bar {
            timestamp,
            open: parse_field(&record, columns.open).or_nan(close),
            high: parse_field(&record, columns.high).or_nan(close),
            low: parse_field(&record, columns.low).or_nan(close),
            close,
            volume: parse_field(&record, columns.volume).or_nan(0.0),
        };
        bars.push(bar);
    }

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

/// Parse a numeric field; absent or unparseable values become NaN.
fn parse_field(record: &csv::StringRecord, index: Option<usize>) -> f64 {
    index
        .and_then(|i| record.get(i))
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

trait OrNan {
    fn or_nan(self, fallback: f64) -> f64;
}

impl OrNan for f64 {
    fn or_nan(self, fallback: f64) -> f64 {
        if self.is_nan() {
            fallback
        } else {
            self
        }
    }
}
