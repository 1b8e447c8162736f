//! Snapshot loading for the divgrowth CLI.
//!
//! A snapshot is a JSON export of the external store:
//!
//! ```json
//! { "securities": [ { "symbol": "ITC.NS", "current_price": 450.0,
//!     "dividends": [ { "ex_date": "2023-06-01", "amount": 6.75, "close_price": 430.0 } ],
//!     "splits": [ { "ex_date": "2016-07-01", "numerator": 3, "denominator": 2 } ] } ] }
//! ```
//!
//! Incomplete records are dropped here so the engine only ever sees
//! validated events.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use divgrowth::traits::{DivgrowthError, Result};
use divgrowth::{DividendEvent, EventSource, SecurityHistory, SplitEvent};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    securities: Vec<RawSecurity>,
}

#[derive(Debug, Deserialize)]
struct RawSecurity {
    symbol: String,
    #[serde(default)]
    current_price: Option<f64>,
    #[serde(default)]
    dividends: Vec<RawDividend>,
    #[serde(default)]
    splits: Vec<RawSplit>,
}

#[derive(Debug, Deserialize)]
struct RawDividend {
    #[serde(default)]
    ex_date: Option<String>,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    close_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSplit {
    #[serde(default)]
    ex_date: Option<String>,
    #[serde(default)]
    numerator: Option<f64>,
    #[serde(default)]
    denominator: Option<f64>,
}

/// Securities loaded from a snapshot file.
#[derive(Debug, Default)]
pub(crate) struct SnapshotSource {
    securities: Vec<SecurityHistory>,
}

impl SnapshotSource {
    /// Read and validate a snapshot file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let source = Self::from_json(&text)?;
        debug!(
            path = %path.display(),
            securities = source.len(),
            "loaded snapshot"
        );
        Ok(source)
    }

    /// Parse and validate snapshot JSON.
    pub(crate) fn from_json(text: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(text)?;
        let mut seen = HashSet::new();
        let mut securities = Vec::with_capacity(snapshot.securities.len());
        for raw in snapshot.securities {
            if !seen.insert(raw.symbol.to_ascii_uppercase()) {
                debug!(symbol = %raw.symbol, "duplicate security dropped");
                continue;
            }
            securities.push(convert_security(raw));
        }
        Ok(Self { securities })
    }

    /// Number of securities in the snapshot.
    pub(crate) const fn len(&self) -> usize {
        self.securities.len()
    }
}

impl EventSource for SnapshotSource {
    fn securities(&self) -> Result<Vec<SecurityHistory>> {
        Ok(self.securities.clone())
    }

    fn security(&self, symbol: &str) -> Result<SecurityHistory> {
        self.securities
            .iter()
            .find(|s| s.symbol.eq_ignore_ascii_case(symbol))
            .cloned()
            .ok_or_else(|| DivgrowthError::SymbolNotFound(symbol.to_string()))
    }
}

fn convert_security(raw: RawSecurity) -> SecurityHistory {
    let symbol = raw.symbol;
    let mut history = SecurityHistory::new(symbol.clone());
    history.current_price = raw.current_price.filter(|p| p.is_finite());

    let mut dates = HashSet::new();
    for dividend in raw.dividends {
        match convert_dividend(&symbol, dividend) {
            Ok(event) if dates.insert(event.ex_date) => history.dividends.push(event),
            Ok(event) => debug!(%symbol, ex_date = %event.ex_date, "duplicate dividend dropped"),
            Err(e) => debug!(%symbol, error = %e, "malformed dividend dropped"),
        }
    }

    let mut dates = HashSet::new();
    for split in raw.splits {
        match convert_split(&symbol, split) {
            Ok(event) if dates.insert(event.ex_date) => history.splits.push(event),
            Ok(event) => debug!(%symbol, ex_date = %event.ex_date, "duplicate split dropped"),
            Err(e) => debug!(%symbol, error = %e, "malformed split dropped"),
        }
    }

    history
}

fn convert_dividend(symbol: &str, raw: RawDividend) -> Result<DividendEvent> {
    let ex_date = parse_date(raw.ex_date.as_deref().ok_or("missing ex_date")?)?;
    let amount = raw
        .amount
        .filter(|a| a.is_finite())
        .ok_or_else(|| DivgrowthError::InvalidData(format!("missing amount on {ex_date}")))?;
    let mut event = DividendEvent::new(symbol, ex_date, amount);
    event.close_price = raw.close_price.filter(|p| p.is_finite());
    Ok(event)
}

fn convert_split(symbol: &str, raw: RawSplit) -> Result<SplitEvent> {
    let ex_date = parse_date(raw.ex_date.as_deref().ok_or("missing ex_date")?)?;
    let (Some(numerator), Some(denominator)) = (raw.numerator, raw.denominator) else {
        return Err(DivgrowthError::InvalidData(format!(
            "missing split ratio on {ex_date}"
        )));
    };
    SplitEvent::new(symbol, ex_date, numerator, denominator)
}

/// Parse a date string in YYYY-MM-DD format.
pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| DivgrowthError::InvalidDate(format!("{date_str}: {e}")))
}
