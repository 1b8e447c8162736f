//! Policy switches for the places where dividend conventions diverge.
//!
//! Data vendors and screeners disagree on which amounts feed growth metrics
//! and on how yield is averaged. Each convention is a named variant so that a
//! caller picks one explicitly.

use serde::{Deserialize, Serialize};

/// Which amount tier feeds yearly totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountTier {
    /// Amounts as reported by the vendor (backward-adjusted).
    Vendor,
    /// Amounts actually paid per share at the time.
    Raw,
    /// Payout attributable to one original share across all splits.
    #[default]
    Accrued,
}

/// How a security's dividend yield is summarized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldConvention {
    /// Sum of per-event yields in the last completed year of the series.
    #[default]
    TrailingYear,
    /// Mean of per-event yields over every completed-year event.
    AverageOfEvents,
}

/// Which year serves as the base of a windowed CAGR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CagrBase {
    /// First year inside the window with a strictly positive total.
    #[default]
    FirstPositive,
    /// Exactly `last_year - window`, whatever its total.
    WindowStart,
}
