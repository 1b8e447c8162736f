//! Corporate-action event types.
//!
//! Three amount tiers describe the same dividend:
//!
//! - **vendor**: the amount as reported by the data vendor, which divides
//!   historical payouts by every split that happened after the ex-date
//!   (backward adjustment).
//! - **raw**: the amount actually paid per share outstanding on the ex-date.
//! - **accrued**: the amount received by one original share held since
//!   before the earliest split.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::{DivgrowthError, Result};
use crate::policy::AmountTier;

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A security identifier, typically a vendor ticker such as `"INFY.NS"`.
pub type Symbol = String;

/// One declared payout for one security on one ex-date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendEvent {
    /// Security the payout belongs to.
    pub security_id: Symbol,
    /// Ex-dividend date, unique per security.
    pub ex_date: Date,
    /// Amount per share as reported by the vendor.
    pub vendor_amount: f64,
    /// Close price on the ex-date, in the vendor's adjustment convention.
    pub close_price: Option<f64>,
}

impl DividendEvent {
    /// Creates a dividend event without a close price.
    pub fn new(security_id: impl Into<Symbol>, ex_date: Date, vendor_amount: f64) -> Self {
        Self {
            security_id: security_id.into(),
            ex_date,
            vendor_amount,
            close_price: None,
        }
    }

    /// Attaches the ex-date close price.
    #[must_use]
    pub fn with_close_price(mut self, close_price: f64) -> Self {
        self.close_price = Some(close_price);
        self
    }

    /// Calendar year of the ex-date.
    pub fn year(&self) -> i32 {
        self.ex_date.year()
    }
}

/// One declared forward split or bonus issue.
///
/// The ratio is `numerator / denominator`; a 2-for-1 split is `2/1`, a
/// 1-for-5 reverse split is `1/5`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitEvent {
    /// Security the split belongs to.
    pub security_id: Symbol,
    /// Date the split takes effect.
    pub ex_date: Date,
    /// Shares after the split.
    pub numerator: f64,
    /// Shares before the split.
    pub denominator: f64,
}

impl SplitEvent {
    /// Creates a split event, rejecting non-positive or non-finite ratios.
    ///
    /// # Errors
    ///
    /// Returns [`DivgrowthError::InvalidData`] if either side of the ratio is
    /// not a finite positive number.
    pub fn new(
        security_id: impl Into<Symbol>,
        ex_date: Date,
        numerator: f64,
        denominator: f64,
    ) -> Result<Self> {
        let security_id = security_id.into();
        let valid = |x: f64| x.is_finite() && x > 0.0;
        if !valid(numerator) || !valid(denominator) {
            return Err(DivgrowthError::InvalidData(format!(
                "split {security_id} on {ex_date} has ratio {numerator}/{denominator}"
            )));
        }
        Ok(Self {
            security_id,
            ex_date,
            numerator,
            denominator,
        })
    }

    /// Share multiplier applied by this split.
    pub fn ratio(&self) -> f64 {
        self.numerator / self.denominator
    }
}

/// A dividend event restated in all three amount tiers.
///
/// Invariants:
/// - `raw_amount = vendor_amount * (product of split ratios strictly after ex_date)`
/// - `shares_at_time = product of split ratios on or before ex_date`
/// - `accrued_amount = raw_amount * shares_at_time`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedDividendEvent {
    /// Security the payout belongs to.
    pub security_id: Symbol,
    /// Ex-dividend date.
    pub ex_date: Date,
    /// Amount per share as reported by the vendor.
    pub vendor_amount: f64,
    /// Vendor close price on the ex-date.
    pub close_price: Option<f64>,
    /// Amount actually paid per share outstanding at the time.
    pub raw_amount: f64,
    /// Amount received by one original share.
    pub accrued_amount: f64,
    /// Shares one original share had become by the ex-date.
    pub shares_at_time: f64,
    /// Close price in the same as-paid convention as `raw_amount`.
    pub raw_price: Option<f64>,
}

impl AdjustedDividendEvent {
    /// Calendar year of the ex-date.
    pub fn year(&self) -> i32 {
        self.ex_date.year()
    }

    /// Amount in the requested tier.
    pub const fn amount(&self, tier: AmountTier) -> f64 {
        match tier {
            AmountTier::Vendor => self.vendor_amount,
            AmountTier::Raw => self.raw_amount,
            AmountTier::Accrued => self.accrued_amount,
        }
    }
}

/// Everything the engine needs about one security.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityHistory {
    /// Security identifier.
    pub symbol: Symbol,
    /// Declared dividends, any order.
    pub dividends: Vec<DividendEvent>,
    /// Declared splits, any order.
    pub splits: Vec<SplitEvent>,
    /// Latest market price, if known.
    pub current_price: Option<f64>,
}

impl SecurityHistory {
    /// Creates an empty history for `symbol`.
    pub fn new(symbol: impl Into<Symbol>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    /// Sets the current market price.
    #[must_use]
    pub fn with_current_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }

    /// Appends a dividend for this security.
    #[must_use]
    pub fn with_dividend(mut self, ex_date: Date, amount: f64, close_price: Option<f64>) -> Self {
        let mut event = DividendEvent::new(self.symbol.clone(), ex_date, amount);
        event.close_price = close_price;
        self.dividends.push(event);
        self
    }

    /// Appends a split for this security.
    ///
    /// # Errors
    ///
    /// Propagates [`SplitEvent::new`] validation failures.
    pub fn with_split(mut self, ex_date: Date, numerator: f64, denominator: f64) -> Result<Self> {
        let split = SplitEvent::new(self.symbol.clone(), ex_date, numerator, denominator)?;
        self.splits.push(split);
        Ok(self)
    }
}
