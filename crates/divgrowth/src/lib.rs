#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/divgrowth/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # divgrowth
//!
//! divgrowth is an umbrella crate that re-exports all divgrowth sub-crates for
//! convenience.
//!
//! ## Quick Start
//!
//! ```
//! use divgrowth::prelude::*;
//!
//! # fn main() -> divgrowth::Result<()> {
//! let d = |y, m, day| Date::from_ymd_opt(y, m, day).unwrap();
//! let history = SecurityHistory::new("ITC.NS")
//!     .with_current_price(450.0)
//!     .with_dividend(d(2021, 6, 1), 5.75, Some(210.0))
//!     .with_dividend(d(2022, 6, 1), 6.25, Some(260.0))
//!     .with_dividend(d(2023, 6, 1), 6.75, Some(430.0))
//!     .with_split(d(2016, 7, 1), 3.0, 2.0)?;
//!
//! let stats = security_stats(&history, &MetricsConfig::default()).unwrap();
//! assert_eq!(stats.metrics.years.up, 2);
//!
//! let outcome = screen(&[history], ScreenConfig::default());
//! assert_eq!(outcome.results.len(), 1);
//! # Ok(())
//! # }
//! ```

/// The version of the divgrowth crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core Types
// ============================================================================

/// Event types, yearly series, policies and errors.
pub mod traits {
    pub use divgrowth_traits::*;
}

pub use divgrowth_traits::{
    AdjustedDividendEvent, Date, DividendEvent, EventSource, SecurityHistory, SplitEvent, Symbol,
    YearlySeries,
};
pub use divgrowth_traits::{AmountTier, CagrBase, YieldConvention};
pub use divgrowth_traits::{DivgrowthError, Result};

// ============================================================================
// Split Adjustment
// ============================================================================

/// Split adjustment.
///
/// Vendors report historical dividends divided by every later split. The
/// adjuster reverses that and restates each event for one original share:
///
/// ```text
/// raw_amount     = vendor_amount * product(splits after ex_date)
/// accrued_amount = raw_amount    * product(splits on or before ex_date)
/// ```
pub mod adjust {
    pub use divgrowth_adjust::*;
}

// ============================================================================
// Metrics
// ============================================================================

/// Yield, CAGR and year-over-year classification.
///
/// ## CAGR
///
/// ```text
/// CAGR = ((last / first) ^ (1 / years) - 1) * 100
/// ```
///
/// Windowed CAGR measures from the first positive year inside the window, so
/// a security that started paying mid-window is measured from its first
/// payment.
///
/// ## Classification
///
/// Each pair of consecutive years is one of:
///
/// - **up**: total rose by more than `1e-6`
/// - **stalled**: total within `1e-6` of the previous year
/// - **reduced**: total fell but stayed positive
/// - **stopped**: nothing paid
pub mod metrics {
    pub use divgrowth_metrics::*;
}

// ============================================================================
// Screening
// ============================================================================

/// Threshold criteria, filter expressions and batch screening.
///
/// Filter expressions see these variables:
///
/// | Variable | Alias | Meaning |
/// |----------|-------|---------|
/// | `up` | `years_up` | up years |
/// | `stalled` | `years_stalled` | stalled years |
/// | `reduced` | `years_reduced` | reduced years |
/// | `stopped` | `years_stopped` | stopped years |
/// | `yield` | `avg_yield` | dividend yield, percent |
/// | `cagr` | `cagr_overall` | overall CAGR, percent |
/// | `c3` .. `c30` | | windowed CAGR, percent |
/// | `price` | | current price |
/// | `shares` | | product of every split |
///
/// Undefined values are bound as `0`.
pub mod screen {
    pub use divgrowth_screen::*;
}

pub use divgrowth_screen::{
    ScreenConfig, ScreenCriteria, ScreenOutcome, Screener, ScreeningResult, SecurityStats,
    SortKey, screen, security_stats,
};

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```
/// use divgrowth::prelude::*;
/// ```
///
/// This brings into scope the event types, policies, metric and screening
/// entry points, and [`Result`]/[`DivgrowthError`].
pub mod prelude {
    pub use crate::metrics::{CagrHorizon, MetricSet, MetricsConfig, MetricsEngine};
    pub use crate::screen::{Expression, Variables};
    pub use crate::{
        AdjustedDividendEvent, AmountTier, CagrBase, Date, DividendEvent, EventSource,
        SecurityHistory, SplitEvent, Symbol, YearlySeries, YieldConvention,
    };
    pub use crate::{DivgrowthError, Result};
    pub use crate::{
        ScreenConfig, ScreenCriteria, ScreenOutcome, Screener, ScreeningResult, SecurityStats,
        SortKey, screen, security_stats,
    };
}

// ============================================================================
// Tests
// ============================================================================
