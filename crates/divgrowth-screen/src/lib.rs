//! Screening of dividend-paying securities.
//!
//! This crate runs the adjustment and metric pipeline over a batch of
//! securities and keeps the ones that pass:
//! - Numeric thresholds on yield, CAGR and year-over-year counts
//! - An optional filter expression in a small whitelisted language
//!
//! A failing expression never aborts a batch; the affected security is
//! excluded and reported as a [`ScreenWarning`].
//!
//! # Example
//!
//! ```rust
//! use divgrowth_screen::{ScreenConfig, ScreenCriteria, screen};
//! use divgrowth_traits::{Date, SecurityHistory};
//!
//! let d = |y| Date::from_ymd_opt(y, 6, 1).unwrap();
//! let history = SecurityHistory::new("KO")
//!     .with_dividend(d(2021), 1.00, Some(60.0))
//!     .with_dividend(d(2022), 1.10, Some(60.0))
//!     .with_dividend(d(2023), 1.20, Some(60.0));
//!
//! let config = ScreenConfig {
//!     criteria: ScreenCriteria {
//!         min_years_up: Some(2),
//!         ..Default::default()
//!     },
//!     condition: Some("yield > 1.5 and stopped == 0".to_string()),
//!     ..Default::default()
//! };
//! let outcome = screen(&[history], config);
//! assert_eq!(outcome.results.len(), 1);
//! ```

pub mod criteria;
pub mod expr;
pub mod screener;
pub mod stats;

// Re-export main types
pub use criteria::{Rejection, ScreenCriteria};
pub use expr::{Expression, ExpressionError, Value, Variables};
pub use screener::{
    ScreenConfig, ScreenOutcome, ScreenWarning, Screener, ScreeningResult, SortKey, screen,
    screening_variables,
};
pub use stats::{SecurityStats, security_stats};
