//! Dividend metrics for divgrowth.
//!
//! This crate turns a split-adjusted dividend series into screening metrics:
//! - Dividend yield from as-paid amounts and prices
//! - Compound annual growth rate (CAGR) overall and over trailing windows
//! - Year-over-year classification into up, stalled, reduced and stopped years
//!
//! Every metric that can be undefined is an `Option`; nothing here panics or
//! returns an error for short or empty histories.
//!
//! # Example
//!
//! ```rust
//! use divgrowth_metrics::{cagr, classify_years, dividend_yield};
//!
//! assert_eq!(dividend_yield(5.0, 100.0), 5.0);
//! assert_eq!(cagr(10.0, 20.0, 1), 100.0);
//!
//! let years = classify_years(&[10.0, 12.0, 12.0, 8.0, 0.0, 5.0]);
//! assert_eq!(years.as_tuple(), (2, 1, 1, 1));
//! ```

pub mod classify;
pub mod engine;
pub mod growth;
pub mod yields;

// Re-export main types
pub use classify::{CLASSIFY_EPSILON, YearClassification, classify, classify_years};
pub use engine::{MetricSet, MetricsConfig, MetricsEngine};
pub use growth::{CagrHorizon, CagrSet, cagr, cagr_for_window, overall_cagr};
pub use yields::{dividend_yield, event_yield, security_yield};
