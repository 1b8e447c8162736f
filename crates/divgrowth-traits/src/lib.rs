#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/divgrowth/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the divgrowth dividend-history engine.
//!
//! This crate provides the value objects every other crate passes around:
//! corporate-action events, their split-adjusted restatement, yearly totals
//! and the policy switches that select between dividend conventions.

/// The version of the divgrowth-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod policy;
pub mod series;
pub mod source;
pub mod types;

// Re-exports
pub use error::{DivgrowthError, Result};
pub use policy::{AmountTier, CagrBase, YieldConvention};
pub use series::YearlySeries;
pub use source::EventSource;
pub use types::{AdjustedDividendEvent, Date, DividendEvent, SecurityHistory, SplitEvent, Symbol};
