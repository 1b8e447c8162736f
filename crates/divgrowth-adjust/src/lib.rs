//! Split adjustment for dividend histories.
//!
//! This crate converts a vendor-reported dividend series and a split schedule
//! into three parallel amount tiers: vendor-reported, raw as-paid, and
//! forward-accrued for one original share.
//!
//! # Examples
//!
//! ```rust
//! use divgrowth_adjust::{SplitSchedule, adjust};
//! use divgrowth_traits::{Date, DividendEvent, SplitEvent};
//!
//! let d = |y, m, day| Date::from_ymd_opt(y, m, day).unwrap();
//! let splits = vec![SplitEvent::new("X", d(2019, 6, 1), 2.0, 1.0).unwrap()];
//! let events = vec![
//!     DividendEvent::new("X", d(2018, 6, 1), 5.0),
//!     DividendEvent::new("X", d(2020, 6, 1), 12.0),
//! ];
//!
//! let adjusted = adjust(&events, &splits);
//! assert_eq!(adjusted[1].accrued_amount, 24.0);
//! assert_eq!(SplitSchedule::new(&splits).total_multiplier(), 2.0);
//! ```

mod adjuster;
mod schedule;

// Re-export main types
pub use adjuster::{SplitAdjuster, adjust};
pub use schedule::SplitSchedule;
