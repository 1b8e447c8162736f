//! Year-over-year payout classification.

use divgrowth_traits::YearlySeries;
use serde::{Deserialize, Serialize};

/// Tolerance absorbing summation noise in currency amounts.
pub const CLASSIFY_EPSILON: f64 = 1e-6;

/// Counts of consecutive-year transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearClassification {
    /// Total rose above the previous year.
    pub up: usize,
    /// Total unchanged from the previous year.
    pub stalled: usize,
    /// Total fell but stayed positive.
    pub reduced: usize,
    /// Nothing paid.
    pub stopped: usize,
}

impl YearClassification {
    /// Counts as an `(up, stalled, reduced, stopped)` tuple.
    pub const fn as_tuple(&self) -> (usize, usize, usize, usize) {
        (self.up, self.stalled, self.reduced, self.stopped)
    }

    /// Number of transitions classified.
    pub const fn transitions(&self) -> usize {
        self.up + self.stalled + self.reduced + self.stopped
    }
}

/// Classifies each consecutive pair of `totals` taken as-is.
///
/// The slice is assumed to already contain one entry per year; use
/// [`classify`] for a series that may have missing years.
pub fn classify_years(totals: &[f64]) -> YearClassification {
    let mut counts = YearClassification::default();
    for pair in totals.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        if cur < CLASSIFY_EPSILON {
            counts.stopped += 1;
        } else if cur > prev + CLASSIFY_EPSILON {
            counts.up += 1;
        } else if (cur - prev).abs() < CLASSIFY_EPSILON {
            counts.stalled += 1;
        } else {
            counts.reduced += 1;
        }
    }
    counts
}

/// Classifies a gap-filled yearly series.
pub fn classify(series: &YearlySeries) -> YearClassification {
    classify_years(&series.values())
}
