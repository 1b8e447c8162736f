//! Yearly dividend totals.
//!
//! Growth and classification metrics operate on one total per calendar year.
//! A year with no recorded event that lies between the first and last year
//! of the series is a year in which nothing was paid, so [`YearlySeries`]
//! always materializes it as `0.0`. Years outside the observed range are
//! never invented.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::policy::AmountTier;
use crate::types::AdjustedDividendEvent;

/// Per-year totals of one amount tier, gap-filled and ordered by year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearlySeries {
    totals: BTreeMap<i32, f64>,
    counts: BTreeMap<i32, usize>,
}

impl YearlySeries {
    /// Aggregates adjusted events by calendar year.
    ///
    /// Events in `as_of_year` or later are excluded so that a partially
    /// elapsed year never distorts growth figures. With `as_of_year = None`
    /// every year is treated as complete.
    pub fn from_events(
        events: &[AdjustedDividendEvent],
        tier: AmountTier,
        as_of_year: Option<i32>,
    ) -> Self {
        let mut series = Self::default();
        for event in events {
            let year = event.year();
            if as_of_year.is_some_and(|current| year >= current) {
                continue;
            }
            *series.totals.entry(year).or_insert(0.0) += event.amount(tier);
            *series.counts.entry(year).or_insert(0) += 1;
        }
        series.fill_gaps();
        series
    }

    /// Builds a series from `(year, total)` pairs. Repeated years are summed.
    pub fn from_totals<I>(totals: I) -> Self
    where
        I: IntoIterator<Item = (i32, f64)>,
    {
        let mut series = Self::default();
        for (year, total) in totals {
            *series.totals.entry(year).or_insert(0.0) += total;
            *series.counts.entry(year).or_insert(0) += 1;
        }
        series.fill_gaps();
        series
    }

    fn fill_gaps(&mut self) {
        let (Some(first), Some(last)) = (self.first_year(), self.last_year()) else {
            return;
        };
        for year in first..=last {
            self.totals.entry(year).or_insert(0.0);
            self.counts.entry(year).or_insert(0);
        }
    }

    /// Earliest year in the series.
    pub fn first_year(&self) -> Option<i32> {
        self.totals.keys().next().copied()
    }

    /// Latest year in the series.
    pub fn last_year(&self) -> Option<i32> {
        self.totals.keys().next_back().copied()
    }

    /// Total for `year`, if the year lies inside the series.
    pub fn get(&self, year: i32) -> Option<f64> {
        self.totals.get(&year).copied()
    }

    /// Number of events recorded in `year` (0 for gap years).
    pub fn count(&self, year: i32) -> usize {
        self.counts.get(&year).copied().unwrap_or(0)
    }

    /// Years that were materialized because no event was recorded.
    pub fn gap_years(&self) -> Vec<i32> {
        self.counts
            .iter()
            .filter(|&(_, &count)| count == 0)
            .map(|(&year, _)| year)
            .collect()
    }

    /// Number of years in the series, gap years included.
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Whether the series holds no years.
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Totals in ascending year order.
    pub fn values(&self) -> Vec<f64> {
        self.totals.values().copied().collect()
    }

    /// `(year, total)` pairs in ascending year order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (i32, f64)> + '_ {
        self.totals.iter().map(|(&year, &total)| (year, total))
    }

    /// `(year, total)` pairs from `year` onwards.
    pub fn since(&self, year: i32) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.totals.range(year..).map(|(&y, &total)| (y, total))
    }
}
