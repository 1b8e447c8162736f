//! Compound annual growth rate of yearly dividend totals.

use std::collections::BTreeMap;
use std::fmt;

use divgrowth_traits::{CagrBase, YearlySeries};
use serde::{Deserialize, Serialize};

/// Compound annual growth rate in percent.
///
/// Returns `0.0` when `years <= 0` or `first <= 0`.
pub fn cagr(first: f64, last: f64, years: i32) -> f64 {
    if years <= 0 || first <= 0.0 {
        return 0.0;
    }
    ((last / first).powf(1.0 / f64::from(years)) - 1.0) * 100.0
}

/// CAGR over the trailing `window_years` of a gap-filled yearly series.
///
/// With [`CagrBase::FirstPositive`] the base is the first strictly positive
/// total at or after `last_year - window_years`, so leading zero years are
/// skipped rather than divided by. With [`CagrBase::WindowStart`] the base is
/// the total at exactly `last_year - window_years`, and the window must lie
/// inside the series.
///
/// Returns `None` for a series with fewer than two years, a window holding
/// fewer than two years, or no usable base.
pub fn cagr_for_window(series: &YearlySeries, window_years: u32, base: CagrBase) -> Option<f64> {
    if series.len() < 2 || window_years == 0 {
        return None;
    }
    let last_year = series.last_year()?;
    let last_value = series.get(last_year)?;
    let start_year = last_year.checked_sub(i32::try_from(window_years).ok()?)?;

    match base {
        CagrBase::FirstPositive => {
            let window: Vec<(i32, f64)> = series.since(start_year).collect();
            if window.len() < 2 {
                return None;
            }
            let &(first_year, first_value) = window.iter().find(|&&(_, total)| total > 0.0)?;
            let span = last_year - first_year;
            if span <= 0 {
                return None;
            }
            Some(cagr(first_value, last_value, span))
        }
        CagrBase::WindowStart => {
            let first_value = series.get(start_year)?;
            Some(cagr(first_value, last_value, last_year - start_year))
        }
    }
}

/// CAGR from the first to the last observed year.
pub fn overall_cagr(series: &YearlySeries, base: CagrBase) -> Option<f64> {
    let span = series.last_year()? - series.first_year()?;
    cagr_for_window(series, u32::try_from(span).ok()?, base)
}

/// Trailing windows reported alongside the overall CAGR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CagrHorizon {
    /// Trailing 3 years.
    Y3,
    /// Trailing 5 years.
    Y5,
    /// Trailing 10 years.
    Y10,
    /// Trailing 15 years.
    Y15,
    /// Trailing 20 years.
    Y20,
    /// Trailing 30 years.
    Y30,
}

impl CagrHorizon {
    /// Every horizon, shortest first.
    pub const ALL: [Self; 6] = [Self::Y3, Self::Y5, Self::Y10, Self::Y15, Self::Y20, Self::Y30];

    /// Window length in years.
    #[must_use]
    pub const fn years(&self) -> u32 {
        match self {
            Self::Y3 => 3,
            Self::Y5 => 5,
            Self::Y10 => 10,
            Self::Y15 => 15,
            Self::Y20 => 20,
            Self::Y30 => 30,
        }
    }

    /// Short name used in filter expressions (`c3`, `c5`, ...).
    #[must_use]
    pub const fn variable(&self) -> &'static str {
        match self {
            Self::Y3 => "c3",
            Self::Y5 => "c5",
            Self::Y10 => "c10",
            Self::Y15 => "c15",
            Self::Y20 => "c20",
            Self::Y30 => "c30",
        }
    }
}

impl fmt::Display for CagrHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Yr", self.years())
    }
}

/// Overall and windowed CAGRs of one security.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CagrSet {
    /// First to last observed year.
    pub overall: Option<f64>,
    /// Trailing windows; every [`CagrHorizon`] has an entry.
    pub windows: BTreeMap<CagrHorizon, Option<f64>>,
}

impl CagrSet {
    /// Computes every horizon over `series`.
    pub fn compute(series: &YearlySeries, base: CagrBase) -> Self {
        let windows = CagrHorizon::ALL
            .iter()
            .map(|&horizon| (horizon, cagr_for_window(series, horizon.years(), base)))
            .collect();
        Self {
            overall: overall_cagr(series, base),
            windows,
        }
    }

    /// CAGR for a trailing window, `None` if undefined.
    pub fn window(&self, horizon: CagrHorizon) -> Option<f64> {
        self.windows.get(&horizon).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cagr_basic() {
        assert_relative_eq!(cagr(10.0, 20.0, 1), 100.0);
        assert_relative_eq!(cagr(100.0, 121.0, 2), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cagr_guards() {
        assert_eq!(cagr(0.0, 100.0, 5), 0.0);
        assert_eq!(cagr(-1.0, 100.0, 5), 0.0);
        assert_eq!(cagr(100.0, 200.0, 0), 0.0);
        assert_eq!(cagr(100.0, 200.0, -3), 0.0);
    }

    #[test]
    fn test_window_single_point_is_undefined() {
        let series = YearlySeries::from_totals([(2020, 5.0)]);
        assert_eq!(cagr_for_window(&series, 3, CagrBase::FirstPositive), None);
        assert_eq!(cagr_for_window(&series, 3, CagrBase::WindowStart), None);
        assert_eq!(overall_cagr(&series, CagrBase::FirstPositive), None);
    }

    #[test]
    fn test_window_empty_series() {
        let series = YearlySeries::default();
        assert_eq!(cagr_for_window(&series, 5, CagrBase::FirstPositive), None);
        assert_eq!(overall_cagr(&series, CagrBase::FirstPositive), None);
    }

    #[test]
    fn test_window_restricts_to_trailing_years() {
        let series = YearlySeries::from_totals([
            (2015, 1.0),
            (2016, 2.0),
            (2017, 4.0),
            (2018, 100.0),
            (2019, 110.0),
            (2020, 121.0),
        ]);
        // 2018..=2020 under a 2-year window
        let c = cagr_for_window(&series, 2, CagrBase::FirstPositive).unwrap();
        assert_relative_eq!(c, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_window_skips_leading_zero_years() {
        let series = YearlySeries::from_totals([(2016, 0.0), (2017, 0.0), (2018, 10.0), (2019, 20.0)]);
        let c = cagr_for_window(&series, 3, CagrBase::FirstPositive).unwrap();
        assert_relative_eq!(c, 100.0);
        // The same window anchored at its start has a zero base.
        assert_eq!(cagr_for_window(&series, 3, CagrBase::WindowStart), Some(0.0));
    }

    #[test]
    fn test_window_with_no_positive_value() {
        let series = YearlySeries::from_totals([(2018, 0.0), (2019, 0.0)]);
        assert_eq!(cagr_for_window(&series, 5, CagrBase::FirstPositive), None);
    }

    #[test]
    fn test_window_positive_only_in_last_year() {
        let series = YearlySeries::from_totals([(2018, 0.0), (2019, 0.0), (2020, 3.0)]);
        assert_eq!(cagr_for_window(&series, 5, CagrBase::FirstPositive), None);
    }

    #[test]
    fn test_partial_window_uses_available_history() {
        let series = YearlySeries::from_totals([(2018, 10.0), (2019, 11.0), (2020, 12.1)]);
        let c = cagr_for_window(&series, 10, CagrBase::FirstPositive).unwrap();
        assert_relative_eq!(c, 10.0, epsilon = 1e-9);
        assert_eq!(cagr_for_window(&series, 10, CagrBase::WindowStart), None);
    }

    #[test]
    fn test_stopped_last_year_is_minus_hundred() {
        let series = YearlySeries::from_totals([(2018, 10.0), (2019, 0.0)]);
        assert_relative_eq!(overall_cagr(&series, CagrBase::FirstPositive).unwrap(), -100.0);
    }

    #[test]
    fn test_gap_year_changes_window() {
        // 2019 is missing and becomes a zero year.
        let series = YearlySeries::from_totals([(2017, 5.0), (2018, 5.0), (2020, 10.0), (2021, 20.0)]);
        assert_eq!(series.get(2019), Some(0.0));
        // Window starts at 2019 (zero) so the base moves to 2020.
        let c = cagr_for_window(&series, 2, CagrBase::FirstPositive).unwrap();
        assert_relative_eq!(c, 100.0);
    }

    #[test]
    fn test_window_never_panics_on_extremes() {
        let series = YearlySeries::from_totals([(i32::MIN + 1, 1.0), (i32::MIN + 2, 2.0)]);
        assert_eq!(cagr_for_window(&series, u32::MAX, CagrBase::FirstPositive), None);
        let _ = cagr_for_window(&series, 30, CagrBase::WindowStart);
    }

    #[test]
    fn test_cagr_set() {
        let series = YearlySeries::from_totals((2010..=2020).map(|y| (y, f64::from(y - 2009))));
        let set = CagrSet::compute(&series, CagrBase::FirstPositive);
        assert_eq!(set.windows.len(), CagrHorizon::ALL.len());
        assert!(set.overall.is_some());
        assert!(set.window(CagrHorizon::Y3).is_some());
        // 30-year window falls back to the first positive year.
        assert_eq!(set.window(CagrHorizon::Y30), set.overall);
    }

    #[test]
    fn test_horizon_names() {
        assert_eq!(CagrHorizon::Y10.years(), 10);
        assert_eq!(CagrHorizon::Y15.variable(), "c15");
        assert_eq!(CagrHorizon::Y5.to_string(), "5Yr");
    }
}
