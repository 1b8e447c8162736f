//! Numeric threshold predicates.

use std::collections::BTreeMap;
use std::fmt;

use divgrowth_metrics::{CagrHorizon, MetricSet};
use serde::{Deserialize, Serialize};

/// Threshold predicates applied to each security's [`MetricSet`].
///
/// Every threshold is optional and an unset one is not evaluated. Set
/// thresholds are AND-combined. A metric with no value fails any threshold
/// placed on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenCriteria {
    /// Screen only this symbol.
    pub symbol: Option<String>,
    /// Minimum dividend yield in percent.
    pub min_yield: Option<f64>,
    /// Maximum dividend yield in percent.
    pub max_yield: Option<f64>,
    /// Minimum overall CAGR in percent.
    pub min_cagr: Option<f64>,
    /// Minimum CAGR per trailing window, in percent.
    pub min_window_cagr: BTreeMap<CagrHorizon, f64>,
    /// Minimum number of up years.
    pub min_years_up: Option<usize>,
    /// Maximum number of stalled years.
    pub max_years_stalled: Option<usize>,
    /// Maximum number of reduced years.
    pub max_years_reduced: Option<usize>,
    /// Maximum number of stopped years.
    pub max_years_stopped: Option<usize>,
}

/// The first threshold a security failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Yield below `min_yield`, or undefined.
    MinYield(f64),
    /// Yield above `max_yield`, or undefined.
    MaxYield(f64),
    /// Overall CAGR below `min_cagr`, or undefined.
    MinCagr(f64),
    /// Windowed CAGR below its minimum, or undefined.
    MinWindowCagr(CagrHorizon, f64),
    /// Too few up years.
    MinYearsUp(usize),
    /// Too many stalled years.
    MaxYearsStalled(usize),
    /// Too many reduced years.
    MaxYearsReduced(usize),
    /// Too many stopped years.
    MaxYearsStopped(usize),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinYield(v) => write!(f, "yield below {v}"),
            Self::MaxYield(v) => write!(f, "yield above {v}"),
            Self::MinCagr(v) => write!(f, "CAGR below {v}"),
            Self::MinWindowCagr(h, v) => write!(f, "{h} CAGR below {v}"),
            Self::MinYearsUp(n) => write!(f, "fewer than {n} up years"),
            Self::MaxYearsStalled(n) => write!(f, "more than {n} stalled years"),
            Self::MaxYearsReduced(n) => write!(f, "more than {n} reduced years"),
            Self::MaxYearsStopped(n) => write!(f, "more than {n} stopped years"),
        }
    }
}

fn at_least(value: Option<f64>, bound: f64) -> bool {
    value.is_some_and(|v| v >= bound)
}

impl ScreenCriteria {
    /// Creates criteria with no thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts screening to one symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Sets the minimum CAGR for a trailing window.
    #[must_use]
    pub fn with_min_window_cagr(mut self, horizon: CagrHorizon, min: f64) -> Self {
        self.min_window_cagr.insert(horizon, min);
        self
    }

    /// True if no threshold is set. The symbol restriction does not count.
    pub fn is_empty(&self) -> bool {
        self.min_yield.is_none()
            && self.max_yield.is_none()
            && self.min_cagr.is_none()
            && self.min_window_cagr.is_empty()
            && self.min_years_up.is_none()
            && self.max_years_stalled.is_none()
            && self.max_years_reduced.is_none()
            && self.max_years_stopped.is_none()
    }

    /// True if `symbol` passes the symbol restriction, ignoring ASCII case.
    pub fn admits_symbol(&self, symbol: &str) -> bool {
        self.symbol
            .as_deref()
            .is_none_or(|s| s.eq_ignore_ascii_case(symbol))
    }

    /// Checks every set threshold against `metrics`.
    ///
    /// # Errors
    ///
    /// Returns the first [`Rejection`] encountered.
    pub fn check(&self, metrics: &MetricSet) -> Result<(), Rejection> {
        if let Some(min) = self.min_yield
            && !at_least(metrics.dividend_yield, min)
        {
            return Err(Rejection::MinYield(min));
        }
        if let Some(max) = self.max_yield
            && !metrics.dividend_yield.is_some_and(|y| y <= max)
        {
            return Err(Rejection::MaxYield(max));
        }
        if let Some(min) = self.min_cagr
            && !at_least(metrics.cagr.overall, min)
        {
            return Err(Rejection::MinCagr(min));
        }
        for (&horizon, &min) in &self.min_window_cagr {
            if !at_least(metrics.window(horizon), min) {
                return Err(Rejection::MinWindowCagr(horizon, min));
            }
        }

        let years = &metrics.years;
        if let Some(min) = self.min_years_up
            && years.up < min
        {
            return Err(Rejection::MinYearsUp(min));
        }
        if let Some(max) = self.max_years_stalled
            && years.stalled > max
        {
            return Err(Rejection::MaxYearsStalled(max));
        }
        if let Some(max) = self.max_years_reduced
            && years.reduced > max
        {
            return Err(Rejection::MaxYearsReduced(max));
        }
        if let Some(max) = self.max_years_stopped
            && years.stopped > max
        {
            return Err(Rejection::MaxYearsStopped(max));
        }
        Ok(())
    }

    /// True if `metrics` passes every set threshold.
    pub fn passes(&self, metrics: &MetricSet) -> bool {
        self.check(metrics).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use divgrowth_metrics::{CagrSet, YearClassification};

    fn metrics() -> MetricSet {
        let mut cagr = CagrSet {
            overall: Some(8.0),
            ..Default::default()
        };
        cagr.windows.insert(CagrHorizon::Y3, Some(12.0));
        cagr.windows.insert(CagrHorizon::Y5, None);
        MetricSet {
            dividend_yield: Some(3.2),
            cagr,
            years: YearClassification {
                up: 6,
                stalled: 2,
                reduced: 1,
                stopped: 0,
            },
            years_observed: 10,
        }
    }

    #[test]
    fn test_empty_criteria_pass_everything() {
        let criteria = ScreenCriteria::new();
        assert!(criteria.is_empty());
        assert!(criteria.passes(&metrics()));
        assert!(criteria.passes(&MetricSet::default()));
    }

    #[test]
    fn test_yield_bounds() {
        let criteria = ScreenCriteria {
            min_yield: Some(3.0),
            max_yield: Some(4.0),
            ..Default::default()
        };
        assert!(criteria.passes(&metrics()));

        let criteria = ScreenCriteria {
            max_yield: Some(3.0),
            ..Default::default()
        };
        assert_eq!(criteria.check(&metrics()), Err(Rejection::MaxYield(3.0)));
    }

    #[test]
    fn test_undefined_metric_fails_threshold() {
        let criteria = ScreenCriteria {
            min_cagr: Some(-100.0),
            ..Default::default()
        };
        assert_eq!(
            criteria.check(&MetricSet::default()),
            Err(Rejection::MinCagr(-100.0))
        );

        let criteria = ScreenCriteria::new().with_min_window_cagr(CagrHorizon::Y5, 0.0);
        assert_eq!(
            criteria.check(&metrics()),
            Err(Rejection::MinWindowCagr(CagrHorizon::Y5, 0.0))
        );
    }

    #[test]
    fn test_window_cagr() {
        let criteria = ScreenCriteria::new().with_min_window_cagr(CagrHorizon::Y3, 10.0);
        assert!(criteria.passes(&metrics()));
        let criteria = ScreenCriteria::new().with_min_window_cagr(CagrHorizon::Y3, 15.0);
        assert!(!criteria.passes(&metrics()));
    }

    #[test]
    fn test_year_counts() {
        let criteria = ScreenCriteria {
            min_years_up: Some(6),
            max_years_stalled: Some(2),
            max_years_reduced: Some(1),
            max_years_stopped: Some(0),
            ..Default::default()
        };
        assert!(criteria.passes(&metrics()));

        let criteria = ScreenCriteria {
            max_years_reduced: Some(0),
            ..Default::default()
        };
        assert_eq!(criteria.check(&metrics()), Err(Rejection::MaxYearsReduced(0)));
        assert_eq!(
            Rejection::MaxYearsReduced(0).to_string(),
            "more than 0 reduced years"
        );
    }

    #[test]
    fn test_symbol_restriction() {
        let criteria = ScreenCriteria::new().with_symbol("KO");
        assert!(criteria.admits_symbol("KO"));
        assert!(criteria.admits_symbol("ko"));
        assert!(!criteria.admits_symbol("PEP"));
        assert!(criteria.is_empty());
        assert!(ScreenCriteria::new().admits_symbol("PEP"));
    }

    #[test]
    fn test_criteria_from_json() {
        let criteria: ScreenCriteria = serde_json::from_str(
            r#"{"min_yield": 2.5, "min_window_cagr": {"Y10": 5.0}, "max_years_stopped": 0}"#,
        )
        .unwrap();
        assert_eq!(criteria.min_yield, Some(2.5));
        assert_eq!(criteria.min_window_cagr.get(&CagrHorizon::Y10), Some(&5.0));
        assert_eq!(criteria.max_years_stopped, Some(0));
        assert_eq!(criteria.symbol, None);
    }
}
