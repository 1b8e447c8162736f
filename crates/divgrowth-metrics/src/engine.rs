//! Full metric set for one security.

use divgrowth_traits::{
    AdjustedDividendEvent, AmountTier, CagrBase, YearlySeries, YieldConvention,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{YearClassification, classify};
use crate::growth::{CagrHorizon, CagrSet};
use crate::yields::security_yield;

/// Configuration for metric computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Amount tier summed into yearly totals.
    pub amount_tier: AmountTier,
    /// How per-event yields are summarized.
    pub yield_convention: YieldConvention,
    /// Base year policy for windowed CAGR.
    pub cagr_base: CagrBase,
    /// Current calendar year; it and later years are excluded as incomplete.
    /// `None` treats every year as complete.
    pub as_of_year: Option<i32>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            amount_tier: AmountTier::Accrued,
            yield_convention: YieldConvention::TrailingYear,
            cagr_base: CagrBase::FirstPositive,
            as_of_year: None,
        }
    }
}

impl MetricsConfig {
    /// Sets the current calendar year.
    #[must_use]
    pub const fn with_as_of_year(mut self, year: i32) -> Self {
        self.as_of_year = Some(year);
        self
    }
}

/// Every screening metric of one security.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    /// Dividend yield in percent, `None` without a completed year.
    pub dividend_yield: Option<f64>,
    /// Overall and windowed CAGRs.
    pub cagr: CagrSet,
    /// Year-over-year transition counts.
    pub years: YearClassification,
    /// Completed years in the series, gap years included.
    pub years_observed: usize,
}

impl MetricSet {
    /// Windowed CAGR shorthand.
    pub fn window(&self, horizon: CagrHorizon) -> Option<f64> {
        self.cagr.window(horizon)
    }
}

/// Computes yearly series and metrics under one [`MetricsConfig`].
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    /// Create a new engine with the given configuration.
    pub const fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration.
    pub const fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Yearly totals of the configured tier over completed years.
    pub fn yearly_series(&self, events: &[AdjustedDividendEvent]) -> YearlySeries {
        YearlySeries::from_events(events, self.config.amount_tier, self.config.as_of_year)
    }

    /// Computes every metric for one security's adjusted events.
    pub fn evaluate(&self, events: &[AdjustedDividendEvent]) -> MetricSet {
        let series = self.yearly_series(events);
        self.evaluate_series(events, &series)
    }

    /// Computes every metric given a series already built by
    /// [`yearly_series`](Self::yearly_series).
    pub fn evaluate_series(
        &self,
        events: &[AdjustedDividendEvent],
        series: &YearlySeries,
    ) -> MetricSet {
        let gaps = series.gap_years();
        if !gaps.is_empty() {
            debug!(?gaps, "zero-filled years without dividends");
        }

        MetricSet {
            dividend_yield: security_yield(events, series, self.config.yield_convention),
            cagr: CagrSet::compute(series, self.config.cagr_base),
            years: classify(series),
            years_observed: series.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use divgrowth_traits::{Date, DividendEvent, SplitEvent};

    fn date(y: i32, m: u32) -> Date {
        Date::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_metrics_config_default() {
        let config = MetricsConfig::default();
        assert_eq!(config.amount_tier, AmountTier::Accrued);
        assert_eq!(config.as_of_year, None);
        assert_eq!(config.with_as_of_year(2024).as_of_year, Some(2024));
    }

    #[test]
    fn test_config_deserializes_partial() {
        let config: MetricsConfig =
            serde_json::from_str(r#"{"cagr_base": "window_start", "as_of_year": 2025}"#).unwrap();
        assert_eq!(config.cagr_base, CagrBase::WindowStart);
        assert_eq!(config.amount_tier, AmountTier::Accrued);
        assert_eq!(config.as_of_year, Some(2025));
    }

    #[test]
    fn test_evaluate_growth_of_one_share() {
        // 1.0 per share every year, 2:1 split in 2021: one original share
        // receives 1, 1, 2, 2.
        let events: Vec<_> = (2019..=2022)
            .map(|y| DividendEvent::new("X", date(y, 6), if y >= 2021 { 1.0 } else { 0.5 }))
            .collect();
        let splits = vec![SplitEvent::new("X", date(2021, 1), 2.0, 1.0).unwrap()];
        let adjusted = divgrowth_adjust::adjust(&events, &splits);

        let engine = MetricsEngine::new(MetricsConfig::default());
        let metrics = engine.evaluate(&adjusted);

        assert_eq!(metrics.years.as_tuple(), (1, 2, 0, 0));
        assert_relative_eq!(metrics.cagr.overall.unwrap(), (2f64.powf(1.0 / 3.0) - 1.0) * 100.0);
        assert_eq!(metrics.years_observed, 4);
    }

    #[test]
    fn test_raw_tier_ignores_share_growth() {
        let events: Vec<_> = (2019..=2022)
            .map(|y| DividendEvent::new("X", date(y, 6), if y >= 2021 { 1.0 } else { 0.5 }))
            .collect();
        let splits = vec![SplitEvent::new("X", date(2021, 1), 2.0, 1.0).unwrap()];
        let adjusted = divgrowth_adjust::adjust(&events, &splits);

        let config = MetricsConfig {
            amount_tier: AmountTier::Raw,
            ..Default::default()
        };
        let metrics = MetricsEngine::new(config).evaluate(&adjusted);
        assert_eq!(metrics.years.as_tuple(), (0, 3, 0, 0));
        assert_relative_eq!(metrics.cagr.overall.unwrap(), 0.0);
    }

    #[test]
    fn test_current_year_excluded() {
        let events = vec![
            DividendEvent::new("X", date(2022, 6), 1.0),
            DividendEvent::new("X", date(2023, 6), 2.0),
            DividendEvent::new("X", date(2024, 2), 0.1),
        ];
        let adjusted = divgrowth_adjust::adjust(&events, &[]);
        let engine = MetricsEngine::new(MetricsConfig::default().with_as_of_year(2024));
        let metrics = engine.evaluate(&adjusted);

        assert_eq!(metrics.years.as_tuple(), (1, 0, 0, 0));
        assert_relative_eq!(metrics.cagr.overall.unwrap(), 100.0);
    }

    #[test]
    fn test_single_year_metrics_undefined() {
        let events = vec![DividendEvent::new("X", date(2022, 6), 1.0).with_close_price(20.0)];
        let adjusted = divgrowth_adjust::adjust(&events, &[]);
        let metrics = MetricsEngine::default().evaluate(&adjusted);

        assert_eq!(metrics.cagr.overall, None);
        assert!(CagrHorizon::ALL.iter().all(|&h| metrics.window(h).is_none()));
        assert_eq!(metrics.years, YearClassification::default());
        assert_relative_eq!(metrics.dividend_yield.unwrap(), 5.0);
    }
}
