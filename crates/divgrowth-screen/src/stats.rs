//! Single-security detail view.

use divgrowth_adjust::SplitAdjuster;
use divgrowth_metrics::{MetricSet, MetricsConfig, MetricsEngine};
use divgrowth_traits::{AdjustedDividendEvent, SecurityHistory, SplitEvent, Symbol, YearlySeries};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything derived from one security's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityStats {
    /// Security identifier.
    pub symbol: Symbol,
    /// Latest market price, if known.
    pub current_price: Option<f64>,
    /// Splits in ex-date order.
    pub splits: Vec<SplitEvent>,
    /// Adjusted dividends in ex-date order.
    pub events: Vec<AdjustedDividendEvent>,
    /// Completed-year totals of the configured tier.
    pub yearly: YearlySeries,
    /// Screening metrics.
    pub metrics: MetricSet,
    /// Product of every split on file.
    pub shares: f64,
}

impl SecurityStats {
    /// Runs the adjustment and metric pipeline for `history`.
    ///
    /// Returns `None` if the security has no dividends.
    pub fn compute(history: &SecurityHistory, engine: &MetricsEngine) -> Option<Self> {
        if history.dividends.is_empty() {
            debug!(symbol = %history.symbol, "no dividends on file");
            return None;
        }

        let adjuster = SplitAdjuster::new(&history.splits);
        let events = adjuster.adjust(&history.dividends);
        let yearly = engine.yearly_series(&events);
        let metrics = engine.evaluate_series(&events, &yearly);
        debug!(
            symbol = %history.symbol,
            events = events.len(),
            years = yearly.len(),
            "computed metrics"
        );

        Some(Self {
            symbol: history.symbol.clone(),
            current_price: history.current_price,
            splits: adjuster.schedule().splits().to_vec(),
            shares: adjuster.schedule().total_multiplier(),
            events,
            yearly,
            metrics,
        })
    }

    /// The `n` most recent adjusted dividends, newest first.
    pub fn recent_events(&self, n: usize) -> impl Iterator<Item = &AdjustedDividendEvent> {
        self.events.iter().rev().take(n)
    }
}

/// Detail view of one security under `config`, `None` without dividends.
pub fn security_stats(history: &SecurityHistory, config: &MetricsConfig) -> Option<SecurityStats> {
    SecurityStats::compute(history, &MetricsEngine::new(*config))
}
