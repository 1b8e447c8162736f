//! Batch screening of many securities.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use divgrowth_metrics::{CagrHorizon, MetricSet, MetricsConfig, MetricsEngine};
use divgrowth_traits::{DivgrowthError, EventSource, Result, SecurityHistory, Symbol};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::criteria::ScreenCriteria;
use crate::expr::{Expression, ExpressionError, Variables};
use crate::stats::SecurityStats;

/// Order of emitted rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Symbol ascending.
    #[default]
    Symbol,
    /// Dividend yield descending.
    Yield,
    /// Overall CAGR descending.
    Cagr,
}

impl FromStr for SortKey {
    type Err = DivgrowthError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "symbol" => Ok(Self::Symbol),
            "yield" => Ok(Self::Yield),
            "cagr" => Ok(Self::Cagr),
            other => Err(DivgrowthError::InvalidData(format!(
                "Unknown sort key: {other}. Valid keys: symbol, yield, cagr"
            ))),
        }
    }
}

/// Configuration of a screening run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Threshold predicates.
    pub criteria: ScreenCriteria,
    /// Optional filter expression over the screening variables.
    pub condition: Option<String>,
    /// Metric conventions.
    pub metrics: MetricsConfig,
    /// Row order.
    pub sort: SortKey,
    /// Evaluate securities on the rayon thread pool.
    pub parallel: bool,
}

/// One security that passed every active filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    /// Security identifier.
    pub symbol: Symbol,
    /// Latest market price, if known.
    pub price: Option<f64>,
    /// Product of every split on file.
    pub shares: f64,
    /// Full metric set.
    pub metrics: MetricSet,
}

impl ScreeningResult {
    /// Variables visible to filter expressions for this row.
    pub fn variables(&self) -> Variables {
        screening_variables(&self.metrics, self.price, self.shares)
    }
}

/// Binds every screening variable.
///
/// Undefined yields, CAGRs and prices are bound as `0`.
pub fn screening_variables(metrics: &MetricSet, price: Option<f64>, shares: f64) -> Variables {
    let years = &metrics.years;
    let dividend_yield = metrics.dividend_yield.unwrap_or(0.0);
    let cagr = metrics.cagr.overall.unwrap_or(0.0);

    let mut vars = Variables::new();
    for (names, count) in [
        (["up", "years_up"], years.up),
        (["stalled", "years_stalled"], years.stalled),
        (["reduced", "years_reduced"], years.reduced),
        (["stopped", "years_stopped"], years.stopped),
    ] {
        for name in names {
            vars.set(name, count as f64);
        }
    }
    vars.set("yield", dividend_yield)
        .set("avg_yield", dividend_yield)
        .set("cagr", cagr)
        .set("cagr_overall", cagr)
        .set("price", price.unwrap_or(0.0))
        .set("shares", shares);
    for horizon in CagrHorizon::ALL {
        vars.set(horizon.variable(), metrics.window(horizon).unwrap_or(0.0));
    }
    vars
}

/// A security excluded because its filter expression failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenWarning {
    /// Security identifier.
    pub symbol: Symbol,
    /// The condition as written.
    pub condition: String,
    /// Why it failed.
    pub error: ExpressionError,
}

impl fmt::Display for ScreenWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error evaluating condition '{}' for {}: {}",
            self.condition, self.symbol, self.error
        )
    }
}

/// Rows and warnings of one screening run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenOutcome {
    /// Passing securities in [`SortKey`] order.
    pub results: Vec<ScreeningResult>,
    /// Expression failures ordered by symbol.
    pub warnings: Vec<ScreenWarning>,
    /// Securities for which metrics were computed.
    pub screened: usize,
    /// Securities skipped for having no dividends.
    pub skipped: usize,
}

enum Verdict {
    Excluded,
    NoDividends,
    Rejected,
    Passed(ScreeningResult),
    Failed(ScreenWarning),
}

/// Applies a [`ScreenConfig`] to batches of securities.
///
/// The condition is parsed once at construction. A condition that does not
/// parse fails every security that reaches it, each with its own warning.
#[derive(Debug)]
pub struct Screener {
    config: ScreenConfig,
    engine: MetricsEngine,
    condition: Option<std::result::Result<Expression, ExpressionError>>,
}

impl Screener {
    /// Create a new screener.
    pub fn new(config: ScreenConfig) -> Self {
        let condition = config
            .condition
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(Expression::parse);
        if let Some(Err(e)) = &condition {
            warn!(error = %e, "filter condition does not parse");
        }
        Self {
            engine: MetricsEngine::new(config.metrics),
            config,
            condition,
        }
    }

    /// The screener's configuration.
    pub const fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Screens `securities`.
    pub fn screen(&self, securities: &[SecurityHistory]) -> ScreenOutcome {
        let verdicts: Vec<Verdict> = if self.config.parallel {
            securities.par_iter().map(|h| self.screen_one(h)).collect()
        } else {
            securities.iter().map(|h| self.screen_one(h)).collect()
        };

        let mut outcome = ScreenOutcome::default();
        for verdict in verdicts {
            match verdict {
                Verdict::Excluded => {}
                Verdict::NoDividends => outcome.skipped += 1,
                Verdict::Rejected => outcome.screened += 1,
                Verdict::Passed(row) => {
                    outcome.screened += 1;
                    outcome.results.push(row);
                }
                Verdict::Failed(warning) => {
                    outcome.screened += 1;
                    outcome.warnings.push(warning);
                }
            }
        }

        sort_results(&mut outcome.results, self.config.sort);
        outcome.warnings.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        info!(
            screened = outcome.screened,
            passed = outcome.results.len(),
            warnings = outcome.warnings.len(),
            "screening complete"
        );
        outcome
    }

    /// Loads securities from `source` and screens them.
    ///
    /// With a symbol restriction only that security is loaded.
    ///
    /// # Errors
    ///
    /// Propagates source failures, including
    /// [`DivgrowthError::SymbolNotFound`] for an unknown restricted symbol.
    pub fn screen_source(&self, source: &dyn EventSource) -> Result<ScreenOutcome> {
        let securities = match &self.config.criteria.symbol {
            Some(symbol) => vec![source.security(symbol)?],
            None => source.securities()?,
        };
        Ok(self.screen(&securities))
    }

    fn screen_one(&self, history: &SecurityHistory) -> Verdict {
        let criteria = &self.config.criteria;
        if !criteria.admits_symbol(&history.symbol) {
            return Verdict::Excluded;
        }
        let Some(stats) = SecurityStats::compute(history, &self.engine) else {
            return Verdict::NoDividends;
        };

        if let Err(rejection) = criteria.check(&stats.metrics) {
            debug!(symbol = %history.symbol, %rejection, "rejected");
            return Verdict::Rejected;
        }

        let row = ScreeningResult {
            symbol: stats.symbol,
            price: stats.current_price,
            shares: stats.shares,
            metrics: stats.metrics,
        };

        let Some(condition) = &self.condition else {
            return Verdict::Passed(row);
        };
        let matched = match condition {
            Ok(expr) => expr.matches(&row.variables()),
            Err(e) => Err(e.clone()),
        };
        match matched {
            Ok(true) => Verdict::Passed(row),
            Ok(false) => {
                debug!(symbol = %row.symbol, "rejected by condition");
                Verdict::Rejected
            }
            Err(error) => {
                warn!(symbol = %row.symbol, %error, "condition evaluation failed");
                Verdict::Failed(ScreenWarning {
                    symbol: row.symbol,
                    condition: self.config.condition.clone().unwrap_or_default(),
                    error,
                })
            }
        }
    }
}

/// Screens `securities` under `config`.
pub fn screen(securities: &[SecurityHistory], config: ScreenConfig) -> ScreenOutcome {
    Screener::new(config).screen(securities)
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn sort_results(rows: &mut [ScreeningResult], key: SortKey) {
    rows.sort_by(|a, b| {
        let primary = match key {
            SortKey::Symbol => Ordering::Equal,
            SortKey::Yield => descending(a.metrics.dividend_yield, b.metrics.dividend_yield),
            SortKey::Cagr => descending(a.metrics.cagr.overall, b.metrics.cagr.overall),
        };
        primary.then_with(|| a.symbol.cmp(&b.symbol))
    });
}
