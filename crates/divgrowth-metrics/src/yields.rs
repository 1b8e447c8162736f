//! Dividend yield.
//!
//! Yield is only meaningful when amount and price carry the same split
//! multiplier, so per-event yields always pair `raw_amount` with `raw_price`.

use divgrowth_traits::{AdjustedDividendEvent, YearlySeries, YieldConvention};

/// Yield as a percentage: `amount / price * 100`, or `0.0` for a
/// non-positive price.
pub fn dividend_yield(amount: f64, price: f64) -> f64 {
    if price <= 0.0 {
        return 0.0;
    }
    amount / price * 100.0
}

/// Yield of one event at its ex-date price, `None` if no price was recorded.
pub fn event_yield(event: &AdjustedDividendEvent) -> Option<f64> {
    event
        .raw_price
        .map(|price| dividend_yield(event.raw_amount, price))
}

/// Summarizes the yield of a security under `convention`.
///
/// `series` must be the yearly series built from the same events; its last
/// year is the last completed year. Events without a price contribute `0.0`.
/// Returns `None` when there is no completed-year event to measure.
pub fn security_yield(
    events: &[AdjustedDividendEvent],
    series: &YearlySeries,
    convention: YieldConvention,
) -> Option<f64> {
    let last_year = series.last_year()?;
    let first_year = series.first_year()?;
    let per_event = events
        .iter()
        .filter(|event| (first_year..=last_year).contains(&event.year()));

    match convention {
        YieldConvention::TrailingYear => Some(
            per_event
                .filter(|event| event.year() == last_year)
                .map(|event| event_yield(event).unwrap_or(0.0))
                .sum(),
        ),
        YieldConvention::AverageOfEvents => {
            let yields: Vec<f64> = per_event
                .map(|event| event_yield(event).unwrap_or(0.0))
                .collect();
            if yields.is_empty() {
                return None;
            }
            Some(yields.iter().sum::<f64>() / yields.len() as f64)
        }
    }
}
