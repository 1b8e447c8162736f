//! Restating vendor dividends as raw and forward-accrued amounts.
//!
//! Vendors publish backward-adjusted histories: a dividend paid before a 2:1
//! split is reported at half its paid value so the series lines up with
//! today's share count. [`SplitAdjuster`] undoes that, then compounds the
//! paid amount by the shares one original holding had become.

use divgrowth_traits::{AdjustedDividendEvent, DividendEvent, SplitEvent};
use tracing::debug;

use crate::schedule::SplitSchedule;

/// Converts a vendor dividend series into all three amount tiers.
///
/// # Examples
///
/// ```
/// use divgrowth_adjust::SplitAdjuster;
/// use divgrowth_traits::{Date, DividendEvent, SplitEvent};
///
/// let d = |y, m, day| Date::from_ymd_opt(y, m, day).unwrap();
/// let splits = vec![SplitEvent::new("X", d(2019, 6, 1), 2.0, 1.0).unwrap()];
/// let events = vec![DividendEvent::new("X", d(2018, 5, 1), 5.0)];
///
/// let adjusted = SplitAdjuster::new(&splits).adjust(&events);
/// assert_eq!(adjusted[0].raw_amount, 10.0);
/// assert_eq!(adjusted[0].shares_at_time, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct SplitAdjuster {
    schedule: SplitSchedule,
}

impl SplitAdjuster {
    /// Creates an adjuster for one security's split schedule.
    pub fn new(splits: &[SplitEvent]) -> Self {
        Self {
            schedule: SplitSchedule::new(splits),
        }
    }

    /// The sorted schedule backing this adjuster.
    pub const fn schedule(&self) -> &SplitSchedule {
        &self.schedule
    }

    /// Adjusts every event, returned in ex-date order.
    ///
    /// Events are never dropped or merged; the output has one entry per input.
    pub fn adjust(&self, events: &[DividendEvent]) -> Vec<AdjustedDividendEvent> {
        let mut sorted: Vec<&DividendEvent> = events.iter().collect();
        sorted.sort_by_key(|event| event.ex_date);

        debug!(
            events = sorted.len(),
            splits = self.schedule.len(),
            "adjusting dividend series"
        );

        sorted.into_iter().map(|event| self.adjust_one(event)).collect()
    }

    /// Adjusts a single event.
    pub fn adjust_one(&self, event: &DividendEvent) -> AdjustedDividendEvent {
        let splits_after = self.schedule.multiplier_after(event.ex_date);
        let splits_at_time = self.schedule.multiplier_at(event.ex_date);
        let raw_amount = event.vendor_amount * splits_after;

        AdjustedDividendEvent {
            security_id: event.security_id.clone(),
            ex_date: event.ex_date,
            vendor_amount: event.vendor_amount,
            close_price: event.close_price,
            raw_amount,
            accrued_amount: raw_amount * splits_at_time,
            shares_at_time: splits_at_time,
            raw_price: event.close_price.map(|price| price * splits_after),
        }
    }
}

/// Adjusts `events` against `splits`. Shorthand for [`SplitAdjuster::adjust`].
pub fn adjust(events: &[DividendEvent], splits: &[SplitEvent]) -> Vec<AdjustedDividendEvent> {
    SplitAdjuster::new(splits).adjust(events)
}
