//! Cumulative split multipliers.

use divgrowth_traits::{Date, SplitEvent};

/// A security's splits in ex-date order with prefix and suffix products.
///
/// For a date `d`, splits on or before `d` have already multiplied the share
/// count; splits strictly after `d` are the ones a backward-adjusting vendor
/// has divided out of the figure reported for `d`.
#[derive(Debug, Clone)]
pub struct SplitSchedule {
    splits: Vec<SplitEvent>,
    /// `prefix[i]` = product of the first `i` ratios.
    prefix: Vec<f64>,
    /// `suffix[i]` = product of ratios `i..n`.
    suffix: Vec<f64>,
}

impl SplitSchedule {
    /// Builds a schedule. Splits are stably sorted by ex-date, so duplicate
    /// dates keep their input order.
    pub fn new(splits: &[SplitEvent]) -> Self {
        let mut splits = splits.to_vec();
        splits.sort_by_key(|split| split.ex_date);

        let n = splits.len();
        let mut prefix = vec![1.0; n + 1];
        for (i, split) in splits.iter().enumerate() {
            prefix[i + 1] = prefix[i] * split.ratio();
        }
        let mut suffix = vec![1.0; n + 1];
        for i in (0..n).rev() {
            suffix[i] = suffix[i + 1] * splits[i].ratio();
        }

        Self {
            splits,
            prefix,
            suffix,
        }
    }

    /// Splits in ex-date order.
    pub fn splits(&self) -> &[SplitEvent] {
        &self.splits
    }

    /// Number of splits on file.
    pub fn len(&self) -> usize {
        self.splits.len()
    }

    /// Whether no splits are on file.
    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    fn boundary(&self, date: Date) -> usize {
        self.splits.partition_point(|split| split.ex_date <= date)
    }

    /// Product of ratios for splits effective on or before `date`.
    pub fn multiplier_at(&self, date: Date) -> f64 {
        self.prefix[self.boundary(date)]
    }

    /// Product of ratios for splits effective strictly after `date`.
    pub fn multiplier_after(&self, date: Date) -> f64 {
        self.suffix[self.boundary(date)]
    }

    /// Product of every ratio on file, including splits after the last dividend.
    pub fn total_multiplier(&self) -> f64 {
        self.suffix[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn split(y: i32, m: u32, d: u32, num: f64, den: f64) -> SplitEvent {
        SplitEvent::new("X", date(y, m, d), num, den).unwrap()
    }

    #[test]
    fn test_empty_schedule() {
        let schedule = SplitSchedule::new(&[]);
        assert!(schedule.is_empty());
        assert_relative_eq!(schedule.multiplier_at(date(2020, 1, 1)), 1.0);
        assert_relative_eq!(schedule.multiplier_after(date(2020, 1, 1)), 1.0);
        assert_relative_eq!(schedule.total_multiplier(), 1.0);
    }

    #[test]
    fn test_unsorted_input_is_ordered() {
        let schedule = SplitSchedule::new(&[
            split(2020, 1, 1, 5.0, 1.0),
            split(2010, 1, 1, 2.0, 1.0),
        ]);
        assert_eq!(schedule.splits()[0].ex_date, date(2010, 1, 1));

        assert_relative_eq!(schedule.multiplier_at(date(2009, 12, 31)), 1.0);
        assert_relative_eq!(schedule.multiplier_after(date(2009, 12, 31)), 10.0);
        assert_relative_eq!(schedule.multiplier_at(date(2015, 6, 1)), 2.0);
        assert_relative_eq!(schedule.multiplier_after(date(2015, 6, 1)), 5.0);
        assert_relative_eq!(schedule.multiplier_at(date(2021, 1, 1)), 10.0);
        assert_relative_eq!(schedule.multiplier_after(date(2021, 1, 1)), 1.0);
    }

    #[test]
    fn test_same_day_split_counts_as_at_time() {
        let schedule = SplitSchedule::new(&[split(2019, 6, 1, 2.0, 1.0)]);
        assert_relative_eq!(schedule.multiplier_at(date(2019, 6, 1)), 2.0);
        assert_relative_eq!(schedule.multiplier_after(date(2019, 6, 1)), 1.0);
    }

    #[test]
    fn test_duplicate_dates_do_not_panic() {
        let schedule = SplitSchedule::new(&[
            split(2019, 6, 1, 2.0, 1.0),
            split(2019, 6, 1, 3.0, 1.0),
        ]);
        assert_eq!(schedule.len(), 2);
        assert_relative_eq!(schedule.multiplier_at(date(2019, 6, 1)), 6.0);
    }

    #[test]
    fn test_reverse_split() {
        let schedule = SplitSchedule::new(&[split(2018, 1, 1, 1.0, 4.0)]);
        assert_relative_eq!(schedule.total_multiplier(), 0.25);
        assert_relative_eq!(schedule.multiplier_after(date(2017, 1, 1)), 0.25);
    }
}
