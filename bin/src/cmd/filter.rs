//! Filter command implementation.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use divgrowth::metrics::CagrHorizon;
use divgrowth::{EventSource, ScreenConfig, ScreenOutcome, Screener, ScreeningResult, SortKey};
use tracing::debug;

use super::{banner, fmt_opt};

/// Rows printed between repeated headers.
const HEADER_INTERVAL: usize = 30;

const LEGEND_TIP: &str =
    "COLUMNS: CAGR=% Growth, Up=Increased, Stalled=Unchanged, Reduced=Decreased, Stopped=Zero";

#[derive(Debug, Default, Args)]
pub(crate) struct FilterArgs {
    /// Screen only this ticker symbol
    #[arg(long)]
    symbol: Option<String>,

    /// Minimum dividend yield (%)
    #[arg(long)]
    min_yield: Option<f64>,

    /// Maximum dividend yield (%)
    #[arg(long)]
    max_yield: Option<f64>,

    /// Minimum overall dividend CAGR (%)
    #[arg(long)]
    cagr_min: Option<f64>,

    /// Minimum 3Yr CAGR (%)
    #[arg(long = "cagr-3yr-min")]
    cagr_3yr_min: Option<f64>,

    /// Minimum 5Yr CAGR (%)
    #[arg(long = "cagr-5yr-min")]
    cagr_5yr_min: Option<f64>,

    /// Minimum 10Yr CAGR (%)
    #[arg(long = "cagr-10yr-min")]
    cagr_10yr_min: Option<f64>,

    /// Minimum 15Yr CAGR (%)
    #[arg(long = "cagr-15yr-min")]
    cagr_15yr_min: Option<f64>,

    /// Minimum 20Yr CAGR (%)
    #[arg(long = "cagr-20yr-min")]
    cagr_20yr_min: Option<f64>,

    /// Minimum 30Yr CAGR (%)
    #[arg(long = "cagr-30yr-min")]
    cagr_30yr_min: Option<f64>,

    /// Minimum number of years with dividend growth
    #[arg(long)]
    years_up: Option<usize>,

    /// Maximum number of years with stalled dividends
    #[arg(long)]
    years_stalled: Option<usize>,

    /// Maximum number of years with reduced dividends
    #[arg(long)]
    years_reduced: Option<usize>,

    /// Maximum number of years with stopped dividends
    #[arg(long)]
    years_stopped: Option<usize>,

    /// Filter expression, e.g. '(years-stopped + years-stalled) * 2 <= years-up'
    #[arg(long)]
    condition: Option<String>,

    /// Sort order (symbol, yield, cagr)
    #[arg(long)]
    sort: Option<String>,

    /// Current calendar year; it and later years are excluded (defaults to this year)
    #[arg(long)]
    as_of_year: Option<i32>,

    /// JSON screening config; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Screen securities in parallel
    #[arg(long)]
    parallel: bool,

    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    format: String,
}

impl FilterArgs {
    /// Merge flags over `base`.
    fn apply(&self, mut base: ScreenConfig, current_year: i32) -> Result<ScreenConfig> {
        let criteria = &mut base.criteria;
        if self.symbol.is_some() {
            criteria.symbol.clone_from(&self.symbol);
        }
        criteria.min_yield = self.min_yield.or(criteria.min_yield);
        criteria.max_yield = self.max_yield.or(criteria.max_yield);
        criteria.min_cagr = self.cagr_min.or(criteria.min_cagr);
        criteria.min_years_up = self.years_up.or(criteria.min_years_up);
        criteria.max_years_stalled = self.years_stalled.or(criteria.max_years_stalled);
        criteria.max_years_reduced = self.years_reduced.or(criteria.max_years_reduced);
        criteria.max_years_stopped = self.years_stopped.or(criteria.max_years_stopped);

        let windows = [
            (CagrHorizon::Y3, self.cagr_3yr_min),
            (CagrHorizon::Y5, self.cagr_5yr_min),
            (CagrHorizon::Y10, self.cagr_10yr_min),
            (CagrHorizon::Y15, self.cagr_15yr_min),
            (CagrHorizon::Y20, self.cagr_20yr_min),
            (CagrHorizon::Y30, self.cagr_30yr_min),
        ];
        for (horizon, min) in windows {
            if let Some(min) = min {
                criteria.min_window_cagr.insert(horizon, min);
            }
        }

        if self.condition.is_some() {
            base.condition.clone_from(&self.condition);
        }
        if let Some(sort) = &self.sort {
            base.sort = sort.parse::<SortKey>()?;
        }
        base.metrics.as_of_year = self
            .as_of_year
            .or(base.metrics.as_of_year)
            .or(Some(current_year));
        base.parallel |= self.parallel;
        Ok(base)
    }

    /// Load the config file, if any, and merge flags over it.
    fn screen_config(&self, current_year: i32) -> Result<ScreenConfig> {
        let base = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => ScreenConfig::default(),
        };
        self.apply(base, current_year)
    }
}

/// Screen every security in `source` and print the passing rows.
pub(crate) fn run_filter(
    source: &dyn EventSource,
    args: &FilterArgs,
    current_year: i32,
) -> Result<()> {
    let json = match args.format.as_str() {
        "text" => false,
        "json" => true,
        other => anyhow::bail!("Unknown format: {other}. Valid formats: text, json"),
    };

    let config = args.screen_config(current_year)?;
    debug!(?config, "screening");
    let outcome = Screener::new(config).screen_source(source)?;

    for warning in &outcome.warnings {
        eprintln!("{warning}");
    }

    if json {
        let out = serde_json::to_string_pretty(&outcome.results)
            .context("JSON serialization error")?;
        println!("{out}");
    } else {
        print_table(&outcome);
    }
    Ok(())
}

fn header() -> String {
    let mut line = format!(
        "{:<14} {:>10} {:>8} {:>10} {:>10}",
        "Symbol", "Price", "Shares", "Yield (%)", "CAGR (%)"
    );
    for horizon in CagrHorizon::ALL {
        line.push_str(&format!(" {:>8}", horizon.to_string()));
    }
    line.push_str(&format!(
        " {:>5} {:>7} {:>7} {:>7}",
        "Up", "Stalled", "Reduced", "Stopped"
    ));
    line
}

fn row(result: &ScreeningResult) -> String {
    let metrics = &result.metrics;
    let mut line = format!(
        "{:<14} {:>10} {:>8.2} {:>10} {:>10}",
        result.symbol,
        fmt_opt(result.price),
        result.shares,
        fmt_opt(metrics.dividend_yield),
        fmt_opt(metrics.cagr.overall)
    );
    for horizon in CagrHorizon::ALL {
        line.push_str(&format!(" {:>8}", fmt_opt(metrics.window(horizon))));
    }
    let years = &metrics.years;
    line.push_str(&format!(
        " {:>5} {:>7} {:>7} {:>7}",
        years.up, years.stalled, years.reduced, years.stopped
    ));
    line
}

fn print_table(outcome: &ScreenOutcome) {
    banner("Dividend Screen");

    if outcome.results.is_empty() {
        println!("No stocks matched all filters.");
        println!(
            "({} screened, {} without dividends)",
            outcome.screened, outcome.skipped
        );
        return;
    }

    println!(
        "Found {} stocks matching your criteria ({} screened):\n",
        outcome.results.len(),
        outcome.screened
    );

    let header = header();
    for (i, chunk) in outcome.results.chunks(HEADER_INTERVAL).enumerate() {
        if i > 0 {
            println!("\n{LEGEND_TIP}\n");
        }
        println!("{header}");
        println!("{}", "─".repeat(header.chars().count()));
        for result in chunk {
            println!("{}", row(result));
        }
    }

    print_legend();
}

fn print_legend() {
    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("COLUMN LEGEND");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  Price      : Current market price");
    println!("  Shares     : How many shares 1 original share has become via splits");
    println!("  Yield (%)  : Raw dividend / raw price * 100 over the last completed year");
    println!("  CAGR (%)   : Growth of total payout from 1 original share");
    println!("  3Yr .. 30Yr: Growth rate of total payout over the last N years");
    println!("  Up         : Years where total payout was greater than the previous year");
    println!("  Stalled    : Years where total payout was equal to the previous year");
    println!("  Reduced    : Years where total payout was lower than the previous year");
    println!("  Stopped    : Years where nothing was paid");
    println!("  --condition: Expression over up, stalled, reduced, stopped, yield, cagr,");
    println!("               c3 .. c30, price, shares");
    println!("               Example: '(years-stopped + years-stalled) * 2 <= years-up'");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use divgrowth::metrics::MetricSet;
    use std::io::Write;

    #[test]
    fn test_flags_build_config() {
        let args = FilterArgs {
            min_yield: Some(2.0),
            cagr_5yr_min: Some(7.5),
            years_stopped: Some(0),
            condition: Some("up > 3".into()),
            sort: Some("yield".into()),
            ..Default::default()
        };
        let config = args.screen_config(2025).unwrap();
        assert_eq!(config.criteria.min_yield, Some(2.0));
        assert_eq!(
            config.criteria.min_window_cagr.get(&CagrHorizon::Y5),
            Some(&7.5)
        );
        assert_eq!(config.criteria.max_years_stopped, Some(0));
        assert_eq!(config.condition.as_deref(), Some("up > 3"));
        assert_eq!(config.sort, SortKey::Yield);
        assert_eq!(config.metrics.as_of_year, Some(2025));
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"criteria": {"min_yield": 1.0, "max_yield": 9.0}, "metrics": {"as_of_year": 2020}, "parallel": true}"#,
        )
        .unwrap();
        let args = FilterArgs {
            config: Some(file.path().to_path_buf()),
            min_yield: Some(3.0),
            ..Default::default()
        };
        let config = args.screen_config(2025).unwrap();
        assert_eq!(config.criteria.min_yield, Some(3.0));
        assert_eq!(config.criteria.max_yield, Some(9.0));
        assert_eq!(config.metrics.as_of_year, Some(2020));
        assert!(config.parallel);
    }

    #[test]
    fn test_bad_sort_key() {
        let args = FilterArgs {
            sort: Some("price".into()),
            ..Default::default()
        };
        assert!(args.screen_config(2025).is_err());
    }

    #[test]
    fn test_row_marks_missing_values() {
        let result = ScreeningResult {
            symbol: "NEW".into(),
            price: None,
            shares: 1.0,
            metrics: MetricSet::default(),
        };
        let line = row(&result);
        assert!(line.starts_with("NEW"));
        // Price, yield, overall CAGR and six windows
        assert_eq!(line.matches("N/A").count(), 9);
        assert_eq!(header().chars().count(), line.chars().count());
    }
}
