//! Stats command implementation.

use anyhow::{Result, anyhow};
use divgrowth::metrics::{CagrHorizon, MetricsConfig};
use divgrowth::{EventSource, SecurityStats, security_stats};

use super::{banner, fmt_opt};

/// Payments listed under "Recent Payments".
const RECENT_PAYMENTS: usize = 10;

/// Print the split-adjusted dividend history and metrics of one security.
pub(crate) fn show_stats(source: &dyn EventSource, symbol: &str, as_of_year: i32) -> Result<()> {
    let history = source.security(symbol)?;
    let config = MetricsConfig::default().with_as_of_year(as_of_year);
    let stats = security_stats(&history, &config)
        .ok_or_else(|| anyhow!("No dividend data found for {}", history.symbol))?;

    banner(&format!("{} Dividend Stats (Split-Adjusted)", stats.symbol));
    match stats.current_price {
        Some(price) => println!("Price:  {price:.2}"),
        None => println!("Price:  N/A"),
    }
    println!("Shares: {:.2} per original share", stats.shares);
    println!("Completed years before {as_of_year}");

    print_splits(&stats);
    print_yearly(&stats);
    print_cagr(&stats);
    print_summary(&stats);
    print_recent(&stats);
    println!();
    Ok(())
}

fn section(title: &str) {
    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{title}");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}

fn print_splits(stats: &SecurityStats) {
    if stats.splits.is_empty() {
        return;
    }
    section("STOCK SPLITS");
    println!("{:<12} {:>10}", "Ex-Date", "Ratio");
    println!("{}", "─".repeat(23));
    for split in &stats.splits {
        println!(
            "{:<12} {:>10}",
            split.ex_date.to_string(),
            format!("{}:{}", split.numerator, split.denominator)
        );
    }
}

fn print_yearly(stats: &SecurityStats) {
    section("YEARLY TOTALS (per original share)");
    if stats.yearly.is_empty() {
        println!("No completed years.");
        return;
    }
    println!("{:<6} {:>12} {:>6}", "Year", "Amount", "Count");
    println!("{}", "─".repeat(26));
    for (year, total) in stats.yearly.iter().rev() {
        println!("{year:<6} {total:>12.4} {:>6}", stats.yearly.count(year));
    }
}

fn print_cagr(stats: &SecurityStats) {
    section("CAGR");
    println!("{:<10} {:>10}", "Period", "CAGR (%)");
    println!("{}", "─".repeat(21));
    println!("{:<10} {:>10}", "Overall", fmt_opt(stats.metrics.cagr.overall));
    for horizon in CagrHorizon::ALL {
        println!(
            "{:<10} {:>10}",
            format!("{} Year", horizon.years()),
            fmt_opt(stats.metrics.window(horizon))
        );
    }
}

fn print_summary(stats: &SecurityStats) {
    let years = &stats.metrics.years;
    section("YEAR-OVER-YEAR SUMMARY");
    println!("Years Up:      {}", years.up);
    println!("Years Stalled: {}", years.stalled);
    println!("Years Reduced: {}", years.reduced);
    println!("Years Stopped: {}", years.stopped);
    println!("Yield:         {}%", fmt_opt(stats.metrics.dividend_yield));
}

fn print_recent(stats: &SecurityStats) {
    section("RECENT PAYMENTS");
    println!(
        "{:<12} {:>10} {:>10} {:>10} {:>10}",
        "Ex-Date", "Vendor", "Raw", "Accrued", "Price"
    );
    println!("{}", "─".repeat(56));
    for event in stats.recent_events(RECENT_PAYMENTS) {
        println!(
            "{:<12} {:>10.4} {:>10.4} {:>10.4} {:>10}",
            event.ex_date.to_string(),
            event.vendor_amount,
            event.raw_amount,
            event.accrued_amount,
            fmt_opt(event.raw_price)
        );
    }
}
