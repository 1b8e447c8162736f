//! CLI subcommand modules.
//!
//! This module contains the implementations for all divgrowth CLI subcommands.

pub(crate) mod filter;
pub(crate) mod stats;

/// Print a boxed section title.
pub(crate) fn banner(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{title:^62}║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}

/// Two decimals, or `N/A` for no value.
pub(crate) fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}
