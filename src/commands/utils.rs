use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use log::warn;
use std::path::Path;

/// Validate a report JSON file
pub fn validate_report_file(file_path: &Path) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    if report.version != SCHEMA_VERSION {
        warn!(
            "Report schema v{} differs from current v{}",
            report.version, SCHEMA_VERSION
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Binary: {}", report.binary);
    println!("  Encoding: {}", report.encoding);
    println!("  Total Samples: {}", report.total_samples);
    println!("  Symbols: {}", report.symbol_count);
    println!("  Hot Methods: {}", report.hot_methods.len());
    println!("  Hot Paths: {}", report.hot_paths.len());

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("pprof-calltree v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Call tree and hot-spot analysis for papertrail pprof dumps.");
}
