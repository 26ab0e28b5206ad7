//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Decodes the pprof dump
//! 2. Aggregates samples into a call tree
//! 3. Ranks hot methods and hot paths
//! 4. Generates flamegraph
//! 5. Writes output files and terminal views

use crate::aggregator::{aggregate, build_collapsed_stacks, calculate_hot_paths, hot_methods};
use crate::flamegraph::{generate_flamegraph, FlamegraphConfig};
use crate::output::{render_hot_methods, render_hot_paths, render_indented, write_report, write_svg, Report};
use crate::parser::{decode, resolve_encoding};
use crate::utils::config::{DEFAULT_ENCODING, DEFAULT_TOP_ENTRIES, MAX_TOP_ENTRIES};
use crate::utils::error::FlamegraphError;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// pprof dump to decode
    pub file: PathBuf,

    /// Charset label of the dump's text sections
    pub encoding: String,

    /// Print the indented call tree to stdout
    pub print_tree: bool,

    /// Print the hot-method table and hot paths to stdout
    pub print_hot: bool,

    /// Number of hot methods and hot paths to keep
    pub top: usize,

    /// Output path for JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Output path for SVG flamegraph (optional)
    pub output_svg: Option<PathBuf>,

    /// Flamegraph configuration
    pub flamegraph_config: Option<FlamegraphConfig>,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            file: PathBuf::new(),
            encoding: DEFAULT_ENCODING.to_string(),
            print_tree: false,
            print_hot: false,
            top: DEFAULT_TOP_ENTRIES,
            output_json: None,
            output_svg: None,
            flamegraph_config: None,
        }
    }
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unknown charset or undecodable dump
/// * Flamegraph generation failures
/// * File write errors
///
/// # Example
/// ```ignore
/// let args = AnalyzeArgs {
///     file: PathBuf::from("cpu.pprof"),
///     print_tree: true,
///     output_json: Some(PathBuf::from("report.json")),
///     ..Default::default()
/// };
///
/// execute_analyze(args)?;
/// ```
pub fn execute_analyze(args: AnalyzeArgs) -> Result<Report> {
    let start_time = Instant::now();

    info!("Analyzing profile: {}", args.file.display());

    // Step 1: Decode
    info!("Step 1/5: Decoding dump ({})...", args.encoding);
    let trace = decode(&args.file, &args.encoding)
        .with_context(|| format!("Failed to decode {}", args.file.display()))?;

    info!(
        "Decoded {} symbols and {} samples from {}",
        trace.symbols.len(),
        trace.samples.len(),
        trace.binary
    );

    // Step 2: Build call tree
    info!("Step 2/5: Aggregating call tree...");
    let tree = aggregate(&trace.symbols, &trace.samples);

    debug!(
        "Call tree: {} nodes, depth {}, {} total samples",
        tree.node_count(),
        tree.max_depth(),
        tree.total()
    );

    // Step 3: Rank
    info!("Step 3/5: Ranking top {} methods and paths...", args.top);
    let methods = hot_methods(&tree);
    let stacks = build_collapsed_stacks(&trace.samples);

    let hot_paths = calculate_hot_paths(&stacks, tree.total(), args.top);

    // Step 4: Generate flamegraph (if requested)
    let svg_content = match &args.output_svg {
        Some(_) => {
            info!("Step 4/5: Generating flamegraph...");
            match generate_flamegraph(&stacks, args.flamegraph_config.as_ref()) {
                Ok(svg) => Some(svg),
                Err(FlamegraphError::EmptyStacks) => {
                    warn!("No weighted samples in dump, skipping flamegraph");
                    None
                }
                Err(e) => return Err(e).context("Failed to generate flamegraph"),
            }
        }
        None => {
            info!("Step 4/5: Skipping flamegraph generation (not requested)");
            None
        }
    };

    // Step 5: Write outputs
    info!("Step 5/5: Writing outputs...");

    if args.print_tree {
        println!("{}", "=".repeat(80));
        println!("CALL TREE ({})", trace.binary);
        println!("{}", "=".repeat(80));
        for line in render_indented(&tree) {
            println!("{}", line);
        }
    }

    if args.print_hot {
        println!();
        for line in render_hot_methods(&methods, tree.total(), args.top) {
            println!("{}", line);
        }
        println!();
        for line in render_hot_paths(&hot_paths) {
            println!("{}", line);
        }
    }

    let top_methods = methods.into_iter().take(args.top).collect();
    let report = Report::new(&trace, &tree, top_methods, hot_paths);

    if let Some(json_path) = &args.output_json {
        write_report(&report, json_path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", json_path.display());
    }

    if let (Some(svg), Some(svg_path)) = (svg_content, &args.output_svg) {
        write_svg(&svg, svg_path).context("Failed to write flamegraph SVG")?;
        info!("✓ Flamegraph written to: {}", svg_path.display());
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.file.as_os_str().is_empty() {
        anyhow::bail!("Profile path cannot be empty");
    }

    resolve_encoding(&args.encoding).context("Invalid charset")?;

    if args.top == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if args.top > MAX_TOP_ENTRIES {
        anyhow::bail!("top is too large (max {})", MAX_TOP_ENTRIES);
    }

    if let Some(config) = &args.flamegraph_config {
        if config.width == 0 {
            anyhow::bail!("Flamegraph width must be greater than 0");
        }
    }

    Ok(())
}
