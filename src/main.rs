//! pprof-calltree CLI
//!
//! Decodes papertrail pprof dumps and reports where the samples went:
//! an indented call tree, hot methods, hot paths and flamegraphs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use pprof_calltree::commands::{
    display_version, execute_analyze, validate_args, validate_report_file, AnalyzeArgs,
};
use pprof_calltree::flamegraph::FlamegraphConfig;
use pprof_calltree::utils::config::{DEFAULT_ENCODING, DEFAULT_FLAMEGRAPH_WIDTH, DEFAULT_TOP_ENTRIES};

/// pprof-calltree - call tree analysis for papertrail pprof dumps
#[derive(Parser, Debug)]
#[command(name = "pprof-calltree")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a dump and analyze its samples
    Analyze {
        /// pprof dump to decode
        #[arg(short, long)]
        file: PathBuf,

        /// Charset of the dump's text sections (WHATWG label)
        ///
        /// Labels follow the WHATWG Encoding Standard.
        /// "UTF-16" reads little-endian and does not sniff a byte order mark;
        /// pass "UTF-16BE" for big-endian dumps. "ISO-8859-1" and "latin1"
        /// decode as windows-1252, which differs in the 0x80-0x9F range.
        #[arg(short, long, default_value = DEFAULT_ENCODING, env = "PPROF_CHARSET")]
        charset: String,

        /// Print the indented call tree
        #[arg(long)]
        tree: bool,

        /// Print hot methods and hot paths
        #[arg(long)]
        hot: bool,

        /// Number of hot methods and paths to keep
        #[arg(long, default_value_t = DEFAULT_TOP_ENTRIES)]
        top: usize,

        /// Output path for JSON report (optional)
        #[arg(long)]
        json: Option<PathBuf>,

        /// Output path for SVG flamegraph (optional)
        #[arg(long)]
        flamegraph: Option<PathBuf>,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Flamegraph width in pixels
        #[arg(long, default_value_t = DEFAULT_FLAMEGRAPH_WIDTH)]
        width: usize,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            file,
            charset,
            tree,
            hot,
            top,
            json,
            flamegraph,
            title,
            width,
        } => {
            // Create flamegraph config
            let fg_config = if flamegraph.is_some() {
                let mut config = FlamegraphConfig::new().with_width(width);

                if let Some(title_str) = title {
                    config = config.with_title(title_str);
                }

                Some(config)
            } else {
                None
            };

            let args = AnalyzeArgs {
                file,
                encoding: charset,
                print_tree: tree,
                print_hot: hot,
                top,
                output_json: json,
                output_svg: flamegraph,
                flamegraph_config: fg_config,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
