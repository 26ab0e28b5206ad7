//! pprof-calltree
//!
//! Decoder for papertrail "pprof" profiler dumps and a call-tree
//! aggregator over the decoded samples.
//!
//! A dump holds a text symbol section (address to name) followed by a
//! binary stream of sampled stack traces. [`parser::decode`] turns it into
//! a [`parser::DecodedTrace`], and [`aggregator::aggregate`] folds the
//! samples into a [`aggregator::CallTree`] whose children are ordered
//! heaviest first.
//!
//! ## Getting Started
//!
//! ```ignore
//! use pprof_calltree::{aggregator, output, parser};
//!
//! let trace = parser::decode("cpu.pprof", "UTF-8")?;
//! let tree = aggregator::aggregate(&trace.symbols, &trace.samples);
//! for line in output::render_indented(&tree) {
//!     println!("{}", line);
//! }
//! ```
//!
//! The `pprof-calltree` binary wraps the same pipeline:
//!
//! ```bash
//! pprof-calltree analyze -f cpu.pprof --tree --hot --json report.json
//! ```

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod parser;
pub mod utils;
