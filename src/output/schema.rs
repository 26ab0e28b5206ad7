//! Output JSON schema for analysis reports.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::call_tree::{CallTree, CallTreeNode};
use crate::aggregator::hot_methods::HotMethod;
use crate::aggregator::metrics::HotPath;
use crate::parser::schema::DecodedTrace;
use crate::utils::config::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Profiled binary, from the dump's `binary=` line
    pub binary: String,

    /// Charset the text sections were decoded with
    pub encoding: String,

    /// Sum of all sample counts
    pub total_samples: u64,

    /// Number of sample records in the dump
    pub sample_count: usize,

    pub symbol_count: usize,

    /// Methods ranked by self count
    pub hot_methods: Vec<HotMethod>,

    /// Heaviest complete call chains
    pub hot_paths: Vec<HotPath>,

    pub call_tree: CallTreeNode,

    /// Timestamp when report was generated
    pub generated_at: String,
}

impl Report {
    /// Assemble a report from a decoded dump and its analysis
    pub fn new(
        trace: &DecodedTrace,
        tree: &CallTree,
        hot_methods: Vec<HotMethod>,
        hot_paths: Vec<HotPath>,
    ) -> Self {
        use chrono::Utc;

        Self {
            version: SCHEMA_VERSION.to_string(),
            binary: trace.binary.clone(),
            encoding: trace.encoding.clone(),
            total_samples: tree.total(),
            sample_count: trace.samples.len(),
            symbol_count: trace.symbols.len(),
            hot_methods,
            hot_paths,
            call_tree: tree.to_node(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}
