//! Aggregation of decoded samples into call trees and metrics.
//!
//! This module transforms decoded stack samples into:
//! - The deduplicated, count-annotated call tree
//! - Per-method self/total counts
//! - Collapsed stack format (for flamegraph generation)
//! - Hot path analysis

pub mod call_tree;
pub mod hot_methods;
pub mod metrics;
pub mod stack_builder;

// Re-export main types and functions
pub use call_tree::{aggregate, CallTree, CallTreeFrame, CallTreeNode};
pub use hot_methods::{hot_methods, HotMethod};
pub use metrics::{calculate_hot_paths, HotPath};
pub use stack_builder::{build_collapsed_stacks, CollapsedStack};
