//! Per-method self and total sample counts.
//!
//! The call tree answers "where was this called from"; the hot-method
//! list flattens it per location:
//! - self: samples whose leaf frame was this method
//! - total: samples with this method anywhere on the stack

use super::call_tree::CallTree;
use indextree::NodeEdge;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Flat statistics for one location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotMethod {
    pub location: String,
    pub self_count: u64,
    pub total_count: u64,
}

/// Collect self/total counts for every location in `tree`
///
/// **Public** - main entry point for the hot-method view
///
/// A recursive method appears on several nodes of one call chain; only
/// the outermost occurrence adds to its total so a sample is never
/// counted twice.
///
/// # Returns
/// Methods sorted by self count, then total count (both descending),
/// then location
pub fn hot_methods(tree: &CallTree) -> Vec<HotMethod> {
    let root = tree.root();
    let mut counts: HashMap<&str, (u64, u64)> = HashMap::new();
    let mut active: Vec<&str> = Vec::new();

    for edge in tree.traverse() {
        match edge {
            NodeEdge::Start(id) if id != root => {
                let frame = tree.frame(id);
                let location = frame.location.as_str();
                let entry = counts.entry(location).or_insert((0, 0));

                entry.0 = entry.0.saturating_add(tree.self_count(id));
                if !active.contains(&location) {
                    entry.1 = entry.1.saturating_add(frame.count);
                }
                active.push(location);
            }
            NodeEdge::End(id) if id != root => {
                active.pop();
            }
            _ => {}
        }
    }

    let mut methods: Vec<HotMethod> = counts
        .into_iter()
        .map(|(location, (self_count, total_count))| HotMethod {
            location: location.to_string(),
            self_count,
            total_count,
        })
        .collect();

    methods.sort_by(|a, b| {
        b.self_count
            .cmp(&a.self_count)
            .then_with(|| b.total_count.cmp(&a.total_count))
            .then_with(|| a.location.cmp(&b.location))
    });

    debug!("Collected {} hot methods", methods.len());

    methods
}
