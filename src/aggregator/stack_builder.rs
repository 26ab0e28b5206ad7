//! Build collapsed stack format from decoded samples.
//!
//! Collapsed stacks are the input format for flamegraph generation.
//! Format: "parent;child;grandchild weight"
//!
//! Example: "main;parse;read_line 1000"
//! This means: main called parse which called read_line, sampled 1000 times.

use crate::parser::schema::RawSample;
use log::debug;
use std::collections::HashMap;

/// A single collapsed stack entry
///
/// **Public** - used by flamegraph generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedStack {
    /// Stack trace as semicolon-separated string, outermost caller first
    pub stack: String,

    /// Weight (sample count of this stack)
    pub weight: u64,
}

impl CollapsedStack {
    /// Create a new collapsed stack
    ///
    /// **Public** - constructor
    pub fn new(stack: String, weight: u64) -> Self {
        Self { stack, weight }
    }

    /// Render as one line of collapsed-stack input
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }
}

/// Build collapsed stacks from decoded samples
///
/// **Public** - main entry point for stack building
///
/// # Arguments
/// * `samples` - Samples from the decoder (leaf-first frames)
///
/// # Returns
/// Vector of collapsed stacks, one per unique call chain, heaviest first
///
/// # Algorithm
/// 1. Reverse each sample's frames to root-first order
/// 2. Join with `;` (a `;` inside a symbol would split the frame, so it
///    is replaced by `:`)
/// 3. Aggregate by unique stack (sum weights)
pub fn build_collapsed_stacks(samples: &[RawSample]) -> Vec<CollapsedStack> {
    debug!("Building collapsed stacks from {} samples", samples.len());

    // Map to aggregate stacks: stack_string -> total_weight
    let mut stack_map: HashMap<String, u64> = HashMap::new();
    // First-seen order keeps equal weights deterministic
    let mut order: Vec<String> = Vec::new();

    for sample in samples {
        if sample.frames.is_empty() {
            continue;
        }

        let stack_str = sample
            .root_first()
            .map(|frame| frame.replace(';', ":"))
            .collect::<Vec<_>>()
            .join(";");

        match stack_map.get_mut(&stack_str) {
            Some(weight) => *weight = weight.saturating_add(u64::from(sample.count)),
            None => {
                stack_map.insert(stack_str.clone(), u64::from(sample.count));
                order.push(stack_str);
            }
        }
    }

    let mut stacks: Vec<CollapsedStack> = order
        .into_iter()
        .map(|stack| {
            let weight = stack_map.get(&stack).copied().unwrap_or(0);
            CollapsedStack::new(stack, weight)
        })
        .collect();

    stacks.sort_by(|a, b| b.weight.cmp(&a.weight));

    debug!("Built {} unique collapsed stacks", stacks.len());

    stacks
}
