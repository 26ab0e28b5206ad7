//! Calculate hot paths from collapsed stacks.
//!
//! Hot paths are the complete call chains that were sampled most often.
//! These are the primary targets for optimization.

use super::stack_builder::CollapsedStack;
use log::debug;
use serde::{Deserialize, Serialize};

/// A complete call chain and its share of all samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotPath {
    /// Collapsed stack representation (e.g., "main;parse;read_line")
    pub stack: String,

    /// Samples of this exact chain
    pub count: u64,

    /// Percentage of all samples
    pub percentage: f64,
}

/// Calculate hot paths from collapsed stacks
///
/// **Public** - main entry point for metrics calculation
///
/// # Arguments
/// * `stacks` - Collapsed stacks from stack_builder
/// * `total_samples` - Sum of all sample counts
/// * `top_n` - Number of top paths to return (e.g., 10)
///
/// # Returns
/// Vector of hot paths, sorted by sample count (descending)
pub fn calculate_hot_paths(
    stacks: &[CollapsedStack],
    total_samples: u64,
    top_n: usize,
) -> Vec<HotPath> {
    debug!("Calculating top {} hot paths from {} stacks", top_n, stacks.len());

    // Stacks are already sorted by weight from stack_builder
    stacks
        .iter()
        .take(top_n)
        .map(|stack| create_hot_path(stack, total_samples))
        .collect()
}

/// Create a HotPath from a CollapsedStack
pub fn create_hot_path(stack: &CollapsedStack, total_samples: u64) -> HotPath {
    HotPath {
        stack: stack.stack.clone(),
        count: stack.weight,
        percentage: percentage(stack.weight, total_samples),
    }
}

/// `part` as a percentage of `whole`, 0 when `whole` is 0
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole > 0 {
        (part as f64 / whole as f64) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_hot_paths() {
        let stacks = vec![
            CollapsedStack::new("main;execute".to_string(), 50),
            CollapsedStack::new("main;parse".to_string(), 30),
            CollapsedStack::new("main;compute".to_string(), 20),
        ];

        let hot_paths = calculate_hot_paths(&stacks, 100, 2);

        assert_eq!(hot_paths.len(), 2);
        assert_eq!(hot_paths[0].stack, "main;execute");
        assert_eq!(hot_paths[0].count, 50);
        assert_eq!(hot_paths[0].percentage, 50.0);
    }

    #[test]
    fn test_percentage_of_zero() {
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }
}
