//! SVG flamegraph generation through inferno.

use crate::aggregator::stack_builder::CollapsedStack;
use crate::utils::config::DEFAULT_FLAMEGRAPH_WIDTH;
use crate::utils::error::FlamegraphError;
use inferno::flamegraph::{self, Options};
use log::{debug, info};

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub width: usize,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "CPU Profile".to_string(),
            width: DEFAULT_FLAMEGRAPH_WIDTH,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    fn to_options(&self) -> Options<'static> {
        let mut options = Options::default();
        options.title = self.title.clone();
        options.count_name = "samples".to_string();
        options.image_width = Some(self.width);
        // Same input, same bytes
        options.deterministic = true;
        options
    }
}

/// Generate an SVG flamegraph from collapsed stacks
///
/// Stacks with zero weight are left out. Returns
/// `FlamegraphError::EmptyStacks` when nothing with weight remains.
pub fn generate_flamegraph(
    stacks: &[CollapsedStack],
    config: Option<&FlamegraphConfig>,
) -> Result<String, FlamegraphError> {
    let lines: Vec<String> = stacks
        .iter()
        .filter(|stack| stack.weight > 0)
        .map(CollapsedStack::to_line)
        .collect();

    if lines.is_empty() {
        return Err(FlamegraphError::EmptyStacks);
    }

    let config = config.cloned().unwrap_or_default();
    info!("Generating flamegraph with {} stacks", lines.len());

    let mut options = config.to_options();
    let mut svg = Vec::new();

    flamegraph::from_lines(&mut options, lines.iter().map(String::as_str), &mut svg)
        .map_err(|e| FlamegraphError::GenerationFailed(e.to_string()))?;

    let svg = String::from_utf8(svg)
        .map_err(|e| FlamegraphError::GenerationFailed(format!("SVG is not UTF-8: {}", e)))?;

    debug!("Flamegraph generated ({} bytes)", svg.len());
    Ok(svg)
}
