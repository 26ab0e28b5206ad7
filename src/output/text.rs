//! Plain-text renderings for the terminal.
//!
//! `render_indented` is the non-interactive call tree view:
//!
//! ```text
//! + [   10/   10] <>
//!    + [   10/   10] main
//!       + [    7/   10] bar
//!       |  + [    7/   10] read
//!       + [    3/   10] foo
//! ```

use crate::aggregator::call_tree::CallTree;
use crate::aggregator::hot_methods::HotMethod;
use crate::aggregator::metrics::{percentage, HotPath};
use indextree::NodeEdge;

const BRANCH: &str = "|  ";
const BLANK: &str = "   ";

/// Render the call tree as indented lines, one per node, root first
///
/// Each line is `<indent>+ [count/total] location`, the numbers printed
/// like C's `% 5d`. Descendants of a node that has later siblings are
/// indented with `"|  "`, all others with `"   "`.
pub fn render_indented(tree: &CallTree) -> Vec<String> {
    let mut lines = Vec::with_capacity(tree.node_count());
    let mut prefix = String::new();
    let mut prefix_lengths: Vec<usize> = Vec::new();

    for edge in tree.traverse() {
        match edge {
            NodeEdge::Start(id) => {
                let frame = tree.frame(id);
                lines.push(format!(
                    "{}+ [{}/{}] {}",
                    prefix,
                    space_flagged(frame.count),
                    space_flagged(frame.total),
                    frame.location
                ));

                prefix_lengths.push(prefix.len());
                if id != tree.root() && !tree.is_last_sibling(id) {
                    prefix.push_str(BRANCH);
                } else {
                    prefix.push_str(BLANK);
                }
            }
            NodeEdge::End(_) => {
                let len = prefix_lengths.pop().unwrap_or(0);
                prefix.truncate(len);
            }
        }
    }

    lines
}

/// `% 5d`: a leading blank in place of the sign, right-aligned to 5
fn space_flagged(value: u64) -> String {
    format!("{:>5}", format!(" {}", value))
}

/// Table of the heaviest methods by self count
pub fn render_hot_methods(methods: &[HotMethod], total_samples: u64, limit: usize) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("  HOT METHODS".to_string());
    lines.push(format!("  ┏{}┳{}┳{}┓", "━".repeat(52), "━".repeat(18), "━".repeat(18)));
    lines.push(format!(
        "  ┃ {:<50} ┃ {:^16} ┃ {:^16} ┃",
        "Location", "Total", "Self"
    ));
    lines.push(format!("  ┣{}╋{}╋{}┫", "━".repeat(52), "━".repeat(18), "━".repeat(18)));

    for method in methods.iter().take(limit) {
        lines.push(format!(
            "  ┃ {:<50} ┃ {:>8} {:>6.1}% ┃ {:>8} {:>6.1}% ┃",
            truncate_front(&method.location, 50),
            method.total_count,
            percentage(method.total_count, total_samples),
            method.self_count,
            percentage(method.self_count, total_samples)
        ));
    }

    lines.push(format!("  ┗{}┻{}┻{}┛", "━".repeat(52), "━".repeat(18), "━".repeat(18)));

    if methods.len() > limit {
        lines.push(format!("   (Showing top {} of {} methods)", limit, methods.len()));
    }

    lines
}

/// Ranked list of the heaviest complete call chains
pub fn render_hot_paths(paths: &[HotPath]) -> Vec<String> {
    let mut lines = vec!["  HOT PATHS".to_string()];

    for (rank, path) in paths.iter().enumerate() {
        lines.push(format!(
            "  {:>3}. {:>8} {:>6.1}%  {}",
            rank + 1,
            path.count,
            path.percentage,
            path.stack
        ));
    }

    lines
}

/// Keep the tail of `text` so it fits `width` characters
fn truncate_front(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        text.to_string()
    } else {
        let tail: String = text.chars().skip(len - (width - 3)).collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_flagged() {
        assert_eq!(space_flagged(5), "    5");
        assert_eq!(space_flagged(1234), " 1234");
        assert_eq!(space_flagged(12345), " 12345");
        assert_eq!(space_flagged(0), "    0");
    }

    #[test]
    fn test_truncate_front() {
        assert_eq!(truncate_front("short", 10), "short");
        assert_eq!(truncate_front("abcdefghij", 6), "...hij");
        assert_eq!(truncate_front("ääääää", 5), "...ää");
    }

    #[test]
    fn test_render_hot_methods_limit() {
        let methods = vec![
            HotMethod {
                location: "a".to_string(),
                self_count: 3,
                total_count: 4,
            },
            HotMethod {
                location: "b".to_string(),
                self_count: 1,
                total_count: 1,
            },
        ];
        let lines = render_hot_methods(&methods, 4, 1);

        assert!(lines.iter().any(|l| l.contains(" a ") && l.contains("75.0%")));
        assert!(!lines.iter().any(|l| l.contains(" b ")));
        assert_eq!(lines.last().unwrap(), "   (Showing top 1 of 2 methods)");
    }

    #[test]
    fn test_render_hot_paths() {
        let paths = vec![HotPath {
            stack: "main;foo".to_string(),
            count: 3,
            percentage: 30.0,
        }];
        let lines = render_hot_paths(&paths);
        assert_eq!(lines[1], "    1.        3   30.0%  main;foo");
    }
}
