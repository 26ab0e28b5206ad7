//! Fold raw stack samples into a call tree.
//!
//! Each sample is inserted root-first into a trie keyed by symbol text,
//! so addresses that resolve to the same name share a node. Nodes live in
//! an `indextree` arena; parent links are arena ids used for upward
//! navigation only.
//!
//! Example: samples `[bar, foo, main] x5` and `[baz, main] x2` give
//!
//! ```text
//! <> (7)
//! └─ main (7)
//!    ├─ foo (5)
//!    │  └─ bar (5)
//!    └─ baz (2)
//! ```

use super::metrics::percentage;
use crate::parser::schema::{total_count, RawSample, SymbolTable};
use crate::utils::config::ROOT_LOCATION;
use indextree::{Arena, NodeEdge, NodeId};
use log::debug;
use serde::{Deserialize, Serialize};

/// Data stored at one call tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallTreeFrame {
    /// Symbol name, or [`ROOT_LOCATION`] for the root
    pub location: String,

    /// Samples whose call chain passes through this node
    pub count: u64,

    /// Grand total of all samples (same value on every node)
    pub total: u64,
}

impl CallTreeFrame {
    fn new(location: &str, count: u64, total: u64) -> Self {
        Self {
            location: location.to_string(),
            count,
            total,
        }
    }

    /// Share of all samples passing through this node, in percent
    pub fn percentage(&self) -> f64 {
        percentage(self.count, self.total)
    }
}

/// Arena-backed call tree with a synthetic root
#[derive(Debug)]
pub struct CallTree {
    arena: Arena<CallTreeFrame>,
    root: NodeId,
}

/// Build the call tree for `samples`
///
/// **Public** - main entry point for aggregation
///
/// `symbols` only sizes the arena; frames are matched by their already
/// resolved text. Never fails: an empty sample list gives a lone root
/// with zero counts.
pub fn aggregate(symbols: &SymbolTable, samples: &[RawSample]) -> CallTree {
    let grand_total = total_count(samples);

    debug!(
        "Aggregating {} samples ({} total) into call tree",
        samples.len(),
        grand_total
    );

    let mut arena = Arena::with_capacity(symbols.len() + 1);
    let root = arena.new_node(CallTreeFrame::new(ROOT_LOCATION, grand_total, grand_total));
    let mut tree = CallTree { arena, root };

    for sample in samples {
        tree.insert(sample, grand_total);
    }
    tree.sort_children();

    debug!("Call tree has {} nodes", tree.node_count());

    tree
}

impl CallTree {
    fn insert(&mut self, sample: &RawSample, grand_total: u64) {
        let mut current = self.root;

        for location in sample.root_first() {
            let child = match self.find_child(current, location) {
                Some(child) => child,
                None => {
                    let node = self
                        .arena
                        .new_node(CallTreeFrame::new(location, 0, grand_total));
                    current.append(node, &mut self.arena);
                    node
                }
            };

            let frame = self.arena[child].get_mut();
            frame.count = frame.count.saturating_add(u64::from(sample.count));
            frame.total = grand_total;

            current = child;
        }
    }

    /// Order every node's children by count, heaviest first (stable on ties)
    fn sort_children(&mut self) {
        let parents: Vec<NodeId> = self.root.descendants(&self.arena).collect();

        for parent in parents {
            let mut children: Vec<NodeId> = parent.children(&self.arena).collect();
            if children.len() < 2 {
                continue;
            }

            children.sort_by(|a, b| {
                self.arena[*b]
                    .get()
                    .count
                    .cmp(&self.arena[*a].get().count)
            });

            for &child in &children {
                child.detach(&mut self.arena);
            }
            for child in children {
                parent.append(child, &mut self.arena);
            }
        }
    }

    fn find_child(&self, parent: NodeId, location: &str) -> Option<NodeId> {
        parent
            .children(&self.arena)
            .find(|&child| self.arena[child].get().location == location)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Frame data of `id`
    ///
    /// # Panics
    /// If `id` was not produced by this tree.
    pub fn frame(&self, id: NodeId) -> &CallTreeFrame {
        self.arena[id].get()
    }

    pub fn get(&self, id: NodeId) -> Option<&CallTreeFrame> {
        self.arena.get(id).map(|node| node.get())
    }

    /// Children of `id`, heaviest first
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.parent())
    }

    /// Depth-first walk yielding a start and an end edge per node
    pub fn traverse(&self) -> impl Iterator<Item = NodeEdge> + '_ {
        self.root.traverse(&self.arena)
    }

    pub fn is_last_sibling(&self, id: NodeId) -> bool {
        self.arena[id].next_sibling().is_none()
    }

    /// Grand total of all samples
    pub fn total(&self) -> u64 {
        self.frame(self.root).total
    }

    /// Number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.arena.count()
    }

    /// Depth of the deepest node (root is depth 0)
    pub fn max_depth(&self) -> usize {
        self.root
            .descendants(&self.arena)
            .map(|id| id.ancestors(&self.arena).count() - 1)
            .max()
            .unwrap_or(0)
    }

    /// Samples that stopped at this node rather than in a callee
    ///
    /// Every sample counted by a child is also counted by its parent, so
    /// the subtraction cannot go below zero for a tree built by
    /// [`aggregate`].
    pub fn self_count(&self, id: NodeId) -> u64 {
        let children = self
            .children(id)
            .fold(0u64, |acc, c| acc.saturating_add(self.frame(c).count));
        self.frame(id).count.saturating_sub(children)
    }

    /// Locations from the outermost caller down to `id`, root sentinel excluded
    pub fn path_to(&self, id: NodeId) -> Vec<&str> {
        let mut path: Vec<&str> = id
            .ancestors(&self.arena)
            .filter(|&ancestor| ancestor != self.root)
            .map(|ancestor| self.frame(ancestor).location.as_str())
            .collect();
        path.reverse();
        path
    }

    /// Follow `path` (root-first locations) down from the root
    pub fn find_path(&self, path: &[&str]) -> Option<NodeId> {
        path.iter()
            .try_fold(self.root, |node, location| self.find_child(node, location))
    }

    /// Owned nested copy of the tree, suitable for serialization
    pub fn to_node(&self) -> CallTreeNode {
        self.build_node(self.root)
    }

    fn build_node(&self, id: NodeId) -> CallTreeNode {
        let frame = self.frame(id);
        CallTreeNode {
            location: frame.location.clone(),
            count: frame.count,
            total: frame.total,
            self_count: self.self_count(id),
            children: self.children(id).map(|child| self.build_node(child)).collect(),
        }
    }
}

/// Nested, owned view of a call tree node and its subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallTreeNode {
    pub location: String,
    pub count: u64,
    pub total: u64,
    pub self_count: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CallTreeNode>,
}
