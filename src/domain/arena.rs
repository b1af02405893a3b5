//! Arena-backed ledger forest.

use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::entities::BALANCE_TOLERANCE;

/// Data payload of a ledger node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    /// Unique across the whole forest
    pub id: String,
    /// Display name, no role in allocation
    pub label: String,
    /// Current quantity; derived for internal nodes
    pub value: f64,
    /// Baseline captured at construction, never written afterwards
    original_value: f64,
}

impl NodeData {
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: f64, original_value: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value,
            original_value,
        }
    }

    pub fn original_value(&self) -> f64 {
        self.original_value
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.id)
    }
}

/// Node in the arena-based forest.
#[derive(Debug, Clone)]
pub struct LedgerNode {
    pub data: NodeData,
    /// Indices of child nodes in the arena, in seed order
    pub children: Vec<Index>,
}

impl LedgerNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Ordered collection of independent ledger trees sharing one arena.
///
/// `Clone` produces a fully independent deep copy: the arena owns every node
/// by value and links are plain indices, so nothing is shared between the
/// copy and the original.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    arena: Arena<LedgerNode>,
    roots: Vec<Index>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node; `None` parent appends a new root.
    ///
    /// Only the builder shapes the forest; after construction the node set is
    /// fixed.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = LedgerNode {
            data,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&LedgerNode> {
        self.arena.get(idx)
    }

    /// Mutable node access for the allocation passes; the child lists must
    /// not be changed through it.
    pub(crate) fn get_node_mut(&mut self, idx: Index) -> Option<&mut LedgerNode> {
        self.arena.get_mut(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Depth-first lookup by id: roots in order, children in order, first
    /// match wins.
    ///
    /// The returned index addresses this forest only, not its clones.
    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, id: &str) -> Option<Index> {
        self.iter()
            .find(|(_, node)| node.data.id == id)
            .map(|(idx, _)| idx)
    }

    pub fn find_node(&self, id: &str) -> Option<&LedgerNode> {
        self.find(id).and_then(|idx| self.get_node(idx))
    }

    /// Pre-order traversal across all roots.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Post-order traversal across all roots (children before parents).
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of levels of the deepest tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Ids of all leaves in tree order.
    pub fn leaf_ids(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.data.id.clone())
            .collect()
    }

    /// Internal nodes whose value differs from the sum of their children by
    /// more than [`BALANCE_TOLERANCE`]. A NaN difference counts as a
    /// mismatch.
    pub fn unbalanced_nodes(&self) -> Vec<String> {
        self.iter_postorder()
            .filter(|(_, node)| !node.is_leaf())
            .filter(|(_, node)| {
                let sum: f64 = node
                    .children
                    .iter()
                    .filter_map(|&c| self.get_node(c))
                    .map(|c| c.data.value)
                    .sum();
                let diff = (node.data.value - sum).abs();
                diff.is_nan() || diff > BALANCE_TOLERANCE
            })
            .map(|(_, node)| node.data.id.clone())
            .collect()
    }

    pub fn is_balanced(&self) -> bool {
        self.unbalanced_nodes().is_empty()
    }

    /// True when no node holds an infinite or NaN value.
    pub fn is_finite(&self) -> bool {
        self.iter().all(|(_, node)| node.data.value.is_finite())
    }

    /// `(id, value)` of every node in tree order.
    pub fn values(&self) -> Vec<(String, f64)> {
        self.iter()
            .map(|(_, node)| (node.data.id.clone(), node.data.value))
            .collect()
    }
}

pub struct TreeIterator<'a> {
    forest: &'a Forest,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        // Roots in reverse so the first root is popped first
        let stack = forest.roots.iter().rev().copied().collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a LedgerNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    forest: &'a Forest,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        let stack = forest.roots.iter().rev().map(|&r| (r, false)).collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a LedgerNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
