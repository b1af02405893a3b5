//! Read-back views of a forest: flat rows, nested report, grand totals and
//! termtree rendering.

use generational_arena::Index;
use serde::Serialize;
use termtree::Tree;

use crate::domain::arena::Forest;
use crate::domain::entities::{format_variance, variance};

/// One line of the flattened ledger, in tree order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerRow {
    pub id: String,
    pub label: String,
    /// 0 for roots
    pub depth: usize,
    pub value: f64,
    pub original_value: f64,
    pub variance: f64,
    pub is_leaf: bool,
}

/// Nested read-back of one node and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: String,
    pub label: String,
    pub value: f64,
    pub original_value: f64,
    pub variance: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeView>,
}

/// Forest-wide sums over the roots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub grand_total: f64,
    pub original_total: f64,
    /// Unguarded: NaN when `original_total` is zero
    pub variance: f64,
}

impl Totals {
    /// `variance` unless it is NaN or infinite.
    pub fn checked_variance(&self) -> Option<f64> {
        Some(self.variance).filter(|v| v.is_finite())
    }
}

/// Everything the presentation layer reads back after an edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub totals: Totals,
    pub nodes: Vec<NodeView>,
}

impl Forest {
    pub fn rows(&self) -> Vec<LedgerRow> {
        let mut rows = Vec::with_capacity(self.len());
        for &root in self.roots() {
            self.collect_rows(root, 0, &mut rows);
        }
        rows
    }

    fn collect_rows(&self, idx: Index, depth: usize, rows: &mut Vec<LedgerRow>) {
        if let Some(node) = self.get_node(idx) {
            let data = &node.data;
            rows.push(LedgerRow {
                id: data.id.clone(),
                label: data.label.clone(),
                depth,
                value: data.value,
                original_value: data.original_value(),
                variance: variance(data.value, data.original_value()),
                is_leaf: node.is_leaf(),
            });
            for &child in &node.children {
                self.collect_rows(child, depth + 1, rows);
            }
        }
    }

    pub fn totals(&self) -> Totals {
        let (grand_total, original_total) = self
            .roots()
            .iter()
            .filter_map(|&r| self.get_node(r))
            .fold((0.0, 0.0), |(value, original), node| {
                (value + node.data.value, original + node.data.original_value())
            });
        Totals {
            grand_total,
            original_total,
            variance: (grand_total - original_total) / original_total * 100.0,
        }
    }

    pub fn report(&self) -> Report {
        Report {
            totals: self.totals(),
            nodes: self
                .roots()
                .iter()
                .filter_map(|&r| self.node_view(r))
                .collect(),
        }
    }

    fn node_view(&self, idx: Index) -> Option<NodeView> {
        let node = self.get_node(idx)?;
        Some(NodeView {
            id: node.data.id.clone(),
            label: node.data.label.clone(),
            value: node.data.value,
            original_value: node.data.original_value(),
            variance: variance(node.data.value, node.data.original_value()),
            children: node
                .children
                .iter()
                .filter_map(|&c| self.node_view(c))
                .collect(),
        })
    }
}

/// Conversion into printable `termtree` trees, one per root.
pub trait ForestConvert {
    fn to_tree_string(&self, decimals: usize) -> Vec<Tree<String>>;
}

impl ForestConvert for Forest {
    fn to_tree_string(&self, decimals: usize) -> Vec<Tree<String>> {
        fn build_tree(forest: &Forest, idx: Index, decimals: usize) -> Option<Tree<String>> {
            let node = forest.get_node(idx)?;
            let data = &node.data;
            let text = format!(
                "{}  {:.*}  [{}]",
                data.label,
                decimals,
                data.value,
                format_variance(data.value, data.original_value())
            );
            let leaves: Vec<_> = node
                .children
                .iter()
                .filter_map(|&c| build_tree(forest, c, decimals))
                .collect();
            Some(Tree::new(text).with_leaves(leaves))
        }

        self.roots()
            .iter()
            .filter_map(|&r| build_tree(self, r, decimals))
            .collect()
    }
}
