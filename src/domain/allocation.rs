//! Proportional allocation down a tree and total recalculation up it.
//!
//! `distribute` leaves internal values stale; `recalc` restores
//! parent = sum(children). [`apply_edit`] runs both in order on a copy of the
//! forest and is the only entry point edits should use.

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::domain::arena::Forest;
use crate::domain::entities::{round_to, ALLOCATION_DECIMALS};

/// Push `new_value` down the subtree at `idx`, keeping each child's share of
/// its parent's pre-edit total.
///
/// Leaves take the value as is. Children of a zero-total parent split evenly.
/// Every level rounds to [`ALLOCATION_DECIMALS`] places independently, so deep
/// trees can carry rounding drift; nothing rebalances it.
///
/// Internal node values are NOT updated; run [`recalc`] on every root
/// afterwards.
#[instrument(level = "trace", skip(forest))]
pub fn distribute(forest: &mut Forest, idx: Index, new_value: f64) {
    let Some(node) = forest.get_node_mut(idx) else {
        return;
    };
    if node.is_leaf() {
        trace!(id = %node.data.id, new_value, "set leaf");
        node.data.value = new_value;
        return;
    }
    let children = node.children.clone();

    // Snapshot pre-edit shares before any child is touched
    let shares: Vec<(Index, f64)> = children
        .iter()
        .filter_map(|&c| forest.get_node(c).map(|n| (c, n.data.value)))
        .collect();
    let total: f64 = shares.iter().map(|(_, v)| v).sum();
    let count = shares.len() as f64;

    for (child, value) in shares {
        let ratio = if total == 0.0 { 1.0 / count } else { value / total };
        distribute(forest, child, round_to(new_value * ratio, ALLOCATION_DECIMALS));
    }
}

/// Recompute the subtree at `idx` bottom-up and return its value.
///
/// Leaves return their value unchanged; internal nodes become the sum of
/// their recalculated children.
#[instrument(level = "trace", skip(forest))]
pub fn recalc(forest: &mut Forest, idx: Index) -> f64 {
    let children = match forest.get_node(idx) {
        Some(node) if node.is_leaf() => return node.data.value,
        Some(node) => node.children.clone(),
        None => return 0.0,
    };

    let total: f64 = children.iter().map(|&c| recalc(forest, c)).sum();
    if let Some(node) = forest.get_node_mut(idx) {
        node.data.value = total;
    }
    total
}

/// Run [`recalc`] on every root of the forest.
pub fn recalc_all(forest: &mut Forest) {
    let roots = forest.roots().to_vec();
    for root in roots {
        recalc(forest, root);
    }
}

/// Set the node `id` to `new_value` and return the rebalanced forest.
///
/// Precondition: `forest` satisfies parent = sum(children).
/// Postcondition: the returned forest does too, `original_value`s and shape
/// are untouched, and `forest` itself is unchanged.
///
/// An unknown id yields an identical copy.
pub fn apply_edit(forest: &Forest, id: &str, new_value: f64) -> Forest {
    let mut next = forest.clone();
    match next.find(id) {
        Some(idx) => {
            debug!(id, new_value, "distribute");
            distribute(&mut next, idx, new_value);
        }
        None => debug!(id, "edit target not found"),
    }
    recalc_all(&mut next);
    next
}

/// Target value of a percentage edit: `current * (1 + percent / 100)`,
/// rounded to [`ALLOCATION_DECIMALS`] places.
pub fn scaled_value(current: f64, percent: f64) -> f64 {
    round_to(current * (1.0 + percent / 100.0), ALLOCATION_DECIMALS)
}
