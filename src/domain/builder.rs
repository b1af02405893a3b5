//! Forest builder: turns nested seed data into a balanced arena forest.

use std::collections::HashSet;

use generational_arena::Index;
use tracing::debug;

use crate::domain::allocation::recalc_all;
use crate::domain::arena::{Forest, NodeData};
use crate::domain::entities::SeedNode;
use crate::domain::error::DomainError;

/// Result type for forest construction.
pub type TreeResult<T> = Result<T, DomainError>;

/// Constructs a [`Forest`] from seed trees.
///
/// The seed is deep copied; the caller keeps its own data. Ids must be
/// non-empty and unique across all trees, values finite. The finished forest
/// is recalculated once so seeded parent totals that disagree with their
/// children are corrected.
#[derive(Debug, Default)]
pub struct ForestBuilder {
    seen_ids: HashSet<String>,
}

impl ForestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(&mut self, seeds: &[SeedNode]) -> TreeResult<Forest> {
        // Reset state for a fresh build
        self.seen_ids.clear();

        let mut forest = Forest::new();
        for seed in seeds {
            self.build_tree(&mut forest, seed)?;
        }
        recalc_all(&mut forest);

        debug!(
            roots = forest.roots().len(),
            nodes = forest.len(),
            "forest built"
        );
        Ok(forest)
    }

    fn build_tree(&mut self, forest: &mut Forest, root: &SeedNode) -> TreeResult<()> {
        // Reversed pushes keep sibling order when popping
        let mut stack: Vec<(&SeedNode, Option<Index>)> = vec![(root, None)];

        while let Some((seed, parent_idx)) = stack.pop() {
            let data = self.node_data(seed)?;
            let current_idx = forest.insert_node(data, parent_idx);

            for child in seed.children.iter().rev() {
                stack.push((child, Some(current_idx)));
            }
        }
        Ok(())
    }

    fn node_data(&mut self, seed: &SeedNode) -> TreeResult<NodeData> {
        if seed.id.trim().is_empty() {
            return Err(DomainError::EmptyId {
                label: seed.label.clone(),
            });
        }
        if !self.seen_ids.insert(seed.id.clone()) {
            return Err(DomainError::DuplicateId(seed.id.clone()));
        }
        for (field, value) in [("value", seed.value), ("original_value", seed.baseline())] {
            if !value.is_finite() {
                return Err(DomainError::NonFiniteValue {
                    id: seed.id.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(NodeData::new(
            seed.id.clone(),
            seed.label.clone(),
            seed.value,
            seed.baseline(),
        ))
    }
}
