//! Ledger session
//!
//! Owns the current forest and applies edits copy-on-write: every edit builds
//! a new forest and replaces the old one in a single assignment, so readers
//! only ever see a fully rebalanced state.

use tracing::{debug, warn};

use crate::application::ApplicationResult;
use crate::domain::{
    apply_edit, parse_amount, recalc_all, scaled_value, EditMode, EditRequest, Forest,
    ForestBuilder, LedgerRow, Report, SeedNode, Totals,
};

/// What happened to an edit request.
///
/// None of these is an error: dropped edits leave the forest as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Forest rebalanced and published
    Applied,
    /// No node with that id; an identical forest was published
    UnknownNode,
    /// Input was not a finite number, or the edit would push a total past
    /// the f64 range; nothing was published
    InvalidInput,
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

/// Session holding the current ledger forest.
#[derive(Debug, Clone)]
pub struct LedgerSession {
    forest: Forest,
    revision: u64,
}

impl LedgerSession {
    /// Start a session on an already built forest.
    pub fn new(forest: Forest) -> Self {
        Self { forest, revision: 0 }
    }

    /// Deep copy `seeds` into a new, balanced session forest.
    pub fn from_seeds(seeds: &[SeedNode]) -> ApplicationResult<Self> {
        let forest = ForestBuilder::new().build(seeds)?;
        Ok(Self::new(forest))
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Number of forests published since the session started.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Set-by-value: distribute `raw` (parsed) over the node `id`.
    pub fn set_by_value(&mut self, id: &str, raw: &str) -> EditOutcome {
        let Some(new_value) = parse_amount(raw) else {
            warn!(id, raw, "value edit dropped: not a finite number");
            return EditOutcome::InvalidInput;
        };
        self.commit(id, |_| new_value)
    }

    /// Set-by-percent: scale the node `id` by `raw` percent of its current
    /// value.
    pub fn set_by_percent(&mut self, id: &str, raw: &str) -> EditOutcome {
        let Some(percent) = parse_amount(raw) else {
            warn!(id, raw, "percent edit dropped: not a finite number");
            return EditOutcome::InvalidInput;
        };
        self.commit(id, |current| scaled_value(current, percent))
    }

    pub fn apply(&mut self, edit: &EditRequest) -> EditOutcome {
        match edit.mode {
            EditMode::Value => self.set_by_value(&edit.node_id, &edit.raw_input),
            EditMode::Percent => self.set_by_percent(&edit.node_id, &edit.raw_input),
        }
    }

    /// Apply edits in order; one outcome per edit.
    pub fn apply_all<'a, I>(&mut self, edits: I) -> Vec<EditOutcome>
    where
        I: IntoIterator<Item = &'a EditRequest>,
    {
        edits.into_iter().map(|edit| self.apply(edit)).collect()
    }

    pub fn rows(&self) -> Vec<LedgerRow> {
        self.forest.rows()
    }

    pub fn totals(&self) -> Totals {
        self.forest.totals()
    }

    pub fn report(&self) -> Report {
        self.forest.report()
    }

    /// Copy, rebalance and publish. `target` maps the node's current value to
    /// its new one.
    fn commit(&mut self, id: &str, target: impl FnOnce(f64) -> f64) -> EditOutcome {
        let current = self.forest.find_node(id).map(|node| node.data.value);
        let (next, outcome) = match current {
            Some(current) => {
                let new_value = target(current);
                let next = apply_edit(&self.forest, id, new_value);
                if !next.is_finite() {
                    warn!(id, current, new_value, "edit dropped: totals overflow");
                    return EditOutcome::InvalidInput;
                }
                debug!(id, current, new_value, "edit applied");
                (next, EditOutcome::Applied)
            }
            None => {
                debug!(id, "edit target not found, publishing unchanged forest");
                let mut unchanged = self.forest.clone();
                recalc_all(&mut unchanged);
                (unchanged, EditOutcome::UnknownNode)
            }
        };
        self.publish(next);
        outcome
    }

    fn publish(&mut self, next: Forest) {
        self.forest = next;
        self.revision += 1;
    }
}
