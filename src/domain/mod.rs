//! Domain layer: the ledger forest and its allocation rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod allocation;
pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod view;

pub use allocation::{apply_edit, distribute, recalc, recalc_all, scaled_value};
pub use arena::{Forest, LedgerNode, NodeData};
pub use builder::ForestBuilder;
pub use entities::*;
pub use error::DomainError;
pub use view::{ForestConvert, LedgerRow, NodeView, Report, Totals};
