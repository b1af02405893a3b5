//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the ledger's structural rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("node id must not be empty (label: {label})")]
    EmptyId { label: String },

    #[error("non-finite {field} on node {id}: {value}")]
    NonFiniteValue {
        id: String,
        field: &'static str,
        value: f64,
    },

    #[error("invalid edit mode: {0} (expected 'value' or 'percent')")]
    InvalidEditMode(String),

    #[error("invalid edit spec: {0} (expected MODE:ID=AMOUNT)")]
    InvalidEditSpec(String),
}
