//! Application services

pub mod ledger;
pub mod seed;

pub use ledger::{EditOutcome, LedgerSession};
pub use seed::SeedService;
