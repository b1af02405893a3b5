//! alloctree: hierarchical quantity ledger.
//!
//! A forest of labeled nodes where every parent holds the sum of its
//! children. Editing any node spreads the new value over its subtree in
//! proportion to the existing shares and recalculates every total above it.
//!
//! ```
//! use alloctree::application::LedgerSession;
//! use alloctree::domain::demo_seed;
//!
//! let mut session = LedgerSession::from_seeds(&demo_seed()).unwrap();
//! session.set_by_value("phones", "1000");
//! assert_eq!(session.totals().grand_total, 2700.0);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
