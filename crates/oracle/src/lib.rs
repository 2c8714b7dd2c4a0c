//! # The Oracle: Missing Test Class Verdicts
//!
//! Collects classification verdicts for a whole source tree into a [`Corpus`]
//! and, once the tree has been read, reports every source class that has no
//! `TestX` / `XTest` counterpart in its package.

pub mod check;
pub mod corpus;
pub mod matcher;

pub use check::TestClassesCheck;
pub use corpus::Corpus;

/// Errors from building a check.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error(transparent)]
    Rules(#[from] anatomist::AnatomistError),
}
