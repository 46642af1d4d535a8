//! Errors for the to-do domain.

use thiserror::Error;

/// Errors raised at the boundary where raw input enters the to-do domain
///
/// Reducers and selectors are total over valid inputs; the only failure is a
/// filter name that is not one of the three known filters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// A filter name outside `SHOW_ALL` / `SHOW_ACTIVE` / `SHOW_COMPLETED`
    #[error("Invalid visibility filter: {0:?}")]
    InvalidFilter(String),
}
