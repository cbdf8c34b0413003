//! Recoverable errors.
//!
//! Only configuration problems are reported as values. Broken program
//! invariants (bad references, out-of-range codes, feedback of the wrong
//! length) are caller bugs and panic at the point of violation.

use thiserror::Error;

/// Errors reported before an evolutionary run starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GpError {
    /// A [`GpConfig`](crate::gp::GpConfig) parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The operation catalog holds nothing besides `forward`.
    #[error("operation catalog has no operations besides forward")]
    EmptyCatalog,
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, GpError>;
