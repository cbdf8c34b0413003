//! Mutation-only genetic programming over DAG-shaped integer programs.
//!
//! Provides a generic engine for evolving small integer programs:
//!
//! - **Programs**: flat, topologically ordered lists of binary operations
//!   whose operands reference inputs or earlier results, so subexpressions
//!   can be shared. Structural analyses cover cost (shared nodes counted
//!   once), expanded size, and symbolic rendering.
//! - **Operation catalog**: named binary operations with cost weights,
//!   injected as data together with the fitness hook.
//! - **Population**: elitist generational loop with biased parent
//!   selection and geometric multi-mutation.
//!
//! # Architecture
//!
//! The engine contains no problem-specific concepts. A problem is defined
//! entirely by its fitness hook, which sees each individual through the
//! [`gp::MultiFunction`] trait and returns one weakness per alternative.

pub mod error;
pub mod gp;

pub use error::GpError;
