//! Genetic programming framework.
//!
//! Programs are flat lists of binary integer operations forming a DAG over
//! a fixed number of inputs. A [`Population`] of programs evolves by
//! mutation only: each tick keeps the elite prefix and refills the rest
//! with mutated elites. Fitness comes from a hook carried by the
//! [`OpRepo`], so the engine knows nothing about the problem it solves.
//!
//! # Core Traits
//!
//! - [`MultiFunction`]: Read-only view of an individual handed to the fitness hook
//! - [`Sim`]: A [`MultiFunction`] that accepts feedback
//!
//! # Key Types
//!
//! - [`OpRepo`]: Operation catalog plus fitness hook
//! - [`Ref`], [`Op`], [`Program`]: The program representation and its analyses
//! - [`Stats`]: Total fitness order (weakness, cost, age)
//! - [`GpConfig`]: Program shape, population size, and run limits
//! - [`Population`]: The generational loop
//! - [`GpRunner`]: Drives a population to a [`GpResult`]
//!
//! # Submodules
//!
//! - [`ops`]: Total integer operations for building catalogs
//!
//! # References
//!
//! - Koza (1992), *Genetic Programming: On the Programming of Computers by
//!   Means of Natural Selection*
//! - Miller & Thomson (2000), "Cartesian Genetic Programming"

mod config;
pub mod ops;
mod population;
mod program;
mod repo;
mod runner;
mod stats;
mod types;

pub use config::GpConfig;
pub use population::{GenerationStats, Population};
pub use program::{Mutation, MutationKind, Op, Program, Ref, MAX_RENDER_NODES};
pub use repo::{forward_op, Entry, FeedbackFn, OpRepo, ValueOp2, FORWARD};
pub use runner::{GpResult, GpRunner};
pub use stats::Stats;
pub use types::{Alternatives, Feedback, MultiFunction, Output, Sim, Value, Weakness};
