//! GP driver loop.
//!
//! [`GpRunner`] grows a [`Population`] and ticks it until the tick limit,
//! a perfect individual, or external cancellation. Cancellation is only
//! observed between whole ticks.

use super::config::GpConfig;
use super::population::Population;
use super::program::Program;
use super::repo::OpRepo;
use super::stats::Stats;
use crate::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of a GP run.
#[derive(Debug, Clone)]
pub struct GpResult {
    /// The best program of the final generation.
    pub best: Program,

    /// Stats of `best` (same as `best.stats()`).
    pub best_stats: Stats,

    /// Number of ticks executed.
    pub generations: usize,

    /// Whether the run stopped because the best weakness reached zero.
    pub solved: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Seed of the population's random stream.
    pub seed: u64,

    /// Best weakness after growth and after each tick.
    pub weakness_history: Vec<f64>,
}

impl GpResult {
    /// Renders every output of the best program's selected slot.
    pub fn best_expressions(&self) -> Vec<String> {
        self.best
            .slot_refs(self.best.best_slot())
            .into_iter()
            .map(|r| self.best.as_string(r))
            .collect()
    }
}

/// Executes the GP loop.
///
/// # Usage
///
/// ```ignore
/// let repo = OpRepo::with_arithmetic(find_weakness);
/// let config = GpConfig::new(3, 3, 33, 100).with_seed(42);
/// let result = GpRunner::run(&config, repo)?;
/// for expr in result.best_expressions() {
///     println!("{expr}");
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GpRunner;

impl GpRunner {
    /// Runs the GP loop.
    ///
    /// # Errors
    /// Returns an error if the population cannot be created.
    pub fn run(config: &GpConfig, repo: OpRepo) -> Result<GpResult> {
        Self::run_with_cancel(config, repo, None)
    }

    /// Runs the GP loop with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// before the next tick and returns the current best program.
    ///
    /// # Errors
    /// Returns an error if the population cannot be created.
    pub fn run_with_cancel(
        config: &GpConfig,
        repo: OpRepo,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GpResult> {
        let mut population = Population::new(config.clone(), repo)?;

        let mut weakness_history = vec![population.best().stats().weakness];
        let mut solved = config.stop_on_perfect && is_perfect(&population);
        let mut cancelled = false;

        for tick in 0..config.max_ticks {
            if solved {
                break;
            }
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    log::info!("cancelled after {tick} ticks");
                    cancelled = true;
                    break;
                }
            }
            if config.report_interval > 0 && tick % config.report_interval == 0 {
                population.log_stats();
            }

            population.tick();
            weakness_history.push(population.best().stats().weakness);

            solved = config.stop_on_perfect && is_perfect(&population);
        }

        let best = population.best().clone();
        let best_stats = *best.stats();
        log::info!(
            "best stats after {} ticks: (weakness={},cost={})",
            population.generation(),
            best_stats.weakness,
            best_stats.cost
        );

        Ok(GpResult {
            best,
            best_stats,
            generations: population.generation(),
            solved,
            cancelled,
            seed: population.seed(),
            weakness_history,
        })
    }
}

fn is_perfect(population: &Population) -> bool {
    population.best().stats().weakness <= 0.0
}
