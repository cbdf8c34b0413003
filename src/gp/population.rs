//! Generational population.
//!
//! Each [`tick`](Population::tick) keeps the elite prefix of the sorted
//! population, refills the rest with mutated copies of elite parents, and
//! re-sorts by [`Stats`] order. There is no crossover.

use super::config::GpConfig;
use super::program::Program;
use super::repo::OpRepo;
use super::stats::Stats;
use super::types::Weakness;
use crate::error::{GpError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::Arc;

/// Snapshot of the best and worst individual of one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generation the snapshot was taken in.
    pub generation: usize,
    /// Weakness of the best individual.
    pub best_weakness: Weakness,
    /// Cost of the best individual.
    pub best_cost: usize,
    /// Generations since the best individual was born.
    pub best_age: usize,
    /// Weakness of the worst individual.
    pub worst_weakness: Weakness,
    /// Cost of the worst individual.
    pub worst_cost: usize,
    /// Generations since the worst individual was born.
    pub worst_age: usize,
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] best(weakness={},cost={},age={}), worst(weakness={},cost={},age={})",
            self.generation,
            self.best_weakness,
            self.best_cost,
            self.best_age,
            self.worst_weakness,
            self.worst_cost,
            self.worst_age
        )
    }
}

/// A population of programs kept sorted best-first.
///
/// # Usage
///
/// ```
/// use u_gp::gp::{GpConfig, MultiFunction, OpRepo, Population};
///
/// // reward programs whose first output equals the sum of the inputs
/// let repo = OpRepo::with_arithmetic(|fun: &dyn MultiFunction| {
///     let mut feedback = vec![0.0; fun.num_alternatives()];
///     for a in 0..4 {
///         for b in 0..4 {
///             for (slot, out) in fun.execute(&[a, b]).iter().enumerate() {
///                 feedback[slot] += (i64::from(out[0]) - i64::from(a + b)).abs() as f64;
///             }
///         }
///     }
///     feedback
/// });
/// let config = GpConfig::new(2, 1, 4, 20).with_seed(1);
/// let mut population = Population::new(config, repo).unwrap();
/// for _ in 0..10 {
///     population.tick();
/// }
/// assert_eq!(population.generation(), 10);
/// assert_eq!(population.programs().len(), 20);
/// ```
#[derive(Debug)]
pub struct Population {
    rng: StdRng,
    seed: u64,
    gen: usize,
    config: GpConfig,
    repo: Arc<OpRepo>,
    programs: Vec<Program>,
}

impl Population {
    /// Creates a population and grows it to `config.pop_cnt` evaluated
    /// individuals.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the catalog
    /// holds no operation besides `forward`.
    pub fn new(config: GpConfig, repo: OpRepo) -> Result<Self> {
        config.validate()?;
        if repo.max_op() == 0 {
            return Err(GpError::EmptyCatalog);
        }
        let seed = config.seed.unwrap_or_else(rand::random);
        log::debug!(
            "population: seed={seed} in={} out={} ops={} slots={} pop={} elite={}",
            config.in_cnt,
            config.out_cnt,
            config.op_cnt,
            config.slot_count(),
            config.pop_cnt,
            config.elite_count()
        );
        let mut population = Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            gen: 0,
            config,
            repo: Arc::new(repo),
            programs: Vec::new(),
        };
        population.grow();
        Ok(population)
    }

    /// Fills the population with freshly grown, evaluated programs, then
    /// sorts it.
    pub fn grow(&mut self) {
        let missing = self.config.pop_cnt.saturating_sub(self.programs.len());
        let mut fresh = Vec::with_capacity(missing);
        for _ in 0..missing {
            let mut program = Program::new(
                Arc::clone(&self.repo),
                self.config.in_cnt,
                self.config.out_cnt,
                self.gen,
            );
            program.grow(&mut self.rng, self.config.op_cnt);
            fresh.push(program);
        }
        evaluate_all(&self.repo, &mut fresh);
        self.programs.extend(fresh);
        self.sort();
    }

    /// Picks one of the best `limit` individuals, biased toward the front.
    ///
    /// Draws two indices uniformly from `0..limit` and returns the smaller.
    ///
    /// # Panics
    /// Panics if `limit` is zero or exceeds the population size.
    pub fn select(&mut self, limit: usize) -> &Program {
        let idx = select_index(&mut self.rng, limit, self.programs.len());
        &self.programs[idx]
    }

    /// Returns a mutated copy of `parent`, reborn in the current generation.
    ///
    /// One edit is always applied; each further edit happens with
    /// probability `extra_mutation_rate`.
    pub fn mutate(&mut self, parent: &Program) -> Program {
        mutate_program(
            &mut self.rng,
            self.config.extra_mutation_rate,
            self.gen,
            parent,
        )
    }

    /// Advances one generation.
    ///
    /// Truncates to the elite prefix, refills with mutated elites,
    /// evaluates the newcomers, and re-sorts.
    pub fn tick(&mut self) {
        self.gen += 1;
        let elite_count = self.config.elite_count();
        self.programs.truncate(elite_count);
        let missing = self.config.pop_cnt - self.programs.len();
        let mut offspring = Vec::with_capacity(missing);
        for _ in 0..missing {
            let idx = select_index(&mut self.rng, elite_count, self.programs.len());
            offspring.push(mutate_program(
                &mut self.rng,
                self.config.extra_mutation_rate,
                self.gen,
                &self.programs[idx],
            ));
        }
        evaluate_all(&self.repo, &mut offspring);
        self.programs.extend(offspring);
        self.sort();
    }

    /// Current generation (number of completed ticks).
    pub fn generation(&self) -> usize {
        self.gen
    }

    /// All individuals, best first.
    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// The best individual.
    pub fn best(&self) -> &Program {
        &self.programs[0]
    }

    /// The seed the random stream was started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of individuals kept each tick.
    pub fn elite_count(&self) -> usize {
        self.config.elite_count()
    }

    /// The configuration this population runs with.
    pub fn config(&self) -> &GpConfig {
        &self.config
    }

    /// Best and worst individual of the current generation.
    pub fn stats(&self) -> GenerationStats {
        let best: &Stats = self.programs[0].stats();
        let worst: &Stats = self.programs[self.programs.len() - 1].stats();
        GenerationStats {
            generation: self.gen,
            best_weakness: best.weakness,
            best_cost: best.cost,
            best_age: best.age(self.gen),
            worst_weakness: worst.weakness,
            worst_cost: worst.cost,
            worst_age: worst.age(self.gen),
        }
    }

    /// Logs [`stats`](Self::stats) at info level.
    pub fn log_stats(&self) {
        log::info!("{}", self.stats());
    }

    fn sort(&mut self) {
        self.programs.sort_by(|a, b| a.stats().cmp(b.stats()));
    }
}

fn select_index(rng: &mut StdRng, limit: usize, len: usize) -> usize {
    assert!(
        limit > 0 && limit <= len,
        "selection limit {limit} out of range (population {len})"
    );
    let a = rng.random_range(0..limit);
    let b = rng.random_range(0..limit);
    a.min(b)
}

fn mutate_program(rng: &mut StdRng, extra_rate: f64, gen: usize, parent: &Program) -> Program {
    let mut child = parent.clone();
    loop {
        child.mutate(rng);
        if !rng.random_bool(extra_rate) {
            break;
        }
    }
    child.reborn(gen);
    child
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all(repo: &OpRepo, programs: &mut [Program]) {
    for program in programs.iter_mut() {
        repo.find_weakness(program);
    }
}

#[cfg(feature = "parallel")]
fn evaluate_all(repo: &OpRepo, programs: &mut [Program]) {
    use rayon::prelude::*;
    programs
        .par_iter_mut()
        .for_each(|program| repo.find_weakness(program));
}
