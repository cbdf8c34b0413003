//! GP configuration.
//!
//! [`GpConfig`] holds the program shape, population parameters, and the
//! limits of the driver loop.

use crate::error::{GpError, Result};

/// Configuration for a genetic programming run.
///
/// # Defaults
///
/// ```
/// use u_gp::gp::GpConfig;
///
/// let config = GpConfig::default();
/// assert_eq!(config.pop_cnt, 100);
/// assert_eq!(config.elite_count(), 10);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_gp::gp::GpConfig;
///
/// let config = GpConfig::new(3, 3, 33, 100)
///     .with_seed(42)
///     .with_max_ticks(5_000)
///     .with_extra_mutation_rate(0.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpConfig {
    /// Number of program inputs.
    pub in_cnt: usize,

    /// Number of program outputs per alternative.
    pub out_cnt: usize,

    /// Operations per individual. Must be a positive multiple of `out_cnt`.
    pub op_cnt: usize,

    /// Number of individuals in the population.
    pub pop_cnt: usize,

    /// Fraction of the population kept unconditionally each tick.
    pub elite_ratio: f64,

    /// Probability of each mutation round after the first.
    ///
    /// The number of edits per offspring is geometric with mean
    /// `1 / (1 - extra_mutation_rate)`.
    pub extra_mutation_rate: f64,

    /// Random seed. `None` draws one; the seed used is recorded on the
    /// population.
    pub seed: Option<u64>,

    /// Upper bound on ticks executed by [`GpRunner`](super::GpRunner).
    pub max_ticks: usize,

    /// Ticks between progress log lines. `0` disables periodic logging.
    pub report_interval: usize,

    /// Stop as soon as the best individual reaches zero weakness.
    pub stop_on_perfect: bool,
}

impl Default for GpConfig {
    fn default() -> Self {
        Self {
            in_cnt: 3,
            out_cnt: 3,
            op_cnt: 33,
            pop_cnt: 100,
            elite_ratio: 0.1,
            extra_mutation_rate: 0.66,
            seed: None,
            max_ticks: 1000,
            report_interval: 100,
            stop_on_perfect: true,
        }
    }
}

impl GpConfig {
    /// Creates a configuration for the given program and population shape.
    pub fn new(in_cnt: usize, out_cnt: usize, op_cnt: usize, pop_cnt: usize) -> Self {
        Self {
            in_cnt,
            out_cnt,
            op_cnt,
            pop_cnt,
            ..Self::default()
        }
    }

    /// Sets the elite ratio.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the probability of additional mutation rounds.
    pub fn with_extra_mutation_rate(mut self, rate: f64) -> Self {
        self.extra_mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the tick limit.
    pub fn with_max_ticks(mut self, n: usize) -> Self {
        self.max_ticks = n;
        self
    }

    /// Sets the progress logging interval (0 to disable).
    pub fn with_report_interval(mut self, n: usize) -> Self {
        self.report_interval = n;
        self
    }

    /// Enables or disables stopping at zero weakness.
    pub fn with_stop_on_perfect(mut self, stop: bool) -> Self {
        self.stop_on_perfect = stop;
        self
    }

    /// Number of individuals that survive each tick.
    pub fn elite_count(&self) -> usize {
        (self.pop_cnt as f64 * self.elite_ratio) as usize
    }

    /// Number of alternatives (slots) per program.
    pub fn slot_count(&self) -> usize {
        if self.out_cnt == 0 {
            0
        } else {
            self.op_cnt / self.out_cnt
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.in_cnt == 0 {
            return Err(invalid("in_cnt must be at least 1"));
        }
        if self.out_cnt == 0 {
            return Err(invalid("out_cnt must be at least 1"));
        }
        if self.op_cnt < self.out_cnt || self.op_cnt % self.out_cnt != 0 {
            return Err(GpError::InvalidConfig(format!(
                "op_cnt ({}) must be a positive multiple of out_cnt ({})",
                self.op_cnt, self.out_cnt
            )));
        }
        let elite_count = self.elite_count();
        if elite_count == 0 {
            return Err(invalid("elite_ratio too low: no individual survives a tick"));
        }
        if elite_count >= self.pop_cnt {
            return Err(invalid("elite_ratio too high: elites fill entire population"));
        }
        if !(0.0..1.0).contains(&self.extra_mutation_rate) {
            return Err(invalid("extra_mutation_rate must be in [0, 1)"));
        }
        if self.max_ticks == 0 {
            return Err(invalid("max_ticks must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> GpError {
    GpError::InvalidConfig(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GpConfig::default();
        assert_eq!(config.in_cnt, 3);
        assert_eq!(config.out_cnt, 3);
        assert_eq!(config.op_cnt, 33);
        assert_eq!(config.pop_cnt, 100);
        assert!((config.elite_ratio - 0.1).abs() < 1e-10);
        assert!((config.extra_mutation_rate - 0.66).abs() < 1e-10);
        assert!(config.seed.is_none());
        assert_eq!(config.max_ticks, 1000);
        assert_eq!(config.report_interval, 100);
        assert!(config.stop_on_perfect);
        assert_eq!(config.slot_count(), 11);
    }

    #[test]
    fn test_builder_pattern() {
        let config = GpConfig::new(6, 2, 10, 50)
            .with_elite_ratio(0.2)
            .with_extra_mutation_rate(0.5)
            .with_seed(7)
            .with_max_ticks(20)
            .with_report_interval(0)
            .with_stop_on_perfect(false);

        assert_eq!(config.in_cnt, 6);
        assert_eq!(config.out_cnt, 2);
        assert_eq!(config.op_cnt, 10);
        assert_eq!(config.pop_cnt, 50);
        assert_eq!(config.elite_count(), 10);
        assert!((config.extra_mutation_rate - 0.5).abs() < 1e-10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_ticks, 20);
        assert_eq!(config.report_interval, 0);
        assert!(!config.stop_on_perfect);
    }

    #[test]
    fn test_validate_ok() {
        assert!(GpConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_no_inputs() {
        let config = GpConfig::new(0, 1, 1, 100);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_no_outputs() {
        let config = GpConfig::new(1, 0, 1, 100);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ragged_op_cnt() {
        let config = GpConfig::new(3, 3, 32, 100);
        assert_eq!(
            config.validate(),
            Err(GpError::InvalidConfig(
                "op_cnt (32) must be a positive multiple of out_cnt (3)".into()
            ))
        );
        assert!(GpConfig::new(3, 3, 0, 100).validate().is_err());
    }

    #[test]
    fn test_validate_population_too_small_for_elite() {
        let config = GpConfig::new(3, 3, 33, 9);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_elite_too_high() {
        let config = GpConfig::default().with_elite_ratio(1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_mutation_rate_one() {
        let config = GpConfig::default().with_extra_mutation_rate(1.0);
        assert!(config.validate().is_err());
        assert!(GpConfig::default()
            .with_extra_mutation_rate(0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_zero_ticks() {
        let config = GpConfig::default().with_max_ticks(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clamp_rates() {
        let config = GpConfig::default()
            .with_elite_ratio(1.5)
            .with_extra_mutation_rate(-0.5);
        assert!((config.elite_ratio - 1.0).abs() < 1e-10);
        assert!((config.extra_mutation_rate - 0.0).abs() < 1e-10);
    }
}
