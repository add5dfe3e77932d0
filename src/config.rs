//! Engine configuration: user-facing [`Config`], normalization into
//! [`EffectiveConfig`], and validation.
//!
//! Normalization is its own pipeline step (matching the "Config normalizer"
//! component from the design) so that both the engine and the estimator can
//! share it and produce numbers that agree precisely when no budget clips
//! the run.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// User-facing configuration.
///
/// Every numeric range is checked once, at [`crate::Engine::new`] /
/// [`crate::estimator::estimate`] time, by [`normalize`]. Fields left at
/// their type-level default (`None` for `elite`, `seed`, the budgets) are
/// filled in during normalization.
///
/// # Defaults
///
/// ```
/// use gp_lite::Config;
///
/// let config = Config::default();
/// assert_eq!(config.pop_size, 100);
/// assert_eq!(config.generations, 1000);
/// ```
///
/// # Builder pattern
///
/// ```
/// use gp_lite::Config;
///
/// let config = Config::default()
///     .with_pop_size(200)
///     .with_tournament(5)
///     .with_elite(10)
///     .with_mut_prob(0.2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of individuals in the population. Must be >= 2.
    pub pop_size: usize,

    /// Maximum number of generations before termination. Must be >= 1.
    pub generations: usize,

    /// Number of top individuals copied unchanged each generation.
    ///
    /// `None` resolves to `max(1, floor(0.02 * pop_size))` during
    /// normalization.
    pub elite: Option<usize>,

    /// Probability of applying crossover to a selected pair.
    pub cx_prob: f64,

    /// Probability of applying mutation to an offspring.
    pub mut_prob: f64,

    /// Fraction of the population replaced by fresh random individuals
    /// each generation.
    pub immigration: f64,

    /// Tournament size used by the default selector.
    pub tournament: usize,

    /// Generations without improvement before stopping. `0` disables
    /// stall-based termination.
    pub stall: usize,

    /// Fitness threshold that ends the run early when reached or exceeded.
    pub target_fitness: f64,

    /// Wall-clock budget in milliseconds. `None` is unbounded.
    pub max_wall_ms: Option<u64>,

    /// Deprecated alias for [`Config::max_wall_ms`]. When both are set,
    /// `max_wall_ms` wins and a warning is logged.
    pub time_limit_ms: Option<u64>,

    /// Evaluation budget. `None` is unbounded.
    pub max_evaluations: Option<u64>,

    /// Seed for the default RNG. `None` uses the current time in
    /// milliseconds.
    pub seed: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pop_size: 100,
            generations: 1000,
            elite: None,
            cx_prob: 0.8,
            mut_prob: 0.1,
            immigration: 0.02,
            tournament: 3,
            stall: 50,
            target_fitness: f64::INFINITY,
            max_wall_ms: None,
            time_limit_ms: None,
            max_evaluations: None,
            seed: None,
        }
    }
}

impl Config {
    pub fn with_pop_size(mut self, n: usize) -> Self {
        self.pop_size = n;
        self
    }

    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    pub fn with_elite(mut self, elite: usize) -> Self {
        self.elite = Some(elite);
        self
    }

    pub fn with_cx_prob(mut self, p: f64) -> Self {
        self.cx_prob = p;
        self
    }

    pub fn with_mut_prob(mut self, p: f64) -> Self {
        self.mut_prob = p;
        self
    }

    pub fn with_immigration(mut self, p: f64) -> Self {
        self.immigration = p;
        self
    }

    pub fn with_tournament(mut self, k: usize) -> Self {
        self.tournament = k;
        self
    }

    pub fn with_stall(mut self, n: usize) -> Self {
        self.stall = n;
        self
    }

    pub fn with_target_fitness(mut self, f: f64) -> Self {
        self.target_fitness = f;
        self
    }

    pub fn with_max_wall_ms(mut self, ms: u64) -> Self {
        self.max_wall_ms = Some(ms);
        self
    }

    pub fn with_max_evaluations(mut self, n: u64) -> Self {
        self.max_evaluations = Some(n);
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Fully resolved configuration: every optional field filled in, every
/// range checked. Echoed verbatim inside [`crate::Metrics`] as the config
/// snapshot and shared between the engine and the estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub pop_size: usize,
    pub generations: usize,
    pub elite: usize,
    pub cx_prob: f64,
    pub mut_prob: f64,
    pub immigration: f64,
    pub tournament: usize,
    pub stall: usize,
    pub target_fitness: f64,
    pub max_wall_ms: Option<u64>,
    pub max_evaluations: Option<u64>,
    pub seed: u32,
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ProbabilityOutOfRange { field, value });
    }
    Ok(())
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field, value });
    }
    Ok(())
}

/// Fills defaults, validates ranges, and resolves the deprecated
/// `time_limit_ms` alias.
///
/// Rejects: `pop_size < 2`, `generations == 0`, probabilities outside
/// `[0,1]`, `tournament == 0`, `elite > pop_size`, a `NaN` `target_fitness`.
pub fn normalize(config: &Config) -> Result<EffectiveConfig, ConfigError> {
    if config.pop_size < 2 {
        return Err(ConfigError::PopSizeTooSmall(config.pop_size));
    }
    if config.generations == 0 {
        return Err(ConfigError::GenerationsZero);
    }

    check_probability("cx_prob", config.cx_prob)?;
    check_probability("mut_prob", config.mut_prob)?;
    check_probability("immigration", config.immigration)?;

    if config.tournament == 0 {
        return Err(ConfigError::TournamentZero);
    }

    if config.target_fitness.is_nan() {
        return Err(ConfigError::TargetFitnessNaN);
    }

    let elite = config
        .elite
        .unwrap_or_else(|| 1usize.max((0.02 * config.pop_size as f64).floor() as usize));
    if elite > config.pop_size {
        return Err(ConfigError::EliteExceedsPopSize {
            elite,
            pop_size: config.pop_size,
        });
    }

    let max_wall_ms = match (config.max_wall_ms, config.time_limit_ms) {
        (Some(w), Some(_legacy)) => {
            log::warn!(
                "both max_wall_ms and the deprecated time_limit_ms are set; max_wall_ms wins"
            );
            Some(w)
        }
        (Some(w), None) => Some(w),
        (None, Some(legacy)) => Some(legacy),
        (None, None) => None,
    };

    if let Some(ms) = max_wall_ms {
        check_finite("max_wall_ms", ms as f64)?;
    }
    if let Some(n) = config.max_evaluations {
        check_finite("max_evaluations", n as f64)?;
    }

    let seed = config.seed.unwrap_or_else(crate::rng::time_seed);

    Ok(EffectiveConfig {
        pop_size: config.pop_size,
        generations: config.generations,
        elite,
        cx_prob: config.cx_prob,
        mut_prob: config.mut_prob,
        immigration: config.immigration,
        tournament: config.tournament,
        stall: config.stall,
        target_fitness: config.target_fitness,
        max_wall_ms,
        max_evaluations: config.max_evaluations,
        seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = Config::default();
        assert_eq!(config.pop_size, 100);
        assert_eq!(config.generations, 1000);
        assert!((config.cx_prob - 0.8).abs() < 1e-12);
        assert!((config.mut_prob - 0.1).abs() < 1e-12);
        assert!((config.immigration - 0.02).abs() < 1e-12);
        assert_eq!(config.tournament, 3);
        assert_eq!(config.stall, 50);
        assert_eq!(config.target_fitness, f64::INFINITY);
    }

    #[test]
    fn default_elite_is_two_percent_floor_min_one() {
        let effective = normalize(&Config::default().with_pop_size(100)).unwrap();
        assert_eq!(effective.elite, 2);

        let effective = normalize(&Config::default().with_pop_size(10)).unwrap();
        assert_eq!(effective.elite, 1);
    }

    #[test]
    fn rejects_tiny_population() {
        let err = normalize(&Config::default().with_pop_size(1)).unwrap_err();
        assert_eq!(err, ConfigError::PopSizeTooSmall(1));
    }

    #[test]
    fn rejects_zero_generations() {
        let err = normalize(&Config::default().with_generations(0)).unwrap_err();
        assert_eq!(err, ConfigError::GenerationsZero);
    }

    #[test]
    fn rejects_elite_over_pop_size() {
        let err = normalize(&Config::default().with_pop_size(10).with_elite(11)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::EliteExceedsPopSize {
                elite: 11,
                pop_size: 10
            }
        );
    }

    #[test]
    fn rejects_probabilities_out_of_range() {
        let err = normalize(&Config::default().with_cx_prob(1.5)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ProbabilityOutOfRange {
                field: "cx_prob",
                value: 1.5
            }
        );
    }

    #[test]
    fn rejects_zero_tournament() {
        let err = normalize(&Config::default().with_tournament(0)).unwrap_err();
        assert_eq!(err, ConfigError::TournamentZero);
    }

    #[test]
    fn rejects_nan_target_fitness() {
        let err = normalize(&Config::default().with_target_fitness(f64::NAN)).unwrap_err();
        assert_eq!(err, ConfigError::TargetFitnessNaN);
    }

    #[test]
    fn max_wall_ms_wins_over_legacy_alias() {
        let mut config = Config::default().with_max_wall_ms(500);
        config.time_limit_ms = Some(999);
        let effective = normalize(&config).unwrap();
        assert_eq!(effective.max_wall_ms, Some(500));
    }

    #[test]
    fn legacy_alias_used_when_max_wall_ms_absent() {
        let mut config = Config::default();
        config.time_limit_ms = Some(999);
        let effective = normalize(&config).unwrap();
        assert_eq!(effective.max_wall_ms, Some(999));
    }

    #[test]
    fn seed_defaults_to_something_deterministic_when_given() {
        let effective = normalize(&Config::default().with_seed(42)).unwrap();
        assert_eq!(effective.seed, 42);
    }
}
