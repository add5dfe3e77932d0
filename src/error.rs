//! Typed error hierarchy for the engine.
//!
//! All errors the engine can raise are sub-kinds of [`GpLiteError`]. Validation
//! errors surface synchronously from [`crate::Engine::new`] and are never
//! caught internally; see `gp_lite::engine` for the one place where a user
//! operator's panic *is* caught (the `fitness` call, per spec).

/// Root error type for the engine.
#[derive(Debug, thiserror::Error)]
pub enum GpLiteError {
    /// Malformed numeric ranges, elite exceeding pop size, non-finite budgets.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The problem is missing a capability the engine requires.
    #[error(transparent)]
    Problem(#[from] ProblemError),

    /// Reserved for internal invariant breaches. Not raised by the current loop.
    #[error(transparent)]
    Evolution(#[from] EvolutionError),
}

/// Errors raised while normalizing and validating a [`crate::Config`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("pop_size must be >= 2, got {0}")]
    PopSizeTooSmall(usize),

    #[error("generations must be >= 1, got {0}")]
    GenerationsZero,

    #[error("elite ({elite}) exceeds pop_size ({pop_size})")]
    EliteExceedsPopSize { elite: usize, pop_size: usize },

    #[error("{field} must be within [0,1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    #[error("tournament size must be >= 1, got {0}")]
    TournamentZero,

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("target_fitness must not be NaN")]
    TargetFitnessNaN,
}

/// Errors raised when a [`crate::Problem`] implementation lacks a required
/// capability.
///
/// In a statically typed port, `create_random`/`fitness`/`mutate`/`crossover`
/// being "missing" is a compile error rather than a runtime one (the trait
/// requires them). This variant exists for parity with the source spec and
/// for dynamically-assembled problems (e.g. one built from boxed trait
/// objects at runtime), but `Engine::new` never constructs it for a
/// statically-implemented `Problem<T>`.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProblemError {
    #[error("problem is missing required operator: {0}")]
    MissingOperator(&'static str),
}

/// Reserved for internal invariant breaches the engine loop could detect but
/// currently does not raise.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EvolutionError {
    #[error("internal invariant violated: {0}")]
    InvariantViolated(&'static str),
}
