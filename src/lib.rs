//! gp-lite: a small, deterministic genetic-programming / genetic-algorithm
//! runtime for user-defined genomes.
//!
//! Implement [`Problem`] for your genome type, build a [`Config`], and hand
//! both to [`Engine::new`]. See the crate-level modules for the supporting
//! cast: [`rng`] for the deterministic PRNG, [`selector`] for parent
//! selection, [`estimator`] for pre-run cost prediction, and [`format`] for
//! human-readable rendering of results.

pub mod config;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod evaluator;
pub mod format;
pub mod individual;
pub mod metrics;
pub mod problem;
pub mod rng;
pub mod selector;

pub use config::{Config, EffectiveConfig};
pub use engine::{Engine, GenerationCtx, GenerationExtra, RunResult};
pub use error::{ConfigError, EvolutionError, GpLiteError, ProblemError};
pub use estimator::{
    estimate, EvaluationEstimate, MonetaryEstimate, OperationEstimate, RunEstimate, TimeEstimate,
    UnitCosts,
};
pub use individual::{Individual, Population};
pub use metrics::{Metrics, StopReason};
pub use problem::{GenerationEndCtx, Problem};
pub use rng::{seeded, Mulberry32, Rng};
pub use selector::{Selector, TournamentSelector};
