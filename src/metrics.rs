//! Aggregate counters, stop reasons, and the config snapshot carried inside
//! every [`crate::RunResult`].

use crate::config::EffectiveConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// `best >= target_fitness`.
    Target,
    /// No improvement within the stall window.
    Stall,
    /// Wall-clock budget exceeded.
    Time,
    /// Evaluation budget exhausted.
    Evaluations,
    /// `generations` executed with no other stop condition triggered.
    Generations,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::Target => "target",
            StopReason::Stall => "stall",
            StopReason::Time => "time",
            StopReason::Evaluations => "evaluations",
            StopReason::Generations => "generations",
        };
        f.write_str(s)
    }
}

/// Aggregate counters accumulated across a run, plus the effective config
/// snapshot that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    pub evaluations: u64,
    pub invalid_evaluations: u64,
    pub repaired: u64,
    pub repair_failures: u64,
    pub fitness_errors: u64,
    pub non_finite_fitness: u64,
    pub mutations: u64,
    pub crossovers: u64,
    pub selections: u64,
    pub immigrants: u64,
    pub elites_per_gen: u64,
    pub config: EffectiveConfig,
}

impl Metrics {
    pub fn new(config: EffectiveConfig) -> Self {
        Self {
            evaluations: 0,
            invalid_evaluations: 0,
            repaired: 0,
            repair_failures: 0,
            fitness_errors: 0,
            non_finite_fitness: 0,
            mutations: 0,
            crossovers: 0,
            selections: 0,
            immigrants: 0,
            elites_per_gen: 0,
            config,
        }
    }
}
