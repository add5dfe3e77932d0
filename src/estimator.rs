//! Predicts evaluation count, wall time, and (optionally) monetary cost for
//! a config before a run is ever started.
//!
//! Shares [`crate::config::normalize`] with [`crate::Engine`] so that, absent
//! a budget that clips the real run short, `estimate(config).evaluations ==
//! metrics.evaluations` from the run the estimate describes.

use crate::config::{self, Config, EffectiveConfig};
use crate::error::GpLiteError;
use serde::{Deserialize, Serialize};

/// Per-unit cost assumptions used to turn an evaluation count into time and
/// money. All fields are plain multipliers; supplying zeros effectively
/// disables that part of the estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitCosts {
    /// Estimated wall-clock milliseconds per fitness evaluation.
    pub ms_per_evaluation: f64,
    /// Estimated fixed wall-clock overhead per generation (sorting, stats,
    /// hook dispatch), independent of evaluation count.
    pub per_generation_overhead_ms: f64,
    /// Estimated fixed wall-clock overhead for the whole run (engine
    /// construction, final sort/teardown), paid once.
    pub per_run_overhead_ms: f64,
    /// Estimated monetary cost per fitness evaluation, in an arbitrary
    /// currency unit the caller defines (e.g. USD).
    pub cost_per_evaluation: f64,
}

impl Default for UnitCosts {
    fn default() -> Self {
        Self {
            ms_per_evaluation: 1.0,
            per_generation_overhead_ms: 0.0,
            per_run_overhead_ms: 0.0,
            cost_per_evaluation: 0.0,
        }
    }
}

/// Evaluation-count breakdown for a would-be run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvaluationEstimate {
    /// Evaluations spent on the initial population.
    pub initial: u64,
    /// Evaluations spent on bred offspring across all generations.
    pub offspring: u64,
    /// Evaluations spent on immigrants across all generations.
    pub immigrants: u64,
    /// Sum of the three above, assuming `config.generations` full
    /// generations run (the "planned" total, before any evaluation budget
    /// is applied).
    pub total_unclipped: u64,
    /// `total_unclipped`, clipped to `max_evaluations` when set.
    pub total: u64,
    /// Same arithmetic as `total_unclipped`, but using `expected_generations`
    /// in place of `config.generations` when the caller supplies an
    /// override (e.g. from a prior run's actual generation count). Equal to
    /// `total_unclipped` when no override is given.
    pub expected_total: u64,
}

/// Operator-call breakdown for a would-be run (selections, crossovers,
/// mutations), each an expected value under the configured probabilities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OperationEstimate {
    pub selections: u64,
    pub expected_crossovers: f64,
    pub expected_mutations: f64,
}

/// Projected wall time for the estimated evaluation count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeEstimate {
    pub estimated_ms: f64,
    /// `true` when `max_wall_ms` is set and `estimated_ms` exceeds it —
    /// a hint that the evaluation budget is unlikely to be reached before
    /// the wall-clock budget is, and the real run may stop earlier than
    /// `evaluations.total` suggests.
    pub exceeds_wall_budget: bool,
}

/// Projected monetary cost for the estimated evaluation count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonetaryEstimate {
    pub estimated_cost: f64,
}

/// A full pre-run prediction for a given [`Config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEstimate {
    pub config: EffectiveConfig,
    pub evaluations: EvaluationEstimate,
    pub operations: OperationEstimate,
    pub time: TimeEstimate,
    pub monetary: MonetaryEstimate,
}

/// Estimates the resource consumption of running `config` to completion,
/// i.e. assuming `generations` full generations run with no early stop.
///
/// This mirrors the engine's own generation arithmetic exactly: each
/// generation evaluates `pop_size - elite` offspring (the breed loop) plus
/// `immigrants_per_gen = floor(pop_size * immigration)` immigrants, with the
/// breed loop's share already reduced by the immigrant count the same way
/// [`crate::Engine::run`] computes `breed_target`.
///
/// `expected_generations`, when given, overrides `config.generations` for
/// the `evaluations.expected_total` figure only — useful for comparing a
/// prior run's actual generation count against what was planned, without
/// re-deriving the whole estimate by hand.
pub fn estimate(
    config: &Config,
    costs: UnitCosts,
    expected_generations: Option<u64>,
) -> Result<RunEstimate, GpLiteError> {
    let effective = config::normalize(config)?;

    let pop_size = effective.pop_size as u64;
    let elite = effective.elite as u64;
    let generations = effective.generations as u64;

    let immigrants_per_gen =
        ((pop_size as f64 * effective.immigration).floor() as u64).min(pop_size - elite);
    let breed_per_gen = pop_size - immigrants_per_gen - elite;

    let initial = pop_size;
    let offspring = breed_per_gen * generations;
    let immigrants = immigrants_per_gen * generations;
    let total_unclipped = initial + offspring + immigrants;

    let total = match effective.max_evaluations {
        Some(cap) => total_unclipped.min(cap),
        None => total_unclipped,
    };

    let expected_total = match expected_generations {
        Some(gens) => initial + (breed_per_gen + immigrants_per_gen) * gens,
        None => total_unclipped,
    };

    let selections = 2 * breed_per_gen * generations;
    let expected_crossovers = selections as f64 / 2.0 * effective.cx_prob;
    let expected_mutations = (breed_per_gen * generations) as f64 * effective.mut_prob;

    let estimated_ms = total as f64 * costs.ms_per_evaluation
        + generations as f64 * costs.per_generation_overhead_ms
        + costs.per_run_overhead_ms;
    let exceeds_wall_budget = effective
        .max_wall_ms
        .map(|budget| estimated_ms > budget as f64)
        .unwrap_or(false);

    let estimated_cost = total as f64 * costs.cost_per_evaluation;

    Ok(RunEstimate {
        config: effective,
        evaluations: EvaluationEstimate {
            initial,
            offspring,
            immigrants,
            total_unclipped,
            total,
            expected_total,
        },
        operations: OperationEstimate {
            selections,
            expected_crossovers,
            expected_mutations,
        },
        time: TimeEstimate {
            estimated_ms,
            exceeds_wall_budget,
        },
        monetary: MonetaryEstimate { estimated_cost },
    })
}
