//! Human-readable rendering of fitness values and run/estimate summaries for
//! the CLI's non-JSON output mode.

use crate::engine::RunResult;
use crate::estimator::RunEstimate;
use std::fmt::Debug;

/// Formats a fitness value, special-casing the two values a user's fitness
/// function can never legitimately return via [`crate::evaluator::safe_evaluate`]:
/// `f64::NEG_INFINITY` (rejected individual) and `f64::INFINITY` (an unmet
/// `target_fitness` of infinity, the engine's own default).
///
/// Per spec.md §4.8: an integer-valued fitness is rendered without decimals;
/// a fractional fitness is rounded to four decimals.
pub fn format_fitness(fitness: f64) -> String {
    if fitness == f64::NEG_INFINITY {
        "-inf (rejected)".to_string()
    } else if fitness == f64::INFINITY {
        "inf".to_string()
    } else if fitness == fitness.trunc() {
        format!("{fitness:.0}")
    } else {
        format!("{fitness:.4}")
    }
}

/// Renders a completed run as a multi-line, human-readable report: best
/// fitness, generations executed, stop reason, elapsed time, the effective
/// config echo, the last generation's mean/invalid-count/valid-share, every
/// aggregate evaluation/operator counter, and the configured budgets. See
/// spec.md §4.8.
pub fn format_result<T: Debug>(result: &RunResult<T>) -> String {
    let config = &result.metrics.config;
    let metrics = &result.metrics;

    let last_mean = result
        .mean_history
        .last()
        .copied()
        .unwrap_or(f64::NEG_INFINITY);
    let last_invalid = result.invalid_history.last().copied().unwrap_or(0);
    let last_valid_share = result.valid_share_history.last().copied().unwrap_or(0.0);

    format!(
        "stop_reason: {}\n\
         generations: {}\n\
         best_fitness: {}\n\
         elapsed_ms: {}\n\
         best_genome: {:?}\n\
         \n\
         config: pop_size={} generations={} elite={} cx_prob={} mut_prob={} \
         immigration={} tournament={} stall={} seed={}\n\
         budgets: target_fitness={} max_wall_ms={} max_evaluations={}\n\
         \n\
         last_generation: mean={} invalid_count={} valid_share={:.4}\n\
         \n\
         evaluations: {}\n\
         invalid_evaluations: {}\n\
         repaired: {}\n\
         repair_failures: {}\n\
         fitness_errors: {}\n\
         non_finite_fitness: {}\n\
         mutations: {}\n\
         crossovers: {}\n\
         selections: {}\n\
         immigrants: {}\n\
         elites_per_gen: {}",
        result.stop_reason,
        result.generations,
        format_fitness(result.best_fitness),
        result.elapsed_ms,
        result.best,
        config.pop_size,
        config.generations,
        config.elite,
        config.cx_prob,
        config.mut_prob,
        config.immigration,
        config.tournament,
        config.stall,
        config.seed,
        format_fitness(config.target_fitness),
        config
            .max_wall_ms
            .map(|ms| ms.to_string())
            .unwrap_or_else(|| "unbounded".to_string()),
        config
            .max_evaluations
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unbounded".to_string()),
        format_fitness(last_mean),
        last_invalid,
        last_valid_share,
        metrics.evaluations,
        metrics.invalid_evaluations,
        metrics.repaired,
        metrics.repair_failures,
        metrics.fitness_errors,
        metrics.non_finite_fitness,
        metrics.mutations,
        metrics.crossovers,
        metrics.selections,
        metrics.immigrants,
        metrics.elites_per_gen,
    )
}

/// Renders a pre-run [`RunEstimate`] as a short, human-readable report.
pub fn format_estimate(estimate: &RunEstimate) -> String {
    format!(
        "evaluations: {} (initial {} + offspring {} + immigrants {})\n\
         expected_total: {}\n\
         selections: {}\n\
         expected_crossovers: {:.1}\n\
         expected_mutations: {:.1}\n\
         estimated_ms: {:.1}{}\n\
         estimated_cost: {:.4}",
        estimate.evaluations.total,
        estimate.evaluations.initial,
        estimate.evaluations.offspring,
        estimate.evaluations.immigrants,
        estimate.evaluations.expected_total,
        estimate.operations.selections,
        estimate.operations.expected_crossovers,
        estimate.operations.expected_mutations,
        estimate.time.estimated_ms,
        if estimate.time.exceeds_wall_budget {
            " (exceeds max_wall_ms)"
        } else {
            ""
        },
        estimate.monetary.estimated_cost,
    )
}
