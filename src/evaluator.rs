//! Wraps a user's `fitness` (and optional `is_valid`/`repair`) in a shield
//! that never lets invalid data or a panicking fitness function escape as
//! anything other than `f64::NEG_INFINITY`.

use crate::metrics::Metrics;
use crate::problem::Problem;
use crate::rng::Rng;

/// Evaluates one candidate genome, updating `metrics` as it goes.
///
/// Returns the (possibly repaired) genome alongside its fitness. The
/// genome is returned because `repair` may replace it; the caller stores
/// whatever comes back, not the original.
///
/// Steps, in order:
/// 1. Increments `evaluations`.
/// 2. If `is_valid` is implemented and reports `false`: attempts `repair`
///    when available, re-checks validity, and counts `repaired` /
///    `repair_failures` accordingly. With no `repair` available, the
///    genome is rejected outright.
/// 3. Otherwise calls `fitness` inside a panic boundary; a panic counts as
///    a `fitness_error`, and a non-finite result counts as
///    `non_finite_fitness`. Both map to `f64::NEG_INFINITY`.
pub(crate) fn safe_evaluate<T, P>(
    problem: &P,
    mut genome: T,
    rng: &mut dyn Rng,
    metrics: &mut Metrics,
) -> (T, f64)
where
    T: Clone,
    P: Problem<T>,
{
    metrics.evaluations += 1;

    if let Some(false) = problem.is_valid(&genome) {
        match problem.repair(genome.clone(), rng) {
            Some(repaired) => {
                genome = repaired;
                let still_invalid = matches!(problem.is_valid(&genome), Some(false));
                if still_invalid {
                    metrics.invalid_evaluations += 1;
                    metrics.repair_failures += 1;
                    return (genome, f64::NEG_INFINITY);
                }
                metrics.repaired += 1;
            }
            None => {
                metrics.invalid_evaluations += 1;
                return (genome, f64::NEG_INFINITY);
            }
        }
    }

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        problem.fitness(&genome)
    }));

    match outcome {
        Err(_) => {
            log::warn!("fitness evaluation panicked; ranking genome as -inf");
            metrics.fitness_errors += 1;
            metrics.invalid_evaluations += 1;
            (genome, f64::NEG_INFINITY)
        }
        Ok(f) if !f.is_finite() => {
            metrics.non_finite_fitness += 1;
            metrics.invalid_evaluations += 1;
            (genome, f64::NEG_INFINITY)
        }
        Ok(f) => (genome, f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{normalize, Config};
    use crate::rng::Mulberry32;

    struct AlwaysThrows;
    impl Problem<f64> for AlwaysThrows {
        fn create_random(&self, _rng: &mut dyn Rng) -> f64 {
            0.0
        }
        fn fitness(&self, _genome: &f64) -> f64 {
            panic!("boom");
        }
        fn mutate(&self, genome: f64, _rng: &mut dyn Rng) -> f64 {
            genome
        }
        fn crossover(&self, a: &f64, b: &f64, _rng: &mut dyn Rng) -> (f64, f64) {
            (*a, *b)
        }
    }

    struct ReturnsNan;
    impl Problem<f64> for ReturnsNan {
        fn create_random(&self, _rng: &mut dyn Rng) -> f64 {
            0.0
        }
        fn fitness(&self, _genome: &f64) -> f64 {
            f64::NAN
        }
        fn mutate(&self, genome: f64, _rng: &mut dyn Rng) -> f64 {
            genome
        }
        fn crossover(&self, a: &f64, b: &f64, _rng: &mut dyn Rng) -> (f64, f64) {
            (*a, *b)
        }
    }

    struct AlwaysInvalidNoRepair;
    impl Problem<f64> for AlwaysInvalidNoRepair {
        fn create_random(&self, _rng: &mut dyn Rng) -> f64 {
            0.0
        }
        fn fitness(&self, genome: &f64) -> f64 {
            *genome
        }
        fn mutate(&self, genome: f64, _rng: &mut dyn Rng) -> f64 {
            genome
        }
        fn crossover(&self, a: &f64, b: &f64, _rng: &mut dyn Rng) -> (f64, f64) {
            (*a, *b)
        }
        fn is_valid(&self, _genome: &f64) -> Option<bool> {
            Some(false)
        }
    }

    struct AlwaysInvalidButRepairable;
    impl Problem<f64> for AlwaysInvalidButRepairable {
        fn create_random(&self, _rng: &mut dyn Rng) -> f64 {
            -1.0
        }
        fn fitness(&self, genome: &f64) -> f64 {
            *genome
        }
        fn mutate(&self, genome: f64, _rng: &mut dyn Rng) -> f64 {
            genome
        }
        fn crossover(&self, a: &f64, b: &f64, _rng: &mut dyn Rng) -> (f64, f64) {
            (*a, *b)
        }
        fn is_valid(&self, genome: &f64) -> Option<bool> {
            Some(*genome >= 0.0)
        }
        fn repair(&self, genome: f64, _rng: &mut dyn Rng) -> Option<f64> {
            Some(genome.abs())
        }
    }

    fn fresh_metrics() -> Metrics {
        Metrics::new(normalize(&Config::default()).unwrap())
    }

    #[test]
    fn panicking_fitness_maps_to_neg_infinity() {
        let mut metrics = fresh_metrics();
        let mut rng = Mulberry32::new(1);
        let (_, f) = safe_evaluate(&AlwaysThrows, 0.0, &mut rng, &mut metrics);
        assert_eq!(f, f64::NEG_INFINITY);
        assert_eq!(metrics.fitness_errors, 1);
        assert_eq!(metrics.invalid_evaluations, 1);
        assert_eq!(metrics.evaluations, 1);
    }

    #[test]
    fn nan_fitness_maps_to_neg_infinity() {
        let mut metrics = fresh_metrics();
        let mut rng = Mulberry32::new(1);
        let (_, f) = safe_evaluate(&ReturnsNan, 0.0, &mut rng, &mut metrics);
        assert_eq!(f, f64::NEG_INFINITY);
        assert_eq!(metrics.non_finite_fitness, 1);
        assert_eq!(metrics.invalid_evaluations, 1);
    }

    #[test]
    fn invalid_without_repair_is_rejected() {
        let mut metrics = fresh_metrics();
        let mut rng = Mulberry32::new(1);
        let (_, f) = safe_evaluate(&AlwaysInvalidNoRepair, 5.0, &mut rng, &mut metrics);
        assert_eq!(f, f64::NEG_INFINITY);
        assert_eq!(metrics.invalid_evaluations, 1);
        assert_eq!(metrics.repaired, 0);
    }

    #[test]
    fn invalid_with_successful_repair_is_counted_and_evaluated() {
        let mut metrics = fresh_metrics();
        let mut rng = Mulberry32::new(1);
        let (genome, f) = safe_evaluate(&AlwaysInvalidButRepairable, -3.0, &mut rng, &mut metrics);
        assert_eq!(genome, 3.0);
        assert_eq!(f, 3.0);
        assert_eq!(metrics.repaired, 1);
        assert_eq!(metrics.invalid_evaluations, 0);
    }
}
