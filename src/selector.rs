//! Pluggable parent-index selection.
//!
//! The default is k-tournament selection. Custom selectors are stored as
//! trait objects (their dispatch cost is amortized per generation, unlike
//! the per-individual `Problem` operators, which are monomorphized) and
//! must draw randomness exclusively from the engine's RNG to preserve
//! determinism.

use crate::individual::Individual;
use crate::rng::Rng;

/// Chooses a parent index from the population.
pub trait Selector<T> {
    /// Selects an index into `population`.
    ///
    /// # Panics
    /// Implementations may assume `population` is non-empty and should
    /// panic if it isn't, matching [`TournamentSelector`]'s behavior.
    fn select(&self, population: &[Individual<T>], rng: &mut dyn Rng) -> usize;
}

/// K-tournament selection: sample `k` indices with replacement, return the
/// one with the strictly highest fitness seen so far.
///
/// Ties are broken by keeping the earliest index encountered (the update
/// uses strict `>`, never `>=`). Tournament sizes larger than the
/// population are permitted; indices are still sampled with replacement.
pub struct TournamentSelector {
    pub k: usize,
}

impl TournamentSelector {
    pub fn new(k: usize) -> Self {
        Self { k: k.max(1) }
    }
}

impl<T> Selector<T> for TournamentSelector {
    fn select(&self, population: &[Individual<T>], rng: &mut dyn Rng) -> usize {
        assert!(!population.is_empty(), "cannot select from empty population");

        let n = population.len() as u64;
        let mut best_idx = rng.next_index(n) as usize;
        for _ in 1..self.k.max(1) {
            let idx = rng.next_index(n) as usize;
            if population[idx].fitness > population[best_idx].fitness {
                best_idx = idx;
            }
        }
        best_idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Mulberry32;

    fn make_population(fitnesses: &[f64]) -> Vec<Individual<()>> {
        fitnesses.iter().map(|&f| Individual::new((), f)).collect()
    }

    #[test]
    fn favors_the_best_individual() {
        let pop = make_population(&[1.0, 5.0, 10.0, 8.0]);
        let mut rng = Mulberry32::new(42);
        let selector = TournamentSelector::new(4);

        let mut counts = [0u32; 4];
        let n = 10_000;
        for _ in 0..n {
            let idx = selector.select(&pop, &mut rng);
            counts[idx] += 1;
        }
        assert!(
            counts[2] > 6000,
            "expected the best individual to dominate selection, got {counts:?}"
        );
    }

    #[test]
    fn size_one_is_uniform() {
        let pop = make_population(&[1.0, 5.0, 10.0, 8.0]);
        let mut rng = Mulberry32::new(42);
        let selector = TournamentSelector::new(1);

        let mut counts = [0u32; 4];
        let n = 10_000;
        for _ in 0..n {
            counts[selector.select(&pop, &mut rng)] += 1;
        }
        for c in counts {
            assert!(c > 1500, "expected roughly uniform selection, got {counts:?}");
        }
    }

    #[test]
    fn larger_than_population_is_allowed() {
        let pop = make_population(&[1.0, 2.0, 3.0]);
        let mut rng = Mulberry32::new(1);
        let selector = TournamentSelector::new(10);
        for _ in 0..100 {
            let idx = selector.select(&pop, &mut rng);
            assert!(idx < 3);
        }
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn empty_population_panics() {
        let pop: Vec<Individual<()>> = vec![];
        let mut rng = Mulberry32::new(1);
        TournamentSelector::new(3).select(&pop, &mut rng);
    }

    #[test]
    fn single_individual_always_wins() {
        let pop = make_population(&[5.0]);
        let mut rng = Mulberry32::new(1);
        let selector = TournamentSelector::new(3);
        for _ in 0..50 {
            assert_eq!(selector.select(&pop, &mut rng), 0);
        }
    }
}
