//! The trait domain code implements to plug a genome into the engine.
//!
//! Mirrors the teacher crate's `GaProblem` shape: initialization, evaluation,
//! crossover, mutation, plus a generation-end callback. Here the optional
//! capabilities (`is_valid`, `repair`, `distance`) are modeled as
//! `Option`-returning methods, where `None` means "this problem does not
//! implement this operator" — the Rust analogue of duck-typing a missing
//! method in a dynamically typed host.

use crate::rng::Rng;

/// Per-generation context handed to [`Problem::on_generation_end`].
pub struct GenerationEndCtx<'a, T> {
    pub gen: usize,
    pub best: f64,
    pub mean: f64,
    pub invalid_count: usize,
    pub best_genome: &'a T,
    pub elapsed_ms: u128,
}

/// Defines a genetic-programming/genetic-algorithm optimization problem over
/// genome type `T`.
///
/// `T` is opaque to the engine: all manipulation flows through these
/// operators. The engine is generic over `Problem<T>` rather than boxing it,
/// so calls on the hot per-individual path (`fitness`, `mutate`,
/// `crossover`, `create_random`) are monomorphized, not dispatched through a
/// vtable — only the engine-wide RNG and selector use dynamic dispatch (see
/// `crate::selector::Selector`), since their cost is amortized across a
/// whole generation rather than paid per individual.
pub trait Problem<T> {
    /// Creates a random genome. Called during initialization and
    /// immigration.
    fn create_random(&self, rng: &mut dyn Rng) -> T;

    /// Computes the fitness of a genome. Higher is better.
    ///
    /// The engine calls this inside a panic boundary: a panic here is
    /// treated as a recoverable "fitness error" and the genome is ranked
    /// `f64::NEG_INFINITY`. A panic from any other operator (`mutate`,
    /// `crossover`, `create_random`) is **not** caught and aborts the run —
    /// those are programmer errors, not data-dependent evaluation failures.
    fn fitness(&self, genome: &T) -> f64;

    /// Mutates a genome, returning the mutated value.
    fn mutate(&self, genome: T, rng: &mut dyn Rng) -> T;

    /// Recombines two parents into two children.
    fn crossover(&self, a: &T, b: &T, rng: &mut dyn Rng) -> (T, T);

    /// Checks whether a genome is structurally valid.
    ///
    /// Returns `None` when this problem does not implement validity
    /// checking (the engine then treats every genome as valid).
    fn is_valid(&self, _genome: &T) -> Option<bool> {
        None
    }

    /// Attempts to repair an invalid genome.
    ///
    /// Returns `None` when this problem does not implement repair. When
    /// implemented, the returned genome is re-checked with [`Problem::is_valid`];
    /// if still invalid, the individual is permanently ranked
    /// `f64::NEG_INFINITY` for this evaluation.
    fn repair(&self, _genome: T, _rng: &mut dyn Rng) -> Option<T> {
        None
    }

    /// Distance between two genomes. Reserved for future niching/diversity
    /// extensions; the core loop never calls it.
    fn distance(&self, _a: &T, _b: &T) -> Option<f64> {
        None
    }

    /// Called synchronously at the very start of each generation, before
    /// sorting. Must not mutate the population or config; the engine only
    /// ever passes it immutable scalars.
    fn on_generation_start(&self, _gen: usize, _elapsed_ms: u128) {}

    /// Called synchronously at the end of each generation, after stats have
    /// been computed and the short `on_generation` callback (if any) has
    /// fired.
    fn on_generation_end(&self, _ctx: &GenerationEndCtx<'_, T>) {}
}
