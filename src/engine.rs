//! The evolutionary loop: init -> sort -> stats -> stop checks -> breed ->
//! immigrate -> replace.

use std::cmp::Ordering;
use std::time::Instant;

use crate::config::{self, Config, EffectiveConfig};
use crate::error::GpLiteError;
use crate::evaluator::safe_evaluate;
use crate::individual::Individual;
use crate::metrics::{Metrics, StopReason};
use crate::problem::{GenerationEndCtx, Problem};
use crate::rng::{Mulberry32, Rng};
use crate::selector::{Selector, TournamentSelector};

/// Context passed to the short `on_generation` callback given to
/// [`Engine::run`].
#[derive(Debug, Clone, Copy)]
pub struct GenerationCtx {
    pub gen: usize,
    pub best: f64,
    pub mean: f64,
}

/// Extended stats passed alongside [`GenerationCtx`].
#[derive(Debug, Clone, Copy)]
pub struct GenerationExtra {
    pub invalid_count: usize,
    pub valid_share: f64,
}

/// The outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunResult<T> {
    pub best: T,
    pub best_fitness: f64,
    pub generations: usize,
    pub history: Vec<f64>,
    pub mean_history: Vec<f64>,
    pub invalid_history: Vec<usize>,
    pub valid_share_history: Vec<f64>,
    pub elapsed_ms: u128,
    pub stop_reason: StopReason,
    pub metrics: Metrics,
}

/// Drives the evolutionary loop for a given `Problem<T>`.
///
/// Generic over `T` and `P` (not boxed), so the per-individual hot path
/// (`fitness`, `mutate`, `crossover`, `create_random`) is monomorphized.
/// The RNG and the selector are trait objects, since a user may inject
/// alternatives and their dispatch cost is amortized across a whole
/// generation rather than paid per individual.
pub struct Engine<T, P: Problem<T>> {
    problem: P,
    config: EffectiveConfig,
    rng: Box<dyn Rng>,
    selector: Box<dyn Selector<T>>,
}

impl<T, P> Engine<T, P>
where
    T: Clone,
    P: Problem<T>,
{
    /// Validates `config`, then constructs an engine with the default
    /// RNG ([`Mulberry32`]) and the default selector
    /// ([`TournamentSelector`]).
    pub fn new(problem: P, config: Config) -> Result<Self, GpLiteError> {
        let effective = config::normalize(&config)?;
        let rng = Box::new(Mulberry32::new(effective.seed));
        let selector = Box::new(TournamentSelector::new(effective.tournament));
        Ok(Self {
            problem,
            config: effective,
            rng,
            selector,
        })
    }

    /// Injects a custom RNG, replacing the default [`Mulberry32`].
    ///
    /// Custom RNGs must honor the same two-method contract
    /// ([`crate::rng::Rng`]) and draw no entropy outside of it, or
    /// determinism breaks.
    pub fn with_rng(mut self, rng: Box<dyn Rng>) -> Self {
        self.rng = rng;
        self
    }

    /// Injects a custom selector, replacing the default tournament
    /// selector.
    pub fn with_selector(mut self, selector: Box<dyn Selector<T>>) -> Self {
        self.selector = selector;
        self
    }

    /// Runs the evolutionary loop to completion.
    ///
    /// `on_generation`, when provided, fires once per generation right
    /// after stats are computed, before `Problem::on_generation_end`.
    pub fn run(
        &mut self,
        mut on_generation: Option<impl FnMut(GenerationCtx, GenerationExtra)>,
    ) -> RunResult<T> {
        let start = Instant::now();
        let mut metrics = Metrics::new(self.config.clone());
        let pop_size = self.config.pop_size;

        let mut population: Vec<Individual<T>> = Vec::with_capacity(pop_size);
        for _ in 0..pop_size {
            let genome = self.problem.create_random(self.rng.as_mut());
            let (genome, fitness) =
                safe_evaluate(&self.problem, genome, self.rng.as_mut(), &mut metrics);
            population.push(Individual::new(genome, fitness));
        }

        if let Some(max_eval) = self.config.max_evaluations {
            if metrics.evaluations >= max_eval {
                sort_descending(&mut population);
                let best = population[0].clone();
                log::debug!(
                    "stopping before generation 0: max_evaluations exhausted by init (evaluations={})",
                    metrics.evaluations
                );
                return RunResult {
                    best: best.genome,
                    best_fitness: best.fitness,
                    generations: 0,
                    history: vec![best.fitness],
                    mean_history: vec![f64::NEG_INFINITY],
                    invalid_history: vec![0],
                    valid_share_history: vec![1.0],
                    elapsed_ms: start.elapsed().as_millis(),
                    stop_reason: StopReason::Evaluations,
                    metrics,
                };
            }
        }

        let mut history = Vec::with_capacity(self.config.generations);
        let mut mean_history = Vec::with_capacity(self.config.generations);
        let mut invalid_history = Vec::with_capacity(self.config.generations);
        let mut valid_share_history = Vec::with_capacity(self.config.generations);

        let mut stop_reason: Option<StopReason> = None;
        let mut executed_generations = 0usize;

        'generations: for gen in 0..self.config.generations {
            self.problem
                .on_generation_start(gen, start.elapsed().as_millis());

            sort_descending(&mut population);

            let best_fitness = population[0].fitness;
            let (finite_sum, finite_count, invalid_count) = population.iter().fold(
                (0.0f64, 0usize, 0usize),
                |(sum, fcount, icount), ind| {
                    if ind.fitness.is_finite() {
                        (sum + ind.fitness, fcount + 1, icount)
                    } else {
                        (sum, fcount, icount + 1)
                    }
                },
            );
            let mean = if finite_count > 0 {
                finite_sum / finite_count as f64
            } else {
                f64::NEG_INFINITY
            };
            let valid_share = finite_count as f64 / pop_size as f64;

            history.push(best_fitness);
            mean_history.push(mean);
            invalid_history.push(invalid_count);
            valid_share_history.push(valid_share);

            log::trace!(
                "gen={gen} best={best_fitness} mean={mean} invalid_count={invalid_count}"
            );

            if let Some(cb) = on_generation.as_mut() {
                cb(
                    GenerationCtx {
                        gen,
                        best: best_fitness,
                        mean,
                    },
                    GenerationExtra {
                        invalid_count,
                        valid_share,
                    },
                );
            }

            self.problem.on_generation_end(&GenerationEndCtx {
                gen,
                best: best_fitness,
                mean,
                invalid_count,
                best_genome: &population[0].genome,
                elapsed_ms: start.elapsed().as_millis(),
            });

            executed_generations = gen + 1;

            if best_fitness >= self.config.target_fitness {
                stop_reason = Some(StopReason::Target);
                log::debug!("gen={gen} stopping: target_fitness reached (best={best_fitness})");
                break 'generations;
            }
            if let Some(max_wall) = self.config.max_wall_ms {
                let elapsed = start.elapsed().as_millis() as u64;
                if elapsed > max_wall {
                    stop_reason = Some(StopReason::Time);
                    log::debug!("gen={gen} stopping: max_wall_ms exceeded (elapsed={elapsed}ms)");
                    break 'generations;
                }
            }
            if let Some(max_eval) = self.config.max_evaluations {
                if metrics.evaluations >= max_eval {
                    stop_reason = Some(StopReason::Evaluations);
                    log::debug!(
                        "gen={gen} stopping: max_evaluations exhausted (evaluations={})",
                        metrics.evaluations
                    );
                    break 'generations;
                }
            }
            if self.config.stall > 0 && history.len() > self.config.stall {
                let last = history[history.len() - 1];
                let prior = history[history.len() - 1 - self.config.stall];
                if last <= prior {
                    stop_reason = Some(StopReason::Stall);
                    log::debug!(
                        "gen={gen} stopping: no improvement over stall window ({} generations)",
                        self.config.stall
                    );
                    break 'generations;
                }
            }

            let elite = self.config.elite;
            let immigrants_per_gen = ((pop_size as f64 * self.config.immigration).floor()
                as usize)
                .min(pop_size - elite);
            let breed_target = pop_size - immigrants_per_gen;

            let mut successor: Vec<Individual<T>> = Vec::with_capacity(pop_size);
            successor.extend(population[..elite].iter().cloned());
            metrics.elites_per_gen = elite as u64;

            let mut budget_hit = false;
            while successor.len() < breed_target {
                let p1 = self.selector.select(&population, self.rng.as_mut());
                let p2 = self.selector.select(&population, self.rng.as_mut());
                metrics.selections += 2;

                let cx_roll = self.rng.next_f64();
                let (c1, c2) = if cx_roll < self.config.cx_prob {
                    metrics.crossovers += 1;
                    self.problem.crossover(
                        &population[p1].genome,
                        &population[p2].genome,
                        self.rng.as_mut(),
                    )
                } else {
                    (population[p1].genome.clone(), population[p2].genome.clone())
                };

                let mut_roll1 = self.rng.next_f64();
                let c1 = if mut_roll1 < self.config.mut_prob {
                    metrics.mutations += 1;
                    self.problem.mutate(c1, self.rng.as_mut())
                } else {
                    c1
                };
                let (c1_genome, c1_fitness) =
                    safe_evaluate(&self.problem, c1, self.rng.as_mut(), &mut metrics);
                successor.push(Individual::new(c1_genome, c1_fitness));

                if let Some(max_eval) = self.config.max_evaluations {
                    if metrics.evaluations >= max_eval {
                        stop_reason = Some(StopReason::Evaluations);
                        budget_hit = true;
                        break;
                    }
                }

                if successor.len() < breed_target {
                    let mut_roll2 = self.rng.next_f64();
                    let c2 = if mut_roll2 < self.config.mut_prob {
                        metrics.mutations += 1;
                        self.problem.mutate(c2, self.rng.as_mut())
                    } else {
                        c2
                    };
                    let (c2_genome, c2_fitness) =
                        safe_evaluate(&self.problem, c2, self.rng.as_mut(), &mut metrics);
                    successor.push(Individual::new(c2_genome, c2_fitness));

                    if let Some(max_eval) = self.config.max_evaluations {
                        if metrics.evaluations >= max_eval {
                            stop_reason = Some(StopReason::Evaluations);
                            budget_hit = true;
                            break;
                        }
                    }
                }
            }

            if !budget_hit {
                while successor.len() < pop_size {
                    let genome = self.problem.create_random(self.rng.as_mut());
                    let (genome, fitness) =
                        safe_evaluate(&self.problem, genome, self.rng.as_mut(), &mut metrics);
                    successor.push(Individual::new(genome, fitness));
                    metrics.immigrants += 1;

                    if let Some(max_eval) = self.config.max_evaluations {
                        if metrics.evaluations >= max_eval {
                            stop_reason = Some(StopReason::Evaluations);
                            budget_hit = true;
                            break;
                        }
                    }
                }
            }

            population = successor;

            if budget_hit {
                log::debug!(
                    "gen={gen} stopping: max_evaluations exhausted mid-breeding (evaluations={})",
                    metrics.evaluations
                );
                break 'generations;
            }
        }

        sort_descending(&mut population);
        let best = population[0].clone();
        let stop_reason = stop_reason.unwrap_or(StopReason::Generations);

        log::debug!(
            "gp-lite run finished: generations={executed_generations} stop_reason={stop_reason} best_fitness={}",
            best.fitness
        );

        RunResult {
            best: best.genome,
            best_fitness: best.fitness,
            generations: executed_generations,
            history,
            mean_history,
            invalid_history,
            valid_share_history,
            elapsed_ms: start.elapsed().as_millis(),
            stop_reason,
            metrics,
        }
    }
}

fn sort_descending<T>(population: &mut [Individual<T>]) {
    population.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(Ordering::Equal));
}
