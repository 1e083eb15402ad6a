//! Genetic search over transition rules for the majority task.

use log::{debug, info};
use rayon::prelude::*;

use crate::compute::CaSimulator;
use crate::schema::{ConfigError, EvolutionConfig, Rule};

use super::fitness::{Evaluation, FitnessEvaluator, MajorityTally};
use super::genome::GenomeRng;

/// A candidate rule with its evaluation state.
#[derive(Debug, Clone)]
pub struct Chromosome {
    /// The transition rule.
    pub rule: Rule,
    /// Total fitness over the trial battery; valid once evaluated.
    pub fitness: u32,
    /// Mean step of peak classification across trials (diagnostic).
    pub best_step: usize,
    /// Set when the rule was created or altered and must be re-scored.
    pub needs_evaluation: bool,
}

/// Best chromosome seen so far and the generation it first appeared in.
#[derive(Debug, Clone)]
pub struct BestRecord {
    /// The record holder (fitness ties replace it, keeping plateaus moving).
    pub chromosome: Chromosome,
    /// Generation of the last strict fitness improvement.
    pub generation: usize,
}

/// Why the search loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A rule hit the theoretical fitness ceiling.
    TargetReached,
    /// The generation budget ran out.
    MaxGenerations,
}

/// Per-generation progress snapshot handed to the run callback.
#[derive(Debug, Clone)]
pub struct Progress {
    /// Generation just evaluated (0-based).
    pub generation: usize,
    /// Best-ever fitness after this generation.
    pub best_fitness: u32,
    /// Theoretical fitness ceiling.
    pub max_fitness: u32,
    /// Whether this generation strictly improved on the best-ever fitness.
    pub improved: bool,
}

/// Final search outcome.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Best chromosome across the whole run.
    pub best: BestRecord,
    /// Generations actually evaluated.
    pub generations: usize,
    /// Theoretical fitness ceiling for the run's geometry.
    pub max_fitness: u32,
    /// Why the loop stopped.
    pub stop_reason: StopReason,
    /// Majority-label distribution over every trial of the run.
    pub tally: MajorityTally,
}

/// Evolution engine: evaluate, elitism, reproduce, swap, repeat.
///
/// The population is double-buffered; each generation is bred into the
/// spare buffer and the two are swapped, so a generation is replaced
/// atomically.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    rng: GenomeRng,
    evaluator: FitnessEvaluator,
    population: Vec<Chromosome>,
    next_population: Vec<Chromosome>,
    best: Option<BestRecord>,
    tally: MajorityTally,
    generation: usize,
}

impl EvolutionEngine {
    /// Create a new engine; fails fast on a malformed configuration.
    pub fn new(config: EvolutionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.random_seed.unwrap_or_else(rand::random);
        let rng = GenomeRng::new(seed);
        let evaluator =
            FitnessEvaluator::new(config.simulation.clone(), config.search.num_configs);
        debug!("engine seeded with {seed}");

        Ok(Self {
            config,
            rng,
            evaluator,
            population: Vec::new(),
            next_population: Vec::new(),
            best: None,
            tally: MajorityTally::default(),
            generation: 0,
        })
    }

    /// (Re)build a fully random population.
    fn initialize(&mut self) {
        let table_len = self.config.simulation.rule_table_len();
        let size = self.config.search.population_size;

        self.population = (0..size)
            .map(|_| Chromosome {
                rule: self.rng.random_rule(table_len),
                fitness: 0,
                best_step: 0,
                needs_evaluation: true,
            })
            .collect();
        self.next_population.clear();
        self.best = None;
        self.tally = MajorityTally::default();
        self.generation = 0;
    }

    /// Evaluate every flagged chromosome.
    ///
    /// Work is spread across threads with one simulator arena per worker;
    /// each chromosome gets its own RNG stream seeded sequentially from the
    /// master RNG, so results do not depend on scheduling. The fold back
    /// into the population runs in index order, which makes the `>=`
    /// best-record tie policy (latest evaluated wins) deterministic.
    fn evaluate_population(&mut self) {
        let jobs: Vec<(usize, u64)> = (0..self.population.len())
            .filter(|&index| self.population[index].needs_evaluation)
            .map(|index| (index, self.rng.next_seed()))
            .collect();

        let results: Vec<(usize, Evaluation)> = {
            let evaluator = &self.evaluator;
            let simulation = &self.config.simulation;
            let population = &self.population;
            jobs.into_par_iter()
                .map_init(
                    || CaSimulator::new(simulation),
                    |sim, (index, seed)| {
                        let mut rng = GenomeRng::new(seed);
                        (index, evaluator.evaluate(sim, &population[index].rule, &mut rng))
                    },
                )
                .collect()
        };

        for (index, evaluation) in results {
            self.tally.merge(&evaluation.tally);
            let chromosome = &mut self.population[index];
            chromosome.fitness = evaluation.fitness;
            chromosome.best_step = evaluation.best_step;
            chromosome.needs_evaluation = false;

            if let Some(record) = self.best.as_mut() {
                if chromosome.fitness > record.chromosome.fitness {
                    record.chromosome = chromosome.clone();
                    record.generation = self.generation;
                } else if chromosome.fitness == record.chromosome.fitness {
                    // Ties replace, so equal-fitness plateaus keep being explored.
                    record.chromosome = chromosome.clone();
                }
            } else {
                self.best = Some(BestRecord {
                    chromosome: chromosome.clone(),
                    generation: self.generation,
                });
            }
        }
    }

    /// Pick two distinct parents by tournament: sample `tournament_size`
    /// indices with replacement, re-sample while the pool collapses to a
    /// single individual, then keep the two best distinct entrants.
    fn select_parents(&mut self) -> (usize, usize) {
        let size = self.population.len();
        let tour = self.config.search.tournament_size.max(2);

        let mut pool: Vec<usize> = (0..tour).map(|_| self.rng.index(size)).collect();
        while pool.iter().all(|&entry| entry == pool[0]) {
            pool.push(self.rng.index(size));
        }
        pool.sort_unstable();
        pool.dedup();
        pool.sort_by(|&a, &b| self.population[b].fitness.cmp(&self.population[a].fitness));

        (pool[0], pool[1])
    }

    /// Breed the next generation into the spare buffer and swap.
    fn breed_next_generation(&mut self) {
        let search = self.config.search.clone();
        let best = self
            .best
            .as_ref()
            .expect("breeding requires an evaluated population")
            .chromosome
            .clone();

        self.next_population.clear();

        // Elitism: slot 0 keeps the record holder verbatim, slot 1 takes a
        // forced mutant of it.
        self.next_population.push(Chromosome {
            needs_evaluation: false,
            ..best.clone()
        });
        let mut mutant = best;
        mutant.needs_evaluation = self.rng.mutate(&mut mutant.rule, 1.0, search.mutation_genes);
        self.next_population.push(mutant);

        while self.next_population.len() < search.population_size {
            let (first, second) = self.select_parents();

            let (mut child1, mut child2) = if self.rng.chance(search.crossover_rate) {
                let (rule1, rule2) = self
                    .rng
                    .crossover(&self.population[first].rule, &self.population[second].rule);
                (fresh_child(rule1), fresh_child(rule2))
            } else {
                // No crossover: verbatim copies keep their parents' scores.
                (
                    self.population[first].clone(),
                    self.population[second].clone(),
                )
            };

            if self
                .rng
                .mutate(&mut child1.rule, search.mutation_rate, search.mutation_genes)
            {
                child1.needs_evaluation = true;
            }
            if self
                .rng
                .mutate(&mut child2.rule, search.mutation_rate, search.mutation_genes)
            {
                child2.needs_evaluation = true;
            }

            self.next_population.push(child1);
            if self.next_population.len() < search.population_size {
                self.next_population.push(child2);
            }
        }

        std::mem::swap(&mut self.population, &mut self.next_population);
        self.generation += 1;
    }

    /// Run the search, invoking `callback` after each generation's
    /// evaluation phase.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> EvolutionResult
    where
        F: FnMut(&Progress),
    {
        self.initialize();
        let max_fitness = self.config.max_fitness();

        let stop_reason = loop {
            let previous_best = self.best.as_ref().map_or(0, |b| b.chromosome.fitness);
            self.evaluate_population();

            let best_fitness = self
                .best
                .as_ref()
                .map_or(0, |record| record.chromosome.fitness);
            let improved = best_fitness > previous_best;
            if improved {
                info!(
                    "generation {}: best fitness {best_fitness}/{max_fitness}",
                    self.generation
                );
            }
            callback(&Progress {
                generation: self.generation,
                best_fitness,
                max_fitness,
                improved,
            });

            if best_fitness == max_fitness {
                break StopReason::TargetReached;
            }
            if self.generation + 1 >= self.config.search.generations {
                break StopReason::MaxGenerations;
            }
            self.breed_next_generation();
        };

        let best = self
            .best
            .clone()
            .expect("search evaluated at least one generation");
        debug!(
            "search ended after generation {} ({stop_reason:?})",
            self.generation
        );

        EvolutionResult {
            best,
            generations: self.generation + 1,
            max_fitness,
            stop_reason,
            tally: self.tally,
        }
    }

    /// Run the search without progress reporting.
    pub fn run(&mut self) -> EvolutionResult {
        self.run_with_callback(|_| {})
    }
}

/// A just-bred chromosome awaiting its first evaluation.
fn fresh_child(rule: Rule) -> Chromosome {
    Chromosome {
        rule,
        fitness: 0,
        best_step: 0,
        needs_evaluation: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SearchConfig, SimulationConfig};

    fn small_config(seed: u64) -> EvolutionConfig {
        EvolutionConfig {
            simulation: SimulationConfig {
                config_length: 9,
                radius: 1,
                steps: 12,
            },
            search: SearchConfig {
                num_configs: 10,
                generations: 8,
                population_size: 20,
                ..SearchConfig::default()
            },
            random_seed: Some(seed),
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = small_config(1);
        config.search.population_size = 0;
        assert!(EvolutionEngine::new(config).is_err());
    }

    #[test]
    fn test_population_size_is_stable() {
        let mut engine = EvolutionEngine::new(small_config(11)).unwrap();
        engine.initialize();
        assert_eq!(engine.population.len(), 20);

        engine.evaluate_population();
        engine.breed_next_generation();
        assert_eq!(engine.population.len(), 20);
        assert_eq!(engine.generation, 1);
    }

    #[test]
    fn test_elite_slots() {
        let mut engine = EvolutionEngine::new(small_config(11)).unwrap();
        engine.initialize();
        engine.evaluate_population();
        let best = engine.best.as_ref().unwrap().chromosome.clone();

        engine.breed_next_generation();
        // Slot 0 carries the record holder verbatim and keeps its score.
        assert_eq!(engine.population[0].rule, best.rule);
        assert_eq!(engine.population[0].fitness, best.fitness);
        assert!(!engine.population[0].needs_evaluation);
        // Slot 1 is its forced mutant: at most mutation_genes positions moved.
        assert!(engine.population[1].needs_evaluation);
        let distance = engine.population[1]
            .rule
            .bits()
            .iter()
            .zip(best.rule.bits())
            .filter(|(a, b)| a != b)
            .count();
        assert!(distance <= 2);
    }

    #[test]
    fn test_best_fitness_is_monotonic() {
        let mut engine = EvolutionEngine::new(small_config(3)).unwrap();
        let mut last = 0u32;
        engine.run_with_callback(|progress| {
            assert!(progress.best_fitness >= last);
            last = progress.best_fitness;
        });
    }

    #[test]
    fn test_run_is_reproducible() {
        let first = EvolutionEngine::new(small_config(77)).unwrap().run();
        let second = EvolutionEngine::new(small_config(77)).unwrap().run();
        assert_eq!(
            first.best.chromosome.rule.bits(),
            second.best.chromosome.rule.bits()
        );
        assert_eq!(first.best.chromosome.fitness, second.best.chromosome.fitness);
        assert_eq!(first.tally, second.tally);
        assert_eq!(first.generations, second.generations);
    }

    #[test]
    fn test_fitness_within_ceiling() {
        let config = small_config(5);
        let max_fitness = config.max_fitness();
        let result = EvolutionEngine::new(config).unwrap().run();
        assert!(result.best.chromosome.fitness <= max_fitness);
        assert_eq!(result.max_fitness, max_fitness);
    }

    #[test]
    fn test_stops_at_generation_budget() {
        let mut config = small_config(9);
        config.search.generations = 4;
        // An unclassifiable geometry keeps fitness short of the ceiling:
        // steps budget 2 leaves a single computed row, so no trace can ever
        // show two identical consecutive rows.
        config.simulation.steps = 2;
        let result = EvolutionEngine::new(config).unwrap().run();
        assert_eq!(result.stop_reason, StopReason::MaxGenerations);
        assert_eq!(result.generations, 4);
        assert_eq!(result.best.chromosome.fitness, 0);
    }

    #[test]
    fn test_tournament_returns_distinct_parents() {
        let mut engine = EvolutionEngine::new(small_config(13)).unwrap();
        engine.initialize();
        engine.evaluate_population();
        for _ in 0..200 {
            let (first, second) = engine.select_parents();
            assert_ne!(first, second);
        }
    }

    #[test]
    fn test_tally_counts_every_trial() {
        let config = small_config(21);
        let result = EvolutionEngine::new(config).unwrap().run();
        // Every evaluated chromosome ran the full trial battery.
        assert_eq!((result.tally.ones + result.tally.zeros) % 10, 0);
        assert!(result.tally.ones + result.tally.zeros > 0);
    }
}
