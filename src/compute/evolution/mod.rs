//! Evolutionary search for majority-classifying transition rules.
//!
//! # Overview
//!
//! The search system consists of:
//!
//! - **Genome Operations** (`genome`): random rules/configurations,
//!   single-point crossover, and gene-flip mutation
//! - **Fitness Evaluation** (`fitness`): randomized trial batteries that
//!   reward stable, unanimous majority classification
//! - **Search Algorithm** (`search`): generational genetic algorithm with
//!   tournament selection and two-slot elitism
//!
//! # Example
//!
//! ```rust,no_run
//! use majority_ca::compute::evolution::EvolutionEngine;
//! use majority_ca::schema::EvolutionConfig;
//!
//! let mut config = EvolutionConfig::default();
//! config.random_seed = Some(42);
//!
//! let mut engine = EvolutionEngine::new(config).unwrap();
//! let result = engine.run_with_callback(|progress| {
//!     if progress.improved {
//!         println!(
//!             "Gen # {} fitness {}",
//!             progress.generation, progress.best_fitness
//!         );
//!     }
//! });
//!
//! println!(
//!     "best fitness: {}/{}",
//!     result.best.chromosome.fitness, result.max_fitness
//! );
//! ```

mod fitness;
mod genome;
mod search;

pub use fitness::{Evaluation, FitnessEvaluator, MajorityTally, majority_value};
pub use genome::GenomeRng;
pub use search::{
    BestRecord, Chromosome, EvolutionEngine, EvolutionResult, Progress, StopReason,
};
