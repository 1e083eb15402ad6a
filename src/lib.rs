//! Evolving 1D binary cellular automata for the density classification
//! (majority) task.
//!
//! A genetic algorithm searches the space of local transition rules for one
//! whose automaton, started from a random bit configuration, settles into a
//! stable all-ones or all-zeros state matching the configuration's majority
//! bit. A trial only pays out when the trace reaches a fixed point that
//! unanimously encodes the expected bit, so oscillators and partial
//! classifiers score nothing.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: configuration types and the rule representation
//! - `compute`: the CA simulator and the evolutionary search
//! - `report`: run summaries and the append-only statistics file
//!
//! # Example
//!
//! ```rust,no_run
//! use majority_ca::{
//!     compute::evolution::EvolutionEngine,
//!     schema::EvolutionConfig,
//! };
//!
//! let mut config = EvolutionConfig::default();
//! config.simulation.config_length = 9;
//! config.search.num_configs = 50;
//! config.random_seed = Some(42);
//!
//! let mut engine = EvolutionEngine::new(config).unwrap();
//! let result = engine.run();
//!
//! println!(
//!     "best fitness {}/{} found in generation {}",
//!     result.best.chromosome.fitness, result.max_fitness, result.best.generation
//! );
//! ```

pub mod compute;
pub mod report;
pub mod schema;

// Re-export commonly used types
pub use compute::CaSimulator;
pub use compute::evolution::{EvolutionEngine, EvolutionResult};
pub use schema::{EvolutionConfig, Rule, SimulationConfig};
