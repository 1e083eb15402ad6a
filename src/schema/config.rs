//! Configuration types for the automaton and the evolutionary search.

use serde::{Deserialize, Serialize};

use super::Rule;

/// Largest supported neighborhood radius (rule table of `2^25` entries).
pub const MAX_RADIUS: usize = 12;

fn default_config_length() -> usize {
    11
}
fn default_radius() -> usize {
    1
}
fn default_steps() -> usize {
    20
}

/// Automaton geometry and step budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of cells in a configuration.
    #[serde(default = "default_config_length")]
    pub config_length: usize,
    /// Cells on each side of a cell that feed its update.
    #[serde(default = "default_radius")]
    pub radius: usize,
    /// Step budget per trial; the initial configuration is step 0.
    #[serde(default = "default_steps")]
    pub steps: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            config_length: default_config_length(),
            radius: default_radius(),
            steps: default_steps(),
        }
    }
}

impl SimulationConfig {
    /// Rule table length implied by the radius: `2^(2r+1)`.
    #[inline]
    pub fn rule_table_len(&self) -> usize {
        Rule::table_len(self.radius)
    }

    /// Validate geometry parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.config_length == 0 {
            return Err(ConfigError::InvalidConfigLength);
        }
        if self.steps < 2 {
            return Err(ConfigError::InvalidSteps);
        }
        if self.radius > MAX_RADIUS {
            return Err(ConfigError::InvalidRadius(self.radius));
        }
        Ok(())
    }
}

fn default_num_configs() -> usize {
    2
}
fn default_generations() -> usize {
    30
}
fn default_population_size() -> usize {
    1000
}
fn default_crossover_rate() -> f64 {
    0.8
}
fn default_mutation_rate() -> f64 {
    0.1
}
fn default_mutation_genes() -> usize {
    2
}
fn default_tournament_size() -> usize {
    4
}

/// Genetic search parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Random initial configurations evaluated per candidate rule.
    #[serde(default = "default_num_configs")]
    pub num_configs: usize,
    /// Generation budget.
    #[serde(default = "default_generations")]
    pub generations: usize,
    /// Number of chromosomes in the population.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Probability of single-point crossover per parent pair.
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: f64,
    /// Probability that an offspring is mutated at all.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Gene flips applied when a mutation fires.
    #[serde(default = "default_mutation_genes")]
    pub mutation_genes: usize,
    /// Individuals sampled per tournament.
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_configs: default_num_configs(),
            generations: default_generations(),
            population_size: default_population_size(),
            crossover_rate: default_crossover_rate(),
            mutation_rate: default_mutation_rate(),
            mutation_genes: default_mutation_genes(),
            tournament_size: default_tournament_size(),
        }
    }
}

/// Top-level run configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvolutionConfig {
    /// Automaton geometry shared by every fitness trial.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Genetic search parameters.
    #[serde(default)]
    pub search: SearchConfig,
    /// Master RNG seed; `None` draws one from the OS.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl EvolutionConfig {
    /// Theoretical fitness ceiling: every cell correct in every trial.
    #[inline]
    pub fn max_fitness(&self) -> u32 {
        (self.simulation.config_length * self.search.num_configs) as u32
    }

    /// Validate the full configuration before a search starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        if self.search.num_configs == 0 {
            return Err(ConfigError::InvalidNumConfigs);
        }
        if self.search.generations == 0 {
            return Err(ConfigError::InvalidGenerations);
        }
        if self.search.population_size < 3 {
            return Err(ConfigError::InvalidPopulationSize(
                self.search.population_size,
            ));
        }
        if self.search.tournament_size == 0 {
            return Err(ConfigError::InvalidTournamentSize);
        }
        if !(0.0..=1.0).contains(&self.search.crossover_rate) {
            return Err(ConfigError::InvalidCrossoverRate(self.search.crossover_rate));
        }
        if !(0.0..=1.0).contains(&self.search.mutation_rate) {
            return Err(ConfigError::InvalidMutationRate(self.search.mutation_rate));
        }
        if self.search.mutation_genes == 0 {
            return Err(ConfigError::InvalidMutationGenes);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration length must be non-zero")]
    InvalidConfigLength,
    #[error("Step budget must be at least 2")]
    InvalidSteps,
    #[error("Neighborhood radius {0} exceeds the supported maximum {MAX_RADIUS}")]
    InvalidRadius(usize),
    #[error("Trial count must be non-zero")]
    InvalidNumConfigs,
    #[error("Generation budget must be non-zero")]
    InvalidGenerations,
    #[error("Population size {0} is too small; two elite slots plus offspring require at least 3")]
    InvalidPopulationSize(usize),
    #[error("Tournament size must be non-zero")]
    InvalidTournamentSize,
    #[error("Crossover rate {0} outside [0, 1]")]
    InvalidCrossoverRate(f64),
    #[error("Mutation rate {0} outside [0, 1]")]
    InvalidMutationRate(f64),
    #[error("Mutation must flip at least one gene")]
    InvalidMutationGenes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        EvolutionConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rule_table_len_tracks_radius() {
        let mut config = SimulationConfig::default();
        for radius in 0..=4 {
            config.radius = radius;
            assert_eq!(config.rule_table_len(), 1 << (2 * radius + 1));
        }
    }

    #[test]
    fn test_max_fitness() {
        let mut config = EvolutionConfig::default();
        config.simulation.config_length = 9;
        config.search.num_configs = 50;
        assert_eq!(config.max_fitness(), 450);
    }

    #[test]
    fn test_rejects_zero_length() {
        let mut config = EvolutionConfig::default();
        config.simulation.config_length = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfigLength)
        ));
    }

    #[test]
    fn test_rejects_tiny_population() {
        let mut config = EvolutionConfig::default();
        config.search.population_size = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPopulationSize(2))
        ));
    }

    #[test]
    fn test_rejects_zero_tournament() {
        let mut config = EvolutionConfig::default();
        config.search.tournament_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTournamentSize)
        ));
    }

    #[test]
    fn test_rejects_out_of_range_rates() {
        let mut config = EvolutionConfig::default();
        config.search.crossover_rate = 1.5;
        assert!(config.validate().is_err());

        let mut config = EvolutionConfig::default();
        config.search.mutation_rate = -0.1;
        assert!(config.validate().is_err());
    }
}
