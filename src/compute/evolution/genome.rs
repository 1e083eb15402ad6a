//! Random generation and variation operators for rule chromosomes.
//!
//! Provides uniform rule/configuration sampling, single-point crossover,
//! and fixed-burst gene-flip mutation.

use rand::prelude::*;

use crate::schema::Rule;

/// Random number generator wrapper for all stochastic search operations.
///
/// Every random draw the search makes goes through one of these, so a run
/// is fully reproducible from a single seed, and worker streams can be
/// partitioned with [`GenomeRng::next_seed`].
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with a random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniformly random rule table of the given length.
    pub fn random_rule(&mut self, table_len: usize) -> Rule {
        Rule::new((0..table_len).map(|_| self.rng.gen_range(0..=1)).collect())
    }

    /// Uniformly random initial configuration of `length` cells.
    pub fn random_configuration(&mut self, length: usize) -> Vec<u8> {
        (0..length).map(|_| self.rng.gen_range(0..=1)).collect()
    }

    /// Single-point crossover at a uniform cut in `[1, len - 1]`.
    ///
    /// Returns `(parent1[..cut] + parent2[cut..], parent2[..cut] + parent1[cut..])`.
    ///
    /// # Panics
    /// Panics if the parents have different table lengths.
    pub fn crossover(&mut self, parent1: &Rule, parent2: &Rule) -> (Rule, Rule) {
        assert_eq!(
            parent1.len(),
            parent2.len(),
            "crossover parents must have equal table lengths"
        );
        let cut = self.rng.gen_range(1..parent1.len());

        let mut first = Vec::with_capacity(parent1.len());
        first.extend_from_slice(&parent1.bits()[..cut]);
        first.extend_from_slice(&parent2.bits()[cut..]);

        let mut second = Vec::with_capacity(parent2.len());
        second.extend_from_slice(&parent2.bits()[..cut]);
        second.extend_from_slice(&parent1.bits()[cut..]);

        (Rule::new(first), Rule::new(second))
    }

    /// With probability `rate`, flip `genes` uniformly random positions
    /// (repeats allowed). Returns whether the mutation fired.
    pub fn mutate(&mut self, rule: &mut Rule, rate: f64, genes: usize) -> bool {
        if !self.rng.gen_bool(rate) {
            return false;
        }
        for _ in 0..genes {
            let gene = self.rng.gen_range(0..rule.len());
            rule.flip(gene);
        }
        true
    }

    /// Bernoulli draw with probability `probability`.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability)
    }

    /// Uniform index in `[0, bound)`.
    pub fn index(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }

    /// Next u64 for seeding partitioned worker RNG streams.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }
}
