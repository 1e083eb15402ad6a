//! Fitness evaluation for candidate rules on the majority task.
//!
//! A rule is scored over repeated randomized trials: each trial draws a
//! fresh configuration, runs the automaton, and pays out only when the
//! trace settles into a fixed point that unanimously encodes the
//! configuration's majority bit.

use crate::compute::CaSimulator;
use crate::schema::{Rule, SimulationConfig};

use super::genome::GenomeRng;

/// Counts of expected majority labels across trials.
///
/// An explicit accumulator: the evaluator returns one per call and the
/// engine merges them, so there is no ambient global tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MajorityTally {
    /// Trials whose configuration was majority-1 ("black").
    pub ones: u64,
    /// Trials whose configuration was majority-0 ("white").
    pub zeros: u64,
}

impl MajorityTally {
    /// Record one expected label.
    pub fn record(&mut self, expected: u8) {
        if expected == 1 {
            self.ones += 1;
        } else {
            self.zeros += 1;
        }
    }

    /// Fold another tally into this one.
    pub fn merge(&mut self, other: &MajorityTally) {
        self.ones += other.ones;
        self.zeros += other.zeros;
    }
}

/// Result of evaluating one rule.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Sum of per-trial contributions, in `[0, config_length * num_configs]`.
    pub fitness: u32,
    /// Mean of the per-trial steps at which the match count peaked
    /// (diagnostic only, not fed back into selection).
    pub best_step: usize,
    /// Majority-label distribution of the sampled trials.
    pub tally: MajorityTally,
}

/// Scores candidate rules over batches of randomized trials.
pub struct FitnessEvaluator {
    config: SimulationConfig,
    num_configs: usize,
}

impl FitnessEvaluator {
    /// Create an evaluator running `num_configs` trials per rule.
    ///
    /// # Panics
    /// Panics if `num_configs` is zero.
    pub fn new(config: SimulationConfig, num_configs: usize) -> Self {
        assert!(num_configs > 0, "evaluator requires at least one trial");
        Self {
            config,
            num_configs,
        }
    }

    /// Evaluate `rule` over `num_configs` independent random trials.
    ///
    /// Each trial contributes its peak match count iff the trace reached a
    /// fixed point (two consecutive identical rows) and that peak covered
    /// every cell; otherwise it contributes 0. An oscillating trace never
    /// pays out no matter how close its match counts get.
    pub fn evaluate(&self, sim: &mut CaSimulator, rule: &Rule, rng: &mut GenomeRng) -> Evaluation {
        let width = self.config.config_length;
        let mut fitness = 0u32;
        let mut step_sum = 0usize;
        let mut tally = MajorityTally::default();

        for _ in 0..self.num_configs {
            let configuration = rng.random_configuration(width);
            let expected = majority_value(&configuration);
            tally.record(expected);

            sim.set_init(rule, &configuration);
            sim.run_sim(self.config.steps);

            let mut peak = 0usize;
            let mut peak_step = 0usize;
            let mut stable = false;
            let mut previous: Option<&[u8]> = None;

            for step in 1..self.config.steps {
                let row = sim.state(step);
                // Stability first: the repeated row is not counted.
                if previous.is_some_and(|prev| prev == row) {
                    stable = true;
                    break;
                }
                let matches = row.iter().filter(|&&cell| cell == expected).count();
                if matches > peak {
                    peak = matches;
                    peak_step = step;
                }
                previous = Some(row);
            }

            if stable && peak == width {
                fitness += peak as u32;
            }
            step_sum += peak_step;
        }

        Evaluation {
            fitness,
            best_step: step_sum / self.num_configs,
            tally,
        }
    }
}

/// Majority bit of a configuration; ties resolve to 0.
pub fn majority_value(configuration: &[u8]) -> u8 {
    let ones = configuration.iter().filter(|&&cell| cell == 1).count();
    if ones * 2 > configuration.len() { 1 } else { 0 }
}
