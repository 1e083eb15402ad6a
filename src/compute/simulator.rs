//! Bounded-horizon simulator for a 1D binary cellular automaton.
//!
//! The trace arena is owned by the simulator and reused across
//! `set_init`/`run_sim` cycles, so repeated trials cost no allocation.

use crate::schema::{Rule, SimulationConfig};

/// Deterministic 1D binary CA simulator with a fixed zero boundary.
///
/// Cells outside `[0, config_length)` always read as 0: the automaton is
/// zero-padded, not toroidal, so edge cells see a partial neighborhood.
///
/// The full step history is kept in a flat trace buffer indexed
/// `[step * width + cell]`; row 0 is the initial configuration and row `t`
/// is computed from row `t - 1` by the installed rule.
pub struct CaSimulator {
    width: usize,
    radius: usize,
    steps_max: usize,
    /// Active rule table, overwritten by each `set_init`.
    rule: Vec<u8>,
    /// Trace arena of `steps_max * width` cells.
    trace: Vec<u8>,
}

impl CaSimulator {
    /// Create a simulator for the given geometry.
    ///
    /// The trace arena holds `steps * config_length` cells for the lifetime
    /// of the simulator.
    ///
    /// # Panics
    /// Panics if the configuration has not been validated (zero width or a
    /// step budget below 2).
    pub fn new(config: &SimulationConfig) -> Self {
        assert!(
            config.config_length > 0 && config.steps >= 2,
            "simulator requires a validated configuration"
        );
        Self {
            width: config.config_length,
            radius: config.radius,
            steps_max: config.steps,
            rule: vec![0; config.rule_table_len()],
            trace: vec![0; config.steps * config.config_length],
        }
    }

    /// Automaton width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Step capacity of the trace arena.
    #[inline]
    pub fn steps_max(&self) -> usize {
        self.steps_max
    }

    /// Install the active rule and the step-0 configuration.
    ///
    /// # Panics
    /// Panics if the rule table or the configuration length does not match
    /// the simulator geometry.
    pub fn set_init(&mut self, rule: &Rule, configuration: &[u8]) {
        assert_eq!(
            rule.len(),
            self.rule.len(),
            "rule table length does not match radius {}",
            self.radius
        );
        assert_eq!(
            configuration.len(),
            self.width,
            "configuration length does not match automaton width"
        );
        self.rule.copy_from_slice(rule.bits());
        self.trace[..self.width].copy_from_slice(configuration);
    }

    /// Compute rows `1..steps` of the trace from row 0.
    ///
    /// Purely deterministic: the same rule, configuration, and step count
    /// always produce a bit-identical trace.
    ///
    /// # Panics
    /// Panics if `steps` exceeds the arena capacity.
    pub fn run_sim(&mut self, steps: usize) {
        assert!(
            steps <= self.steps_max,
            "step budget exceeded: {steps} > {}",
            self.steps_max
        );
        for t in 1..steps {
            let (done, rest) = self.trace.split_at_mut(t * self.width);
            let src = &done[(t - 1) * self.width..];
            let dst = &mut rest[..self.width];
            for cell in 0..self.width {
                dst[cell] = self.rule[neighborhood_index(src, cell, self.radius)];
            }
        }
    }

    /// Row `step` of the trace.
    ///
    /// Row 0 is only ever written through `set_init`; computed rows start
    /// at 1. The returned view is invalidated by the next `run_sim` or
    /// `set_init`, which the borrow checker enforces.
    ///
    /// # Panics
    /// Panics unless `1 <= step < steps_max`.
    pub fn state(&self, step: usize) -> &[u8] {
        assert!(
            step >= 1 && step < self.steps_max,
            "step {step} outside trace range [1, {})",
            self.steps_max
        );
        &self.trace[step * self.width..(step + 1) * self.width]
    }
}

/// Neighborhood pattern index for `cell`: offsets `-r..=r` scanned left to
/// right, the leftmost offset contributing the least-significant bit.
/// Out-of-range positions read as 0.
#[inline]
fn neighborhood_index(row: &[u8], cell: usize, radius: usize) -> usize {
    let mut index = 0usize;
    let first = cell as isize - radius as isize;
    let last = cell as isize + radius as isize;
    for (weight, pos) in (first..=last).enumerate() {
        if pos >= 0 && (pos as usize) < row.len() && row[pos as usize] == 1 {
            index |= 1usize << weight;
        }
    }
    index
}
