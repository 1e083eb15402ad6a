//! Transition rule representation and its JSON export form.

use serde::{Deserialize, Serialize};

use super::SimulationConfig;

/// A 1D binary CA transition rule: one output bit per neighborhood pattern.
///
/// For neighborhood radius `r` the table has `2^(2r+1)` entries. Entry `i`
/// is the next state of a cell whose neighborhood, scanned left to right,
/// encodes `i` with the leftmost offset as the least-significant bit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rule {
    bits: Vec<u8>,
}

impl Rule {
    /// Wrap a bit table.
    ///
    /// # Panics
    /// Panics if any entry is not 0 or 1.
    pub fn new(bits: Vec<u8>) -> Self {
        assert!(
            bits.iter().all(|&b| b <= 1),
            "rule table entries must be 0 or 1"
        );
        Self { bits }
    }

    /// Table length for a neighborhood radius.
    #[inline]
    pub fn table_len(radius: usize) -> usize {
        1 << (2 * radius + 1)
    }

    /// Number of entries in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Output bit for a neighborhood pattern index.
    #[inline]
    pub fn output(&self, index: usize) -> u8 {
        self.bits[index]
    }

    /// The raw bit table.
    #[inline]
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Invert the bit at `index` (0 ↔ 1).
    #[inline]
    pub fn flip(&mut self, index: usize) {
        self.bits[index] = 1 - self.bits[index];
    }
}

/// JSON form of a rule, together with the automaton geometry it was
/// evolved for, as consumed by external tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleExport {
    /// Neighborhood radius.
    pub neighborhood: usize,
    /// Automaton width the rule was evaluated on.
    pub cellular_length: usize,
    /// Step budget used during evaluation.
    pub steps: usize,
    /// The rule table bits.
    pub data: Vec<u8>,
}

impl RuleExport {
    /// Pair a rule with the geometry it was evolved on.
    pub fn new(rule: &Rule, config: &SimulationConfig) -> Self {
        Self {
            neighborhood: config.radius,
            cellular_length: config.config_length,
            steps: config.steps,
            data: rule.bits().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_len() {
        assert_eq!(Rule::table_len(0), 2);
        assert_eq!(Rule::table_len(1), 8);
        assert_eq!(Rule::table_len(2), 32);
        assert_eq!(Rule::table_len(3), 128);
    }

    #[test]
    fn test_flip() {
        let mut rule = Rule::new(vec![0, 1, 0, 1]);
        rule.flip(0);
        rule.flip(1);
        assert_eq!(rule.bits(), &[1, 0, 0, 1]);
        rule.flip(0);
        assert_eq!(rule.bits(), &[0, 0, 0, 1]);
    }

    #[test]
    #[should_panic(expected = "0 or 1")]
    fn test_rejects_non_binary() {
        Rule::new(vec![0, 2]);
    }

    #[test]
    fn test_export_json_shape() {
        let config = SimulationConfig {
            config_length: 9,
            radius: 1,
            steps: 20,
        };
        let rule = Rule::new(vec![1; 8]);
        let export = RuleExport::new(&rule, &config);
        let json = serde_json::to_string(&export).unwrap();
        assert_eq!(
            json,
            "{\"neighborhood\":1,\"cellular_length\":9,\"steps\":20,\
             \"data\":[1,1,1,1,1,1,1,1]}"
        );
    }
}
