//! Run summaries and the append-only statistics file.
//!
//! Every run appends one two-line record: a key/value summary followed by
//! the best rule in its JSON export form. The file is never truncated, so
//! it accumulates across experiment batches.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use crate::compute::evolution::EvolutionResult;
use crate::schema::{EvolutionConfig, RuleExport};

/// Fraction of the fitness ceiling reached, as a percentage.
pub fn success_percentage(fitness: u32, max_fitness: u32) -> f64 {
    if max_fitness == 0 {
        return 0.0;
    }
    f64::from(fitness) / f64::from(max_fitness) * 100.0
}

/// Append one run record to the statistics file at `path`.
pub fn append_statistics(
    path: &Path,
    config: &EvolutionConfig,
    result: &EvolutionResult,
) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    let best = &result.best;
    writeln!(
        file,
        "radius={} num_configs={} config_length={} steps={} generations={} population={} \
         best_fitness={}/{} success={:.2}% best_step={} found_in_generation={}",
        config.simulation.radius,
        config.search.num_configs,
        config.simulation.config_length,
        config.simulation.steps,
        config.search.generations,
        config.search.population_size,
        best.chromosome.fitness,
        result.max_fitness,
        success_percentage(best.chromosome.fitness, result.max_fitness),
        best.chromosome.best_step,
        best.generation,
    )?;

    let export = RuleExport::new(&best.chromosome.rule, &config.simulation);
    let json = serde_json::to_string(&export).map_err(io::Error::other)?;
    writeln!(file, "{json}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::EvolutionEngine;
    use crate::schema::{SearchConfig, SimulationConfig};

    fn quick_result() -> (EvolutionConfig, EvolutionResult) {
        let config = EvolutionConfig {
            simulation: SimulationConfig {
                config_length: 9,
                radius: 1,
                steps: 10,
            },
            search: SearchConfig {
                num_configs: 5,
                generations: 2,
                population_size: 8,
                ..SearchConfig::default()
            },
            random_seed: Some(4),
        };
        let result = EvolutionEngine::new(config.clone()).unwrap().run();
        (config, result)
    }

    #[test]
    fn test_success_percentage() {
        assert_eq!(success_percentage(45, 450), 10.0);
        assert_eq!(success_percentage(450, 450), 100.0);
        assert_eq!(success_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_record_appends_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statistics.txt");
        let (config, result) = quick_result();

        append_statistics(&path, &config, &result).unwrap();
        append_statistics(&path, &config, &result).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        // Appending, not truncating: two records, two lines each.
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("radius=1"));
        assert!(lines[0].contains("config_length=9"));
        assert!(lines[0].contains(&format!("/{}", result.max_fitness)));

        let export: RuleExport = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(export.neighborhood, 1);
        assert_eq!(export.cellular_length, 9);
        assert_eq!(export.data, result.best.chromosome.rule.bits());
    }
}
