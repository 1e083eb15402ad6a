//! majority-ca CLI - Evolve 1D CA rules for the density classification task.

use std::path::Path;

use majority_ca::{
    compute::evolution::EvolutionEngine,
    report,
    schema::{EvolutionConfig, RuleExport},
};

const STATISTICS_FILE: &str = "statistics.txt";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return;
    }

    let mut config = EvolutionConfig::default();
    apply_flags(&mut config, &args);

    let mut engine = EvolutionEngine::new(config.clone()).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    });

    println!("CA Majority Search");
    println!("==================");
    println!(
        "Automaton: {} cells, radius {} ({} rule entries)",
        config.simulation.config_length,
        config.simulation.radius,
        config.simulation.rule_table_len()
    );
    println!(
        "Trials: {} configurations, {} steps each",
        config.search.num_configs, config.simulation.steps
    );
    println!(
        "Population: {} over {} generations",
        config.search.population_size, config.search.generations
    );
    println!();

    let result = engine.run_with_callback(|progress| {
        if progress.improved {
            println!(
                "Gen # {} fitness {}/{}",
                progress.generation, progress.best_fitness, progress.max_fitness
            );
        }
    });

    let best = &result.best;
    let pct = report::success_percentage(best.chromosome.fitness, result.max_fitness);

    println!();
    println!("Search ended");
    println!(
        "Best fitness {}/{} ({:.2}%) in step (average) {}.",
        best.chromosome.fitness, result.max_fitness, pct, best.chromosome.best_step
    );
    println!(
        "Found in generation {} of {} evaluated.",
        best.generation, result.generations
    );
    println!(
        "Statistics in training: major black: {}, major white: {}",
        result.tally.ones, result.tally.zeros
    );

    let export = RuleExport::new(&best.chromosome.rule, &config.simulation);
    match serde_json::to_string(&export) {
        Ok(json) => println!("JSON data: {json}"),
        Err(e) => eprintln!("Failed to serialize rule: {e}"),
    }
    println!("Rules: {:?}", best.chromosome.rule.bits());

    if let Err(e) = report::append_statistics(Path::new(STATISTICS_FILE), &config, &result) {
        eprintln!("Failed to append {STATISTICS_FILE}: {e}");
    }
}

/// Apply flag overrides onto the compiled-in defaults. Unknown flags and
/// missing or unparsable values are reported on stderr and skipped, so a
/// bad override falls back to its default instead of killing the run.
fn apply_flags(config: &mut EvolutionConfig, args: &[String]) {
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "-n" => {
                if let Some(v) = next_value(&mut iter, flag) {
                    config.simulation.radius = v as usize;
                }
            }
            "-c" => {
                if let Some(v) = next_value(&mut iter, flag) {
                    config.search.num_configs = v as usize;
                }
            }
            "-g" => {
                if let Some(v) = next_value(&mut iter, flag) {
                    config.search.generations = v as usize;
                }
            }
            "-p" => {
                if let Some(v) = next_value(&mut iter, flag) {
                    config.search.population_size = v as usize;
                }
            }
            "-s" => {
                if let Some(v) = next_value(&mut iter, flag) {
                    config.simulation.steps = v as usize;
                }
            }
            "-l" => {
                if let Some(v) = next_value(&mut iter, flag) {
                    config.simulation.config_length = v as usize;
                }
            }
            "--seed" => {
                if let Some(v) = next_value(&mut iter, flag) {
                    config.random_seed = Some(v);
                }
            }
            other => eprintln!("Unknown flag {other:?}, ignoring"),
        }
    }
}

/// Pull and parse the value following `flag`, reporting failures.
fn next_value(iter: &mut std::slice::Iter<'_, String>, flag: &str) -> Option<u64> {
    let Some(raw) = iter.next() else {
        eprintln!("Missing value for {flag}, keeping default");
        return None;
    };
    match raw.parse() {
        Ok(v) => Some(v),
        Err(e) => {
            eprintln!("Invalid value {raw:?} for {flag}: {e}; keeping default");
            None
        }
    }
}

fn print_usage() {
    println!("Usage: majority-ca [options]");
    println!();
    println!("Evolve a 1D cellular automaton rule that classifies the majority");
    println!("bit of a random configuration.");
    println!();
    println!("Options:");
    println!("  -n <radius>       neighborhood radius (default 1)");
    println!("  -c <num_configs>  random configurations per fitness trial (default 2)");
    println!("  -g <generations>  generation budget (default 30)");
    println!("  -p <population>   population size (default 1000)");
    println!("  -s <steps>        simulation steps per trial (default 20)");
    println!("  -l <length>       configuration length in cells (default 11)");
    println!("  --seed <u64>      pin the master RNG for a reproducible run");
}
