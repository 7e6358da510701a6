//! Stormwater Model Output Extraction Tool
//!
//! A batch tool that:
//! 1. Loads an extraction configuration (files, entities, metrics, requests)
//! 2. Reads binary model output files and extracts the requested series
//! 3. Computes summary statistics (peaks, minima, order statistics)
//! 4. Writes the results table to a delimited or JSON file
//!
//! Plotting and interactive inspection are handled by external tools that
//! read the exported results table.
//!
//! Usage:
//!   cargo run --release -- extraction.toml
//!   cargo run --release -- extraction.toml --output other.csv
//!
//! Exit status is nonzero when the configuration cannot be loaded or the
//! results table cannot be written; per-row extraction failures are
//! reported in the table itself and do not abort the run.

use std::env;
use std::path::Path;

use stormstat::config;
use stormstat::model::Outcome;
use stormstat::report;
use stormstat::runner::Runner;

fn main() {
    println!("🌧 Stormwater Model Output Extraction");
    println!("=====================================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<String> = None;
    let mut output_override: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--output" => {
                if i + 1 < args.len() {
                    output_override = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --output requires a file path");
                    std::process::exit(1);
                }
            }
            arg if arg.starts_with("--") => {
                eprintln!("Unknown argument: {}", arg);
                eprintln!("Usage: {} CONFIG.toml [--output PATH]", args[0]);
                std::process::exit(1);
            }
            arg => {
                if config_path.is_some() {
                    eprintln!("Error: multiple configuration files given");
                    std::process::exit(1);
                }
                config_path = Some(arg.to_string());
                i += 1;
            }
        }
    }

    let Some(config_path) = config_path else {
        eprintln!("Usage: {} CONFIG.toml [--output PATH]", args[0]);
        std::process::exit(1);
    };

    // Load and validate the job configuration
    println!("📋 Loading {}...", config_path);
    let mut config = match config::load_config(Path::new(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Configuration error: {}\n", e);
            std::process::exit(1);
        }
    };
    if let Some(output) = output_override {
        config.output = output;
    }
    println!("✓ {} job(s) configured\n", config.jobs.len());

    // Run the batch on the background worker
    println!("📊 Extracting...");
    let runner = Runner::new(config);
    let rows = runner.run();

    let not_available = rows
        .iter()
        .filter(|r| r.outcome == Outcome::NotAvailable)
        .count();
    let errors = rows
        .iter()
        .filter(|r| matches!(r.outcome, Outcome::Error(_)))
        .count();
    println!(
        "\n✓ Extraction complete: {} rows ({} not available, {} errors)",
        rows.len(),
        not_available,
        errors
    );

    // Write the results table
    let config = runner.config();
    let output_path = Path::new(&config.output);
    match report::write_results(output_path, &rows, config.format, config.delimiter) {
        Ok(()) => println!("✓ Results written to {}", config.output),
        Err(e) => {
            eprintln!("\n❌ Failed to write {}: {}\n", config.output, e);
            std::process::exit(1);
        }
    }
}
