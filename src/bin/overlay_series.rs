//! Series Overlay Export
//!
//! Extracts the same (entity, metric) series from several model output
//! files, aligns them to a shared anchor timestamp, and writes the overlay
//! table for side-by-side hydrograph comparison. Columns are named after
//! the source files.
//!
//! Usage:
//!   cargo run --bin overlay_series -- \
//!       --node Hadati_13 --metric total_inflow \
//!       --anchor "2019-05-01 00:45" --output overlay.csv \
//!       run_a.out run_b.out

use std::env;
use std::path::Path;

use chrono::NaiveDateTime;

use stormstat::analysis::alignment::align_to_anchor;
use stormstat::ingest::swmm_out::OutFile;
use stormstat::model::{ElementKind, Series};
use stormstat::report::write_overlay_delimited;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut node: Option<String> = None;
    let mut metric = "total_inflow".to_string();
    let mut anchor: Option<String> = None;
    let mut output = "overlay.csv".to_string();
    let mut files: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--node" => {
                node = args.get(i + 1).cloned();
                i += 2;
            }
            "--metric" => {
                metric = args.get(i + 1).cloned().unwrap_or(metric);
                i += 2;
            }
            "--anchor" => {
                anchor = args.get(i + 1).cloned();
                i += 2;
            }
            "--output" => {
                output = args.get(i + 1).cloned().unwrap_or(output);
                i += 2;
            }
            arg if arg.starts_with("--") => {
                eprintln!("Unknown argument: {}", arg);
                std::process::exit(1);
            }
            arg => {
                files.push(arg.to_string());
                i += 1;
            }
        }
    }

    let (Some(node), Some(anchor_text)) = (node, anchor) else {
        eprintln!(
            "Usage: {} --node NAME [--metric NAME] --anchor \"YYYY-MM-DD HH:MM\" \
             [--output PATH] FILE.out [FILE.out ...]",
            args[0]
        );
        std::process::exit(1);
    };

    if files.len() < 2 {
        eprintln!("Error: need at least two output files to overlay");
        std::process::exit(1);
    }

    let anchor = match NaiveDateTime::parse_from_str(&anchor_text, "%Y-%m-%d %H:%M") {
        Ok(anchor) => anchor,
        Err(e) => {
            eprintln!("❌ Invalid anchor '{}': {}", anchor_text, e);
            std::process::exit(1);
        }
    };

    // Extract one series per file; a file that cannot supply the series
    // still gets an (empty) column so the overlay accounts for it.
    let mut series: Vec<(String, Series)> = Vec::new();
    for file in &files {
        let label = Path::new(file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file)
            .to_string();

        match OutFile::open(Path::new(file)) {
            Ok(out) => match out.get_series(ElementKind::Node, &node, &metric) {
                Some(s) => {
                    println!("   ✓ {} — {} samples", label, s.len());
                    series.push((label, s));
                }
                None => {
                    eprintln!("   ⚠ {} — no series for node '{}' / metric '{}'", label, node, metric);
                    series.push((label, Series::default()));
                }
            },
            Err(e) => {
                eprintln!("   ⚠ {} — {}", label, e);
                series.push((label, Series::default()));
            }
        }
    }

    let overlay = align_to_anchor(&series, anchor);
    println!(
        "\n✓ Aligned {} series at {} ({} overlay rows)",
        overlay.columns.len(),
        anchor,
        overlay.offsets.len()
    );

    if let Err(e) = write_overlay_delimited(Path::new(&output), &overlay, b',') {
        eprintln!("\n❌ Failed to write {}: {}\n", output, e);
        std::process::exit(1);
    }
    println!("✓ Overlay written to {}", output);
}
