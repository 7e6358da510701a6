//! Model Output File Inspector
//!
//! Dumps the structure of a binary model output file: element counts and
//! names, available reporting variables per class, reporting window and
//! step. Useful for writing an extraction.toml against an unfamiliar file
//! without opening the model itself.
//!
//! Usage:
//!   cargo run --bin inspect_out -- path/to/model.out

use std::env;
use std::path::Path;

use stormstat::ingest::swmm_out::OutFile;
use stormstat::model::ElementKind;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} MODEL.out", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    let out = match OutFile::open(path) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    println!("📄 {}", path.display());
    println!("=====================================\n");
    println!("Engine version:  {}", out.version);
    println!(
        "Flow units:      {}",
        out.flow_units().map_or("unknown", |u| u.as_str())
    );
    println!("Report start:    {}", out.start_date());
    println!("Report step:     {} s", out.report_step_seconds());
    println!("Periods:         {}", out.n_periods());

    for kind in [
        ElementKind::Subcatchment,
        ElementKind::Node,
        ElementKind::Link,
    ] {
        let names = out.entity_names(kind);
        println!("\n{}s ({}):", kind, names.len());
        for name in names {
            println!("   {}", name);
        }
        println!("   metrics: {}", out.available_metrics(kind).join(", "));
    }

    println!("\nsystem metrics: {}", out.available_metrics(ElementKind::System).join(", "));

    if !out.pollutant_names().is_empty() {
        println!("\npollutants: {}", out.pollutant_names().join(", "));
    }
}
