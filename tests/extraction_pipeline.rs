/// Integration tests for the batch extraction pipeline
///
/// These tests verify:
/// 1. A configuration file loads and validates against real temp paths
/// 2. Full pipeline: .out file → extract → evaluate → results table on disk
/// 3. The extremum contract holds end to end (ranked peaks, minima,
///    order statistics, not-available sentinels)
/// 4. Failures surface as per-row outcomes without aborting the batch
///
/// Everything runs against synthetic output files written to a temp
/// directory; no external data required.

use stormstat::config::{load_config, OutputFormat};
use stormstat::ingest::fixtures::{synthetic_out, FixtureSpec};
use stormstat::model::Outcome;
use stormstat::report;
use stormstat::runner::Runner;

use std::fs;
use std::path::{Path, PathBuf};

/// Writes a two-node fixture and an entity list into `dir`, returning the
/// paths. Node Hadati_13 carries the reference series [5, 9, 3, 7, 1]
/// whose strict local maxima are 9 and 7.
fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let spec = FixtureSpec {
        node_inflow: vec![
            ("Hadati_13".to_string(), vec![5.0, 9.0, 3.0, 7.0, 1.0]),
            ("Outfall_1".to_string(), vec![4.0, 2.0, 8.0]),
        ],
        ..FixtureSpec::default()
    };

    let out_path = dir.join("sample1950.out");
    fs::write(&out_path, synthetic_out(&spec)).expect("write fixture out file");

    let list_path = dir.join("nodes.csv");
    fs::write(&list_path, "node\nHadati_13\nOutfall_1\n").expect("write entity list");

    (out_path, list_path)
}

fn config_text(out_path: &Path, list_path: &Path, results_path: &Path) -> String {
    format!(
        r#"
output = "{results}"

[[job]]
file = "{out}"
element_type = "node"
metric = "total_inflow"
entity_list = "{list}"

[[job.request]]
kind = "kth-max-peak"
k = 1

[[job.request]]
kind = "kth-max-peak"
k = 2

[[job.request]]
kind = "kth-max-peak"
k = 3

[[job.request]]
kind = "minimum"

[[job.request]]
kind = "kth-min-sample"
k = 2
"#,
        results = results_path.display(),
        out = out_path.display(),
        list = list_path.display(),
    )
}

#[test]
fn test_full_pipeline_config_to_results_csv() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let (out_path, list_path) = write_inputs(dir.path());
    let results_path = dir.path().join("results.csv");

    let config_path = dir.path().join("extraction.toml");
    fs::write(
        &config_path,
        config_text(&out_path, &list_path, &results_path),
    )
    .expect("write config");

    let config = load_config(&config_path).expect("config should load");
    let runner = Runner::new(config);
    let rows = runner.run();

    // 2 entities × 5 requests
    assert_eq!(rows.len(), 10);

    let outcome_for = |entity: &str, metric: &str| -> &Outcome {
        &rows
            .iter()
            .find(|r| r.entity == entity && r.metric == metric)
            .unwrap_or_else(|| panic!("no row for {} / {}", entity, metric))
            .outcome
    };

    // Hadati_13: series [5, 9, 3, 7, 1], peaks [9, 7].
    assert_eq!(
        outcome_for("Hadati_13", "total_inflow max peak 1"),
        &Outcome::Value(9.0)
    );
    assert_eq!(
        outcome_for("Hadati_13", "total_inflow max peak 2"),
        &Outcome::Value(7.0)
    );
    assert_eq!(
        outcome_for("Hadati_13", "total_inflow max peak 3"),
        &Outcome::NotAvailable
    );
    assert_eq!(
        outcome_for("Hadati_13", "total_inflow minimum"),
        &Outcome::Value(1.0)
    );

    // Outfall_1: series [4, 2, 8]; sorted [2, 4, 8]; no strict peaks.
    assert_eq!(
        outcome_for("Outfall_1", "total_inflow max peak 1"),
        &Outcome::NotAvailable
    );
    assert_eq!(
        outcome_for("Outfall_1", "total_inflow minimum"),
        &Outcome::Value(2.0)
    );
    assert_eq!(
        outcome_for("Outfall_1", "total_inflow min sample 2"),
        &Outcome::Value(4.0)
    );

    // Write and re-read the delimited table.
    let config = runner.config();
    report::write_results(&results_path, &rows, config.format, config.delimiter)
        .expect("results should write");

    let mut reader = csv::Reader::from_path(&results_path).expect("read results back");
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 10);

    let peak1 = records
        .iter()
        .find(|r| &r[0] == "Hadati_13" && &r[2] == "total_inflow max peak 1")
        .expect("peak 1 row present");
    assert_eq!(&peak1[3], "9");

    let peak3 = records
        .iter()
        .find(|r| &r[0] == "Hadati_13" && &r[2] == "total_inflow max peak 3")
        .expect("peak 3 row present");
    assert_eq!(&peak3[3], "n/a");
}

#[test]
fn test_pipeline_is_idempotent() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let (out_path, list_path) = write_inputs(dir.path());
    let results_path = dir.path().join("results.csv");

    let config_path = dir.path().join("extraction.toml");
    fs::write(
        &config_path,
        config_text(&out_path, &list_path, &results_path),
    )
    .expect("write config");

    let config = load_config(&config_path).expect("config should load");
    let runner = Runner::new(config);

    let first = runner.run();
    let second = runner.run();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.entity, b.entity);
        assert_eq!(a.metric, b.metric);
        assert_eq!(a.outcome, b.outcome, "outcome differed for {}", a.metric);
    }
}

#[test]
fn test_missing_file_produces_error_rows_and_batch_continues() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let (out_path, _) = write_inputs(dir.path());
    let results_path = dir.path().join("results.csv");

    let config_path = dir.path().join("extraction.toml");
    fs::write(
        &config_path,
        format!(
            r#"
output = "{results}"

[[job]]
file = "{missing}"
element_type = "node"
metric = "total_inflow"
entities = ["Hadati_13"]

[[job.request]]
kind = "maximum"

[[job]]
file = "{out}"
element_type = "node"
metric = "total_inflow"
entities = ["Hadati_13"]

[[job.request]]
kind = "maximum"
"#,
            results = results_path.display(),
            missing = dir.path().join("gone.out").display(),
            out = out_path.display(),
        ),
    )
    .expect("write config");

    let config = load_config(&config_path).expect("config should load");
    let rows = Runner::new(config).run();

    assert_eq!(rows.len(), 2);
    assert!(
        matches!(rows[0].outcome, Outcome::Error(_)),
        "first job should error: {:?}",
        rows[0].outcome
    );
    // The second job still ran to completion.
    assert_eq!(rows[1].outcome, Outcome::Value(9.0));
}

#[test]
fn test_json_results_format() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let (out_path, list_path) = write_inputs(dir.path());
    let results_path = dir.path().join("results.json");

    let config_path = dir.path().join("extraction.toml");
    let mut text = config_text(&out_path, &list_path, &results_path);
    text.insert_str(text.find("[[job]]").unwrap(), "format = \"json\"\n\n");
    fs::write(&config_path, text).expect("write config");

    let config = load_config(&config_path).expect("config should load");
    assert_eq!(config.format, OutputFormat::Json);

    let runner = Runner::new(config);
    let rows = runner.run();
    let config = runner.config();
    report::write_results(&results_path, &rows, config.format, config.delimiter)
        .expect("results should write");

    let text = fs::read_to_string(&results_path).expect("read json back");
    let parsed: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    let array = parsed.as_array().expect("top-level array");
    assert_eq!(array.len(), 10);

    let peak3 = array
        .iter()
        .find(|v| {
            v["entity"] == "Hadati_13" && v["metric"] == "total_inflow max peak 3"
        })
        .expect("peak 3 entry present");
    assert_eq!(peak3["outcome"], serde_json::Value::Null);
}
