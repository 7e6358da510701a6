/// stormstat: stormwater model output extraction and summary statistics.
///
/// # Module structure
///
/// ```
/// stormstat
/// ├── model       — shared data types (Series, MetricRequest, Outcome, …)
/// ├── catalog     — reporting-variable registry per element class
/// ├── config      — extraction job configuration loader (extraction.toml)
/// ├── ingest
/// │   ├── swmm_out    — binary model-output (.out) file reader
/// │   ├── entity_list — entity-name lists from .csv / Excel worksheets
/// │   └── fixtures (test only) — synthetic output-file byte images
/// ├── analysis
/// │   ├── extrema   — peak detection and order statistics
/// │   └── alignment — anchor-timestamp overlay alignment
/// ├── report      — delimited / JSON results table writers
/// └── runner      — background-worker batch driver
/// ```

/// Public modules
pub mod analysis;
pub mod catalog;
pub mod config;
pub mod ingest;
pub mod model;
pub mod report;
pub mod runner;
