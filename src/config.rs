/// Extraction job configuration loader - parses extraction.toml
///
/// Separates batch definitions from code: which output files to read,
/// which entities and metrics to extract, and which statistics to compute,
/// all editable without recompiling the tool.
///
/// Example:
///
/// ```toml
/// output = "results.csv"
/// delimiter = "comma"
///
/// [[job]]
/// file = "sample1950.out"
/// element_type = "node"
/// metric = "total_inflow"
/// entities = ["Hadati_13"]
///
/// [[job.request]]
/// kind = "kth-max-peak"
/// k = 1
/// ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::model::{ElementKind, MetricRequest};

// ---------------------------------------------------------------------------
// Configuration structures
// ---------------------------------------------------------------------------

/// Root configuration for one batch run.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Results table destination.
    pub output: String,

    #[serde(default)]
    pub delimiter: Delimiter,

    #[serde(default)]
    pub format: OutputFormat,

    #[serde(rename = "job")]
    pub jobs: Vec<JobConfig>,
}

/// Field delimiter for delimited output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

/// Results table format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Delimited,
    Json,
}

/// One extraction job: a source file, an element class, a metric, the
/// entities to extract, and the statistics to compute per entity.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub file: String,
    pub element_type: ElementKind,
    pub metric: String,

    /// Inline entity names. May be empty when `entity_list` is set, or for
    /// system-wide metrics, which have no named elements.
    #[serde(default)]
    pub entities: Vec<String>,

    /// Tabular file (.csv/.xlsx) of entity names, loaded at run time.
    pub entity_list: Option<String>,
    /// Column within `entity_list` holding the names; first column if unset.
    pub entity_column: Option<String>,

    #[serde(rename = "request")]
    pub requests: Vec<RequestConfig>,
}

/// One requested statistic, as written in TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    pub kind: String,
    pub k: Option<usize>,
}

impl RequestConfig {
    /// Converts the TOML form into a typed metric request, validating that
    /// ranked kinds carry k ≥ 1.
    pub fn to_request(&self) -> Result<MetricRequest, String> {
        let ranked = |k: Option<usize>| -> Result<usize, String> {
            match k {
                Some(k) if k >= 1 => Ok(k),
                Some(_) => Err(format!("request '{}' needs k >= 1", self.kind)),
                None => Err(format!("request '{}' needs a k value", self.kind)),
            }
        };

        match self.kind.as_str() {
            "kth-max-peak" => Ok(MetricRequest::KthMaxPeak(ranked(self.k)?)),
            "kth-min-sample" => Ok(MetricRequest::KthMinSample(ranked(self.k)?)),
            "minimum" => Ok(MetricRequest::Minimum),
            "maximum" => Ok(MetricRequest::Maximum),
            other => Err(format!(
                "unknown request kind '{}' (expected kth-max-peak, minimum, kth-min-sample, or maximum)",
                other
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Loads and validates an extraction configuration file.
pub fn load_config(path: &Path) -> Result<ExtractionConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

    let config: ExtractionConfig = toml::from_str(&contents)
        .map_err(|e| format!("failed to parse {}: {}", path.display(), e))?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &ExtractionConfig) -> Result<(), String> {
    if config.jobs.is_empty() {
        return Err("configuration defines no [[job]] entries".to_string());
    }

    for (i, job) in config.jobs.iter().enumerate() {
        let label = format!("job {} ({})", i + 1, job.file);

        if job.requests.is_empty() {
            return Err(format!("{}: no [[job.request]] entries", label));
        }
        for request in &job.requests {
            request.to_request().map_err(|e| format!("{}: {}", label, e))?;
        }

        // System metrics have no named elements; every other class needs
        // an entity source.
        if job.element_type != ElementKind::System
            && job.entities.is_empty()
            && job.entity_list.is_none()
        {
            return Err(format!(
                "{}: needs either an 'entities' list or an 'entity_list' file",
                label
            ));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
