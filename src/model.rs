/// Shared data types for the stormstat extraction pipeline.
///
/// Everything that crosses a module boundary lives here: the time series
/// produced by the ingest layer, the metric requests evaluated by the
/// analysis layer, and the result rows consumed by the report writer.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Element kinds
// ---------------------------------------------------------------------------

/// The four classes of model elements that carry reporting variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Subcatchment,
    Node,
    Link,
    System,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Subcatchment => "subcatchment",
            ElementKind::Node => "node",
            ElementKind::Link => "link",
            ElementKind::System => "system",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// One sample of a reporting variable at a known report time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub time: NaiveDateTime,
    pub value: f64,
}

/// An ordered sequence of samples for one (element, metric) pair.
///
/// Values may be non-monotonic and the series may be empty (an element that
/// exists in the model but reported no periods).
#[derive(Debug, Clone, Default)]
pub struct Series {
    pub points: Vec<SamplePoint>,
}

impl Series {
    pub fn new(points: Vec<SamplePoint>) -> Self {
        Series { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Raw sample values in report order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

// ---------------------------------------------------------------------------
// Metric requests
// ---------------------------------------------------------------------------

/// A summary statistic requested over one extracted series.
///
/// `k` is 1-indexed everywhere: `KthMaxPeak(1)` is the highest local peak,
/// `KthMinSample(1)` the smallest raw sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricRequest {
    /// k-th largest strict local maximum of the series.
    KthMaxPeak(usize),
    /// Smallest raw sample value.
    Minimum,
    /// k-th smallest raw sample value.
    KthMinSample(usize),
    /// Largest raw sample value.
    Maximum,
}

impl MetricRequest {
    /// Short label used in the results table, e.g. `"max peak 2"`.
    pub fn label(&self) -> String {
        match self {
            MetricRequest::KthMaxPeak(k) => format!("max peak {}", k),
            MetricRequest::Minimum => "minimum".to_string(),
            MetricRequest::KthMinSample(k) => format!("min sample {}", k),
            MetricRequest::Maximum => "maximum".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes and result rows
// ---------------------------------------------------------------------------

/// The outcome of evaluating one metric request for one entity.
///
/// A request that cannot be satisfied (empty series, fewer than k peaks,
/// k beyond the series length, entity absent from the output file) yields
/// `NotAvailable` rather than an error. `Error` carries failures from
/// outside the extractor itself, such as an unreadable output file, so the
/// batch can skip the affected rows and continue.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(f64),
    NotAvailable,
    Error(String),
}

impl Outcome {
    /// Cell text for delimited output.
    pub fn to_field(&self) -> String {
        match self {
            Outcome::Value(v) => format!("{}", v),
            Outcome::NotAvailable => "n/a".to_string(),
            Outcome::Error(msg) => format!("error: {}", msg),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_field())
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Value(v) => serializer.serialize_f64(*v),
            Outcome::NotAvailable => serializer.serialize_none(),
            Outcome::Error(msg) => serializer.serialize_str(&format!("error: {}", msg)),
        }
    }
}

/// One row of the exported results table.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub entity: String,
    pub source_file: String,
    pub metric: String,
    pub outcome: Outcome,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
