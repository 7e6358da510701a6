/// Binary model-output (.out) file reader.
///
/// Parses the SWMM 5 interface-file layout: little-endian records, 4 bytes
/// each except ID strings and the 8-byte period dates.
///
/// File structure:
/// - Opening records: magic number, engine version, flow-unit code, element
///   counts (subcatchments, nodes, links, pollutants).
/// - ID section: length-prefixed names per element class, then pollutant
///   concentration-unit codes.
/// - Property section: per class, a property count, property codes, and one
///   REAL4 value per property per element.
/// - Reporting variables: per class, a variable count followed by variable
///   codes (base variables first, pollutants appended).
/// - Start date (REAL8, days since 1899-12-30) and report step (seconds).
/// - Computed results: per reporting period, a REAL8 date followed by REAL4
///   values for every subcatchment, node, link and system variable.
/// - Closing records: ID/property/results offsets, period count, error
///   status, magic number again.
///
/// Both magic numbers and the error status are validated on open; a file
/// written by a failed model run is rejected rather than half-read.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::Path;

use crate::catalog::{self, FlowUnits};
use crate::model::{ElementKind, SamplePoint, Series};

/// Magic number opening and closing every valid output file.
pub const MAGIC: i32 = 516_114_522;

const CLOSING_SIZE: usize = 6 * 4;
const OPENING_SIZE: usize = 7 * 4;

// ---------------------------------------------------------------------------
// Byte cursor
// ---------------------------------------------------------------------------

/// Bounds-checked little-endian reader over the file image.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn at(data: &'a [u8], pos: usize) -> Self {
        Cursor { data, pos }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], String> {
        let end = self.pos.checked_add(n).ok_or("offset overflow")?;
        if end > self.data.len() {
            return Err(format!(
                "unexpected end of file at byte {} (wanted {} more)",
                self.pos, n
            ));
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_i32(&mut self) -> Result<i32, String> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_count(&mut self, what: &str) -> Result<usize, String> {
        let n = self.read_i32()?;
        usize::try_from(n).map_err(|_| format!("negative {} count ({})", what, n))
    }

    fn read_f32(&mut self) -> Result<f32, String> {
        let b = self.take(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_f64(&mut self) -> Result<f64, String> {
        let b = self.take(8)?;
        Ok(f64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Length-prefixed ID string.
    fn read_name(&mut self) -> Result<String, String> {
        let len = self.read_count("name length")?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| "non-UTF8 element name".to_string())
    }

    fn skip(&mut self, n: usize) -> Result<(), String> {
        self.take(n).map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// Output file
// ---------------------------------------------------------------------------

/// A fully indexed model output file, held in memory.
#[derive(Debug)]
pub struct OutFile {
    data: Vec<u8>,

    pub version: i32,
    flow_units_code: i32,

    subcatchments: Vec<String>,
    nodes: Vec<String>,
    links: Vec<String>,
    pollutants: Vec<String>,

    n_subcatch_vars: usize,
    n_node_vars: usize,
    n_link_vars: usize,
    n_sys_vars: usize,

    start_date: NaiveDateTime,
    report_step_seconds: i32,

    results_pos: usize,
    period_size: usize,
    n_periods: usize,
}

impl OutFile {
    /// Reads and indexes an output file from disk.
    pub fn open(path: &Path) -> Result<OutFile, String> {
        let data = fs::read(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        OutFile::from_bytes(data)
    }

    /// Indexes an output file already loaded into memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<OutFile, String> {
        if data.len() < OPENING_SIZE + CLOSING_SIZE {
            return Err("file too short to be a model output file".to_string());
        }

        // Closing records carry the section offsets.
        let mut tail = Cursor::at(&data, data.len() - CLOSING_SIZE);
        let id_pos = tail.read_count("ID section offset")?;
        let props_pos = tail.read_count("property section offset")?;
        let results_pos = tail.read_count("results section offset")?;
        let n_periods = tail.read_count("reporting period")?;
        let error_code = tail.read_i32()?;
        let closing_magic = tail.read_i32()?;

        let mut head = Cursor::at(&data, 0);
        let opening_magic = head.read_i32()?;
        if opening_magic != MAGIC || closing_magic != MAGIC {
            return Err("not a model output file (bad magic number)".to_string());
        }
        if error_code != 0 {
            return Err(format!(
                "model run reported error code {}; output is unusable",
                error_code
            ));
        }

        let version = head.read_i32()?;
        let flow_units_code = head.read_i32()?;
        let n_subcatch = head.read_count("subcatchment")?;
        let n_nodes = head.read_count("node")?;
        let n_links = head.read_count("link")?;
        let n_pollut = head.read_count("pollutant")?;

        // ID section: names per class, then pollutant unit codes.
        let mut cur = Cursor::at(&data, id_pos);
        let subcatchments = read_names(&mut cur, n_subcatch)?;
        let nodes = read_names(&mut cur, n_nodes)?;
        let links = read_names(&mut cur, n_links)?;
        let pollutants = read_names(&mut cur, n_pollut)?;
        cur.skip(4 * n_pollut)?; // concentration unit codes

        // Property section: codes and per-element values, not needed for
        // series extraction, walked to reach the variable tables.
        let mut cur = Cursor::at(&data, props_pos);
        for n_elements in [n_subcatch, n_nodes, n_links] {
            let n_props = cur.read_count("property")?;
            cur.skip(4 * n_props)?;
            cur.skip(4 * n_props * n_elements)?;
        }

        // Reporting-variable tables.
        let n_subcatch_vars = cur.read_count("subcatchment variable")?;
        cur.skip(4 * n_subcatch_vars)?;
        let n_node_vars = cur.read_count("node variable")?;
        cur.skip(4 * n_node_vars)?;
        let n_link_vars = cur.read_count("link variable")?;
        cur.skip(4 * n_link_vars)?;
        let n_sys_vars = cur.read_count("system variable")?;
        cur.skip(4 * n_sys_vars)?;

        let start_days = cur.read_f64()?;
        let report_step_seconds = cur.read_i32()?;

        if cur.pos != results_pos {
            return Err(format!(
                "results offset mismatch: header walk ended at byte {}, closing records say {}",
                cur.pos, results_pos
            ));
        }

        let period_size = 8
            + 4 * (n_subcatch * n_subcatch_vars
                + n_nodes * n_node_vars
                + n_links * n_link_vars
                + n_sys_vars);

        let results_end = results_pos
            .checked_add(n_periods.checked_mul(period_size).ok_or("offset overflow")?)
            .ok_or("offset overflow")?;
        if results_end > data.len() - CLOSING_SIZE {
            return Err("results section truncated".to_string());
        }

        Ok(OutFile {
            data,
            version,
            flow_units_code,
            subcatchments,
            nodes,
            links,
            pollutants,
            n_subcatch_vars,
            n_node_vars,
            n_link_vars,
            n_sys_vars,
            start_date: datetime_from_model_days(start_days),
            report_step_seconds,
            results_pos,
            period_size,
            n_periods,
        })
    }

    // -- accessors ----------------------------------------------------------

    /// Element names for a class, in file order. System has no named elements.
    pub fn entity_names(&self, kind: ElementKind) -> &[String] {
        match kind {
            ElementKind::Subcatchment => &self.subcatchments,
            ElementKind::Node => &self.nodes,
            ElementKind::Link => &self.links,
            ElementKind::System => &[],
        }
    }

    pub fn pollutant_names(&self) -> &[String] {
        &self.pollutants
    }

    pub fn n_periods(&self) -> usize {
        self.n_periods
    }

    pub fn start_date(&self) -> NaiveDateTime {
        self.start_date
    }

    pub fn report_step_seconds(&self) -> i32 {
        self.report_step_seconds
    }

    pub fn flow_units(&self) -> Option<FlowUnits> {
        FlowUnits::from_code(self.flow_units_code)
    }

    fn var_count(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Subcatchment => self.n_subcatch_vars,
            ElementKind::Node => self.n_node_vars,
            ElementKind::Link => self.n_link_vars,
            ElementKind::System => self.n_sys_vars,
        }
    }

    /// Metric names this file actually reports for a class: the base
    /// catalog variables present, plus pollutant names for non-system
    /// classes.
    pub fn available_metrics(&self, kind: ElementKind) -> Vec<&str> {
        let base: Vec<&str> = catalog::variables_for(kind)
            .iter()
            .filter(|v| v.index < self.var_count(kind))
            .map(|v| v.name)
            .collect();
        if kind == ElementKind::System {
            return base;
        }
        base.into_iter()
            .chain(self.pollutants.iter().map(String::as_str))
            .collect()
    }

    // -- series extraction --------------------------------------------------

    /// Extracts the time series for one (class, entity, metric) triple.
    ///
    /// Returns `None` when the entity or metric is unknown to this file —
    /// the caller maps that to a per-row not-available outcome, it is not
    /// an error.
    pub fn get_series(&self, kind: ElementKind, entity: &str, metric: &str) -> Option<Series> {
        let var_index = self.variable_index(kind, metric)?;
        let element_index = match kind {
            ElementKind::System => 0,
            _ => self.entity_names(kind).iter().position(|n| n == entity)?,
        };

        let value_offset = self.value_offset(kind, element_index, var_index);

        let mut points = Vec::with_capacity(self.n_periods);
        for period in 0..self.n_periods {
            let base = self.results_pos + period * self.period_size;

            let mut date_cursor = Cursor::at(&self.data, base);
            // Offsets were bounds-checked against the file length in
            // from_bytes, so these reads cannot fail.
            let days = date_cursor.read_f64().ok()?;

            let mut value_cursor = Cursor::at(&self.data, base + value_offset);
            let value = value_cursor.read_f32().ok()?;

            points.push(SamplePoint {
                time: datetime_from_model_days(days),
                value: value as f64,
            });
        }

        Some(Series::new(points))
    }

    /// Resolves a metric name to its column within the class block: base
    /// catalog variables first, pollutant concentrations appended after.
    fn variable_index(&self, kind: ElementKind, metric: &str) -> Option<usize> {
        if let Some(variable) = catalog::find_variable(kind, metric) {
            return (variable.index < self.var_count(kind)).then_some(variable.index);
        }
        if kind == ElementKind::System {
            return None;
        }
        let pollutant = self.pollutants.iter().position(|n| n == metric)?;
        let base = self.var_count(kind).checked_sub(self.pollutants.len())?;
        let index = base + pollutant;
        (index < self.var_count(kind)).then_some(index)
    }

    /// Byte offset of one value within a period record.
    fn value_offset(&self, kind: ElementKind, element_index: usize, var_index: usize) -> usize {
        let subcatch_block = self.subcatchments.len() * self.n_subcatch_vars;
        let node_block = self.nodes.len() * self.n_node_vars;
        let link_block = self.links.len() * self.n_link_vars;

        let slot = match kind {
            ElementKind::Subcatchment => element_index * self.n_subcatch_vars + var_index,
            ElementKind::Node => subcatch_block + element_index * self.n_node_vars + var_index,
            ElementKind::Link => {
                subcatch_block + node_block + element_index * self.n_link_vars + var_index
            }
            ElementKind::System => subcatch_block + node_block + link_block + var_index,
        };

        8 + 4 * slot
    }
}

fn read_names(cur: &mut Cursor<'_>, n: usize) -> Result<Vec<String>, String> {
    let mut names = Vec::with_capacity(n);
    for _ in 0..n {
        names.push(cur.read_name()?);
    }
    Ok(names)
}

// ---------------------------------------------------------------------------
// Date conversion
// ---------------------------------------------------------------------------

/// Converts a model date (fractional days since 1899-12-30) to a timestamp.
/// Sub-second fractions round to the nearest millisecond.
pub fn datetime_from_model_days(days: f64) -> NaiveDateTime {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    epoch + Duration::milliseconds((days * 86_400_000.0).round() as i64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
