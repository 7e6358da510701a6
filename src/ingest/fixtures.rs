/// Synthetic model-output files for tests and demos.
///
/// `synthetic_out` builds a byte-exact minimal `.out` image: no
/// subcatchments, no links, no pollutants, a configurable set of nodes
/// whose `total_inflow` column carries caller-chosen values. Every other
/// reporting variable is zero. The layout mirrors what the engine writes,
/// so the reader exercises the same section walk it uses on real files.
///
/// Test support only — nothing in the extraction pipeline calls this.

use crate::catalog::{LINK_VARIABLES, NODE_VARIABLES, SUBCATCHMENT_VARIABLES, SYSTEM_VARIABLES};

use super::swmm_out::MAGIC;

/// Column position of total_inflow within the node variable block.
const TOTAL_INFLOW: usize = 4;

/// Shape of a synthetic output file.
pub struct FixtureSpec {
    /// (node name, total_inflow series). Shorter series are zero-padded to
    /// the longest one.
    pub node_inflow: Vec<(String, Vec<f64>)>,
    /// Report start, fractional days since 1899-12-30.
    pub start_days: f64,
    pub report_step_seconds: i32,
    pub flow_units_code: i32,
    /// Engine error status written to the closing records.
    pub error_code: i32,
}

impl Default for FixtureSpec {
    fn default() -> Self {
        FixtureSpec {
            node_inflow: vec![("J1".to_string(), vec![1.0, 2.0, 1.0])],
            start_days: 43_586.0, // 2019-05-01 00:00
            report_step_seconds: 900,
            flow_units_code: 3, // CMS
            error_code: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Byte assembly
// ---------------------------------------------------------------------------

fn push_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn push_f32(buf: &mut Vec<u8>, v: f32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn push_f64(buf: &mut Vec<u8>, v: f64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn push_name(buf: &mut Vec<u8>, name: &str) {
    push_i32(buf, name.len() as i32);
    buf.extend_from_slice(name.as_bytes());
}

/// Builds the complete byte image described by `spec`.
pub fn synthetic_out(spec: &FixtureSpec) -> Vec<u8> {
    let n_nodes = spec.node_inflow.len();
    let n_node_vars = NODE_VARIABLES.len();
    let n_periods = spec
        .node_inflow
        .iter()
        .map(|(_, series)| series.len())
        .max()
        .unwrap_or(0);

    let mut buf = Vec::new();

    // Opening records.
    push_i32(&mut buf, MAGIC);
    push_i32(&mut buf, 51_000); // engine version
    push_i32(&mut buf, spec.flow_units_code);
    push_i32(&mut buf, 0); // subcatchments
    push_i32(&mut buf, n_nodes as i32);
    push_i32(&mut buf, 0); // links
    push_i32(&mut buf, 0); // pollutants

    // ID section.
    let id_pos = buf.len();
    for (name, _) in &spec.node_inflow {
        push_name(&mut buf, name);
    }

    // Property section: the engine writes codes even for empty classes.
    let props_pos = buf.len();
    push_i32(&mut buf, 1); // subcatchment properties: area
    push_i32(&mut buf, 1);
    push_i32(&mut buf, 3); // node properties: type, invert, max depth
    for code in 0..3 {
        push_i32(&mut buf, code);
    }
    for _ in 0..n_nodes {
        push_f32(&mut buf, 0.0); // junction type
        push_f32(&mut buf, 100.0); // invert elevation
        push_f32(&mut buf, 2.0); // max depth
    }
    push_i32(&mut buf, 5); // link properties
    for code in 0..5 {
        push_i32(&mut buf, code);
    }

    // Reporting-variable tables.
    push_i32(&mut buf, SUBCATCHMENT_VARIABLES.len() as i32);
    for v in SUBCATCHMENT_VARIABLES {
        push_i32(&mut buf, v.index as i32);
    }
    push_i32(&mut buf, n_node_vars as i32);
    for v in NODE_VARIABLES {
        push_i32(&mut buf, v.index as i32);
    }
    push_i32(&mut buf, LINK_VARIABLES.len() as i32);
    for v in LINK_VARIABLES {
        push_i32(&mut buf, v.index as i32);
    }
    push_i32(&mut buf, SYSTEM_VARIABLES.len() as i32);
    for v in SYSTEM_VARIABLES {
        push_i32(&mut buf, v.index as i32);
    }

    // Start date and report step.
    push_f64(&mut buf, spec.start_days);
    push_i32(&mut buf, spec.report_step_seconds);

    // Computed results: first report lands one step after the start date.
    let results_pos = buf.len();
    let step_days = f64::from(spec.report_step_seconds) / 86_400.0;
    for period in 0..n_periods {
        push_f64(&mut buf, spec.start_days + step_days * (period + 1) as f64);
        for (_, series) in &spec.node_inflow {
            let inflow = series.get(period).copied().unwrap_or(0.0);
            for var in 0..n_node_vars {
                if var == TOTAL_INFLOW {
                    push_f32(&mut buf, inflow as f32);
                } else {
                    push_f32(&mut buf, 0.0);
                }
            }
        }
        for _ in SYSTEM_VARIABLES {
            push_f32(&mut buf, 0.0);
        }
    }

    // Closing records.
    push_i32(&mut buf, id_pos as i32);
    push_i32(&mut buf, props_pos as i32);
    push_i32(&mut buf, results_pos as i32);
    push_i32(&mut buf, n_periods as i32);
    push_i32(&mut buf, spec.error_code);
    push_i32(&mut buf, MAGIC);

    buf
}
