/// Reporting-variable registry for stormwater model output files.
///
/// Defines the canonical metric names for each element class and their
/// column positions within a reporting period record. This is the single
/// source of truth for metric names — all other modules should resolve
/// metrics from here rather than hardcoding column indices.
///
/// Pollutant concentrations are appended after the base variables of each
/// element class and are resolved by pollutant name at read time, so they
/// do not appear in these tables.

use crate::model::ElementKind;

// ---------------------------------------------------------------------------
// Variable metadata
// ---------------------------------------------------------------------------

/// Metadata for a single reporting variable.
pub struct Variable {
    /// Canonical metric name used in job configuration.
    pub name: &'static str,
    /// Column position within the element's block of a period record.
    pub index: usize,
    /// Human-readable description for `inspect_out` listings.
    pub description: &'static str,
}

/// Subcatchment reporting variables, in file column order.
pub static SUBCATCHMENT_VARIABLES: &[Variable] = &[
    Variable { name: "rainfall", index: 0, description: "Rainfall intensity" },
    Variable { name: "snow_depth", index: 1, description: "Snow depth" },
    Variable { name: "evaporation_loss", index: 2, description: "Evaporation loss" },
    Variable { name: "infiltration_loss", index: 3, description: "Infiltration loss" },
    Variable { name: "runoff", index: 4, description: "Runoff flow" },
    Variable { name: "gw_outflow", index: 5, description: "Groundwater outflow to drainage" },
    Variable { name: "gw_elevation", index: 6, description: "Groundwater table elevation" },
    Variable { name: "soil_moisture", index: 7, description: "Unsaturated zone soil moisture" },
];

/// Node reporting variables, in file column order.
pub static NODE_VARIABLES: &[Variable] = &[
    Variable { name: "depth", index: 0, description: "Water depth above invert" },
    Variable { name: "head", index: 1, description: "Hydraulic head" },
    Variable { name: "volume", index: 2, description: "Stored water volume" },
    Variable { name: "lateral_inflow", index: 3, description: "Lateral inflow" },
    Variable { name: "total_inflow", index: 4, description: "Total inflow (lateral + upstream)" },
    Variable { name: "flooding", index: 5, description: "Surface flooding overflow" },
];

/// Link reporting variables, in file column order.
pub static LINK_VARIABLES: &[Variable] = &[
    Variable { name: "flow", index: 0, description: "Flow rate" },
    Variable { name: "depth", index: 1, description: "Flow depth" },
    Variable { name: "velocity", index: 2, description: "Flow velocity" },
    Variable { name: "volume", index: 3, description: "Water volume in conduit" },
    Variable { name: "capacity", index: 4, description: "Fraction of full capacity" },
];

/// System-wide reporting variables, in file column order.
pub static SYSTEM_VARIABLES: &[Variable] = &[
    Variable { name: "air_temperature", index: 0, description: "Air temperature" },
    Variable { name: "rainfall", index: 1, description: "Basin-average rainfall" },
    Variable { name: "snow_depth", index: 2, description: "Basin-average snow depth" },
    Variable { name: "infiltration", index: 3, description: "Basin-average infiltration" },
    Variable { name: "runoff", index: 4, description: "Total runoff flow" },
    Variable { name: "dry_weather_inflow", index: 5, description: "Dry weather inflow" },
    Variable { name: "gw_inflow", index: 6, description: "Groundwater inflow" },
    Variable { name: "rdii_inflow", index: 7, description: "Rainfall-derived infiltration/inflow" },
    Variable { name: "direct_inflow", index: 8, description: "External direct inflow" },
    Variable { name: "total_lateral_inflow", index: 9, description: "Total lateral inflow" },
    Variable { name: "flooding", index: 10, description: "Total surface flooding" },
    Variable { name: "outflow", index: 11, description: "Total outfall discharge" },
    Variable { name: "storage_volume", index: 12, description: "Total stored volume" },
    Variable { name: "evaporation", index: 13, description: "Actual evaporation" },
    Variable { name: "potential_et", index: 14, description: "Potential evapotranspiration" },
];

/// Returns the base variable table for an element class.
pub fn variables_for(kind: ElementKind) -> &'static [Variable] {
    match kind {
        ElementKind::Subcatchment => SUBCATCHMENT_VARIABLES,
        ElementKind::Node => NODE_VARIABLES,
        ElementKind::Link => LINK_VARIABLES,
        ElementKind::System => SYSTEM_VARIABLES,
    }
}

/// Looks up a base variable by metric name. Returns `None` if the element
/// class has no such variable (the caller may still resolve a pollutant).
pub fn find_variable(kind: ElementKind, name: &str) -> Option<&'static Variable> {
    variables_for(kind).iter().find(|v| v.name == name)
}

// ---------------------------------------------------------------------------
// Flow units
// ---------------------------------------------------------------------------

/// Flow unit system encoded in the output file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowUnits {
    Cfs,
    Gpm,
    Mgd,
    Cms,
    Lps,
    Mld,
}

impl FlowUnits {
    /// Decodes the header flow-unit code. Unknown codes return `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(FlowUnits::Cfs),
            1 => Some(FlowUnits::Gpm),
            2 => Some(FlowUnits::Mgd),
            3 => Some(FlowUnits::Cms),
            4 => Some(FlowUnits::Lps),
            5 => Some(FlowUnits::Mld),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowUnits::Cfs => "CFS",
            FlowUnits::Gpm => "GPM",
            FlowUnits::Mgd => "MGD",
            FlowUnits::Cms => "CMS",
            FlowUnits::Lps => "LPS",
            FlowUnits::Mld => "MLD",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_indices_match_column_order() {
        // The index field must equal the table position — the reader uses it
        // to seek within a period record, so a mismatch reads wrong columns.
        for kind in [
            ElementKind::Subcatchment,
            ElementKind::Node,
            ElementKind::Link,
            ElementKind::System,
        ] {
            for (position, variable) in variables_for(kind).iter().enumerate() {
                assert_eq!(
                    variable.index, position,
                    "{} variable '{}' index does not match table position",
                    kind, variable.name
                );
            }
        }
    }

    #[test]
    fn test_no_duplicate_names_within_a_class() {
        for kind in [
            ElementKind::Subcatchment,
            ElementKind::Node,
            ElementKind::Link,
            ElementKind::System,
        ] {
            let mut seen = std::collections::HashSet::new();
            for variable in variables_for(kind) {
                assert!(
                    seen.insert(variable.name),
                    "duplicate metric name '{}' in {} table",
                    variable.name,
                    kind
                );
            }
        }
    }

    #[test]
    fn test_find_variable_resolves_total_inflow() {
        let variable = find_variable(ElementKind::Node, "total_inflow")
            .expect("total_inflow should be a node variable");
        assert_eq!(variable.index, 4);
    }

    #[test]
    fn test_find_variable_returns_none_for_wrong_class() {
        // total_inflow is a node metric; links report plain flow.
        assert!(find_variable(ElementKind::Link, "total_inflow").is_none());
        assert!(find_variable(ElementKind::Link, "flow").is_some());
    }

    #[test]
    fn test_expected_table_sizes() {
        assert_eq!(SUBCATCHMENT_VARIABLES.len(), 8);
        assert_eq!(NODE_VARIABLES.len(), 6);
        assert_eq!(LINK_VARIABLES.len(), 5);
        assert_eq!(SYSTEM_VARIABLES.len(), 15);
    }

    #[test]
    fn test_flow_units_decode() {
        assert_eq!(FlowUnits::from_code(0), Some(FlowUnits::Cfs));
        assert_eq!(FlowUnits::from_code(3), Some(FlowUnits::Cms));
        assert_eq!(FlowUnits::from_code(99), None);
        assert_eq!(FlowUnits::Cms.as_str(), "CMS");
    }
}
