/// Series analysis for the stormstat extraction pipeline.
///
/// Submodules:
/// - `extrema` — peak detection and the order statistics behind every
///   results-table cell.
/// - `alignment` — shifts multiple series onto a shared anchor timestamp
///   for overlay comparison.

pub mod alignment;
pub mod extrema;
