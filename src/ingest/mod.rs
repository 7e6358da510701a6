/// Data ingest for the stormstat extraction pipeline.
///
/// Submodules:
/// - `swmm_out` — binary model-output (.out) file reader.
/// - `entity_list` — entity-name lists from .csv / Excel worksheets.
/// - `fixtures` (test support) — synthetic output-file byte images.

pub mod entity_list;
pub mod fixtures;
pub mod swmm_out;
