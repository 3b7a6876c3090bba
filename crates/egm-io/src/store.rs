//! JSON persistence for datasets and topology edges.
//!
//! One structured file holds the whole dataset: a mapping with keys
//! `equipment`, `maintenance_records`, `sensors`, `alerts`, `customers`,
//! `installations` (plus the schema `version`), each an ordered sequence
//! of flat attribute mappings. The round trip is lossless:
//! `load_dataset(save_dataset(d)) == d` including list order.

use egm_core::{Dataset, Diagnostics, EgmError, EgmResult, TopologyEdges, SCHEMA_VERSION};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Save a dataset as pretty-printed JSON.
pub fn save_dataset(dataset: &Dataset, path: &Path) -> EgmResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, dataset)
        .map_err(|err| EgmError::Serialization(format!("writing '{}': {}", path.display(), err)))?;
    info!(path = %path.display(), "dataset saved");
    Ok(())
}

/// Load a dataset, rejecting malformed files and incompatible schema
/// versions with [`EgmError::Serialization`], and revalidating integrity
/// (a hand-edited file with dangling references fails [`EgmError::Integrity`]).
pub fn load_dataset(path: &Path) -> EgmResult<Dataset> {
    let file = File::open(path)?;
    let dataset: Dataset = serde_json::from_reader(file)
        .map_err(|err| EgmError::Serialization(format!("parsing '{}': {}", path.display(), err)))?;
    if dataset.version != SCHEMA_VERSION {
        return Err(EgmError::Serialization(format!(
            "unsupported schema version {} in '{}' (expected {})",
            dataset.version,
            path.display(),
            SCHEMA_VERSION
        )));
    }

    let mut diag = Diagnostics::new();
    dataset.validate_into(&mut diag);
    if diag.has_errors() {
        return Err(EgmError::Integrity(diag.error_summary()));
    }
    info!(path = %path.display(), stats = %dataset.stats(), "dataset loaded");
    Ok(dataset)
}

/// Save topology edges alongside a dataset.
pub fn save_topology(edges: &TopologyEdges, path: &Path) -> EgmResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, edges)
        .map_err(|err| EgmError::Serialization(format!("writing '{}': {}", path.display(), err)))
}

pub fn load_topology(path: &Path) -> EgmResult<TopologyEdges> {
    let file = File::open(path)?;
    serde_json::from_reader(file)
        .map_err(|err| EgmError::Serialization(format!("parsing '{}': {}", path.display(), err)))
}
