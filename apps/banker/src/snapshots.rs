//! Loading snapshot documents from disk

use crate::error::CliError;
use banker_errors::Error;
use banker_types::{Snapshot, SnapshotDocument};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// A validated snapshot together with its display name
pub struct NamedSnapshot {
    pub name: String,
    pub snapshot: Snapshot,
}

/// Read and validate one snapshot document.
///
/// Files ending in `.toml` are parsed as TOML, everything else as JSON.
/// The document's `name` wins over the file stem.
pub async fn load(path: &Path) -> Result<NamedSnapshot, CliError> {
    let input_error = |source: Error| CliError::Input {
        path: path.to_path_buf(),
        source,
    };

    let contents = fs::read_to_string(path)
        .await
        .map_err(|e| input_error(Error::io_with_path(&e, path)))?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let document = if is_toml {
        SnapshotDocument::from_toml_str(&contents)
    } else {
        SnapshotDocument::from_json_str(&contents)
    }
    .map_err(|e| input_error(e.into()))?;

    let name = document.name.clone().unwrap_or_else(|| {
        path.file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
    });
    let snapshot = document.into_snapshot().map_err(|e| input_error(e.into()))?;

    debug!(
        path = %path.display(),
        processes = snapshot.process_count(),
        resources = snapshot.resource_type_count(),
        "loaded snapshot"
    );

    Ok(NamedSnapshot { name, snapshot })
}

/// The five-process, three-resource scenario used by `banker demo`
pub fn reference() -> Result<NamedSnapshot, Error> {
    let document = SnapshotDocument {
        name: Some("reference".to_string()),
        processes: Some(5),
        resources: Some(3),
        available: vec![3, 3, 2],
        max_demand: vec![
            vec![7, 5, 3],
            vec![3, 2, 2],
            vec![9, 0, 2],
            vec![2, 2, 2],
            vec![4, 3, 3],
        ],
        allocation: vec![
            vec![0, 1, 0],
            vec![2, 0, 0],
            vec![3, 0, 2],
            vec![2, 1, 1],
            vec![0, 0, 2],
        ],
    };

    Ok(NamedSnapshot {
        name: "reference".to_string(),
        snapshot: document.into_snapshot()?,
    })
}
