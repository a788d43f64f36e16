//! Resource-state snapshots and their document form

use crate::resource::{ResourceVector, Units};
use banker_errors::SnapshotError;
use serde::{Deserialize, Serialize};

/// Complete system state under evaluation.
///
/// A `Snapshot` can only be built through [`Snapshot::new`] (or from a
/// [`SnapshotDocument`]), so every value in circulation satisfies:
/// - `max_demand` and `allocation` have exactly P rows,
/// - `available` and every row have exactly R entries,
/// - `allocation[i][j] <= max_demand[i][j]`,
/// - `available + sum(allocation)` fits in [`Units`] for every resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    available: ResourceVector,
    max_demand: Vec<ResourceVector>,
    allocation: Vec<ResourceVector>,
}

impl Snapshot {
    /// Validate and build a snapshot.
    ///
    /// P is taken from the number of `max_demand` rows and R from the
    /// length of `available`.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] describing the first violated invariant.
    pub fn new(
        available: ResourceVector,
        max_demand: Vec<ResourceVector>,
        allocation: Vec<ResourceVector>,
    ) -> Result<Self, SnapshotError> {
        let resources = available.len();
        let processes = max_demand.len();

        if allocation.len() != processes {
            return Err(SnapshotError::RowCountMismatch {
                matrix: "allocation".to_string(),
                expected: processes,
                actual: allocation.len(),
            });
        }

        for (process, (max_row, alloc_row)) in max_demand.iter().zip(&allocation).enumerate() {
            check_row_length("max", process, max_row, resources)?;
            check_row_length("allocation", process, alloc_row, resources)?;

            if let Some((resource, held, declared)) = alloc_row.first_shortfall(max_row) {
                return Err(SnapshotError::AllocationExceedsDemand {
                    process,
                    resource,
                    allocation: held,
                    max_demand: declared,
                });
            }
        }

        let mut total = available.clone();
        for row in &allocation {
            total
                .try_add_assign(row)
                .map_err(|resource| SnapshotError::CapacityOverflow { resource })?;
        }

        Ok(Self {
            available,
            max_demand,
            allocation,
        })
    }

    /// Number of processes (P)
    #[must_use]
    pub fn process_count(&self) -> usize {
        self.max_demand.len()
    }

    /// Number of resource types (R)
    #[must_use]
    pub fn resource_type_count(&self) -> usize {
        self.available.len()
    }

    #[must_use]
    pub fn available(&self) -> &ResourceVector {
        &self.available
    }

    #[must_use]
    pub fn max_demand(&self) -> &[ResourceVector] {
        &self.max_demand
    }

    #[must_use]
    pub fn allocation(&self) -> &[ResourceVector] {
        &self.allocation
    }

    /// Remaining need of one process: `max_demand[i] - allocation[i]`
    ///
    /// # Panics
    ///
    /// Panics if `process >= self.process_count()`.
    #[must_use]
    pub fn need(&self, process: usize) -> ResourceVector {
        // Validation guarantees allocation <= max_demand, so this never clamps.
        self.max_demand[process].saturating_sub(&self.allocation[process])
    }

    /// Remaining need of every process, indexed by process id
    #[must_use]
    pub fn needs(&self) -> Vec<ResourceVector> {
        (0..self.process_count()).map(|i| self.need(i)).collect()
    }

    /// `available` plus every process's allocation
    #[must_use]
    pub fn total_units(&self) -> ResourceVector {
        let mut total = self.available.clone();
        for row in &self.allocation {
            total += row;
        }
        total
    }
}

fn check_row_length(
    matrix: &str,
    process: usize,
    row: &ResourceVector,
    expected: usize,
) -> Result<(), SnapshotError> {
    if row.len() == expected {
        Ok(())
    } else {
        Err(SnapshotError::RowLengthMismatch {
            matrix: matrix.to_string(),
            process,
            expected,
            actual: row.len(),
        })
    }
}

/// Serialized form of a snapshot, as read from TOML or JSON files.
///
/// Entries are signed so that negative counts are reported as malformed
/// input instead of a generic parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    /// Optional label used in reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Declared process count, checked against the matrices when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processes: Option<usize>,
    /// Declared resource type count, checked against `available` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<usize>,
    pub available: Vec<i64>,
    #[serde(rename = "max")]
    pub max_demand: Vec<Vec<i64>>,
    pub allocation: Vec<Vec<i64>>,
}

impl SnapshotDocument {
    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Parse`] on invalid TOML or missing keys.
    pub fn from_toml_str(input: &str) -> Result<Self, SnapshotError> {
        toml::from_str(input).map_err(|e| SnapshotError::Parse {
            message: e.to_string(),
        })
    }

    /// Parse a JSON document
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Parse`] on invalid JSON or missing keys.
    pub fn from_json_str(input: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(input).map_err(|e| SnapshotError::Parse {
            message: e.to_string(),
        })
    }

    /// Validate the document and build a [`Snapshot`]
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] for declared-count mismatches, negative
    /// entries or any invariant rejected by [`Snapshot::new`].
    pub fn into_snapshot(self) -> Result<Snapshot, SnapshotError> {
        Snapshot::try_from(self)
    }
}

impl TryFrom<SnapshotDocument> for Snapshot {
    type Error = SnapshotError;

    fn try_from(doc: SnapshotDocument) -> Result<Self, Self::Error> {
        if let Some(declared) = doc.processes {
            if declared != doc.max_demand.len() {
                return Err(SnapshotError::DeclaredCountMismatch {
                    field: "processes".to_string(),
                    declared,
                    actual: doc.max_demand.len(),
                });
            }
        }
        if let Some(declared) = doc.resources {
            if declared != doc.available.len() {
                return Err(SnapshotError::DeclaredCountMismatch {
                    field: "resources".to_string(),
                    declared,
                    actual: doc.available.len(),
                });
            }
        }

        let available = to_units(&doc.available, "available", None)?;
        let max_demand = to_rows(&doc.max_demand, "max")?;
        let allocation = to_rows(&doc.allocation, "allocation")?;

        Snapshot::new(available, max_demand, allocation)
    }
}

impl TryFrom<&Snapshot> for SnapshotDocument {
    type Error = SnapshotError;

    /// Describe a snapshot as a document.
    ///
    /// Documents hold signed entries, so counts above [`i64::MAX`] are
    /// rejected instead of being clamped.
    fn try_from(snapshot: &Snapshot) -> Result<Self, Self::Error> {
        let available = to_signed(snapshot.available(), "available", None)?;
        let max_demand = snapshot
            .max_demand()
            .iter()
            .enumerate()
            .map(|(process, row)| to_signed(row, "max", Some(process)))
            .collect::<Result<Vec<_>, SnapshotError>>()?;
        let allocation = snapshot
            .allocation()
            .iter()
            .enumerate()
            .map(|(process, row)| to_signed(row, "allocation", Some(process)))
            .collect::<Result<Vec<_>, SnapshotError>>()?;

        Ok(Self {
            name: None,
            processes: Some(snapshot.process_count()),
            resources: Some(snapshot.resource_type_count()),
            available,
            max_demand,
            allocation,
        })
    }
}

fn entry_location(process: Option<usize>, resource: usize) -> String {
    match process {
        Some(process) => format!("process {process}, resource {resource}"),
        None => format!("resource {resource}"),
    }
}

fn to_signed(
    row: &ResourceVector,
    matrix: &str,
    process: Option<usize>,
) -> Result<Vec<i64>, SnapshotError> {
    row.iter()
        .enumerate()
        .map(|(resource, units)| {
            i64::try_from(units).map_err(|_| SnapshotError::EntryOutOfRange {
                matrix: matrix.to_string(),
                location: entry_location(process, resource),
                value: units,
            })
        })
        .collect()
}

fn to_rows(rows: &[Vec<i64>], matrix: &str) -> Result<Vec<ResourceVector>, SnapshotError> {
    rows.iter()
        .enumerate()
        .map(|(process, row)| to_units(row, matrix, Some(process)))
        .collect()
}

fn to_units(
    row: &[i64],
    matrix: &str,
    process: Option<usize>,
) -> Result<ResourceVector, SnapshotError> {
    row.iter()
        .enumerate()
        .map(|(resource, &value)| {
            Units::try_from(value).map_err(|_| SnapshotError::NegativeEntry {
                matrix: matrix.to_string(),
                location: entry_location(process, resource),
                value,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(ResourceVector::from)
}
