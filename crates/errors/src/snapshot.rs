//! Errors for malformed resource-state snapshots

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// A snapshot that violates the shape or allocation invariants.
///
/// Every variant names the offending matrix and coordinates so the caller
/// can point at the exact entry; nothing is silently corrected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("{matrix} has {actual} rows, expected {expected}")]
    RowCountMismatch {
        matrix: String,
        expected: usize,
        actual: usize,
    },

    #[error("{matrix} row {process} has {actual} entries, expected {expected}")]
    RowLengthMismatch {
        matrix: String,
        process: usize,
        expected: usize,
        actual: usize,
    },

    #[error("declared {field} = {declared} but the matrices describe {actual}")]
    DeclaredCountMismatch {
        field: String,
        declared: usize,
        actual: usize,
    },

    #[error("negative entry {value} in {matrix} at {location}")]
    NegativeEntry {
        matrix: String,
        location: String,
        value: i64,
    },

    #[error(
        "process {process} holds {allocation} units of resource {resource} but declared a maximum of {max_demand}"
    )]
    AllocationExceedsDemand {
        process: usize,
        resource: usize,
        allocation: u64,
        max_demand: u64,
    },

    #[error("{value} units in {matrix} at {location} exceed the document range")]
    EntryOutOfRange {
        matrix: String,
        location: String,
        value: u64,
    },

    #[error("total units of resource {resource} overflow the unit counter")]
    CapacityOverflow { resource: usize },

    #[error("failed to parse snapshot document: {message}")]
    Parse { message: String },
}

impl UserFacingError for SnapshotError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::RowCountMismatch { .. }
            | Self::RowLengthMismatch { .. }
            | Self::DeclaredCountMismatch { .. } => Some(
                "Every process needs one max and one allocation row, each with one entry per resource type.",
            ),
            Self::NegativeEntry { .. } => Some("Resource counts must be zero or positive."),
            Self::AllocationExceedsDemand { .. } => {
                Some("A process cannot hold more of a resource than its declared maximum.")
            }
            Self::EntryOutOfRange { .. } => {
                Some("Documents store signed 64-bit counts; keep unit counts below 2^63.")
            }
            Self::CapacityOverflow { .. } => Some("Reduce the unit counts of the reported resource."),
            Self::Parse { .. } => Some("Check the snapshot file syntax (TOML or JSON)."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::RowCountMismatch { .. } => "snapshot.row_count_mismatch",
            Self::RowLengthMismatch { .. } => "snapshot.row_length_mismatch",
            Self::DeclaredCountMismatch { .. } => "snapshot.declared_count_mismatch",
            Self::NegativeEntry { .. } => "snapshot.negative_entry",
            Self::AllocationExceedsDemand { .. } => "snapshot.allocation_exceeds_demand",
            Self::EntryOutOfRange { .. } => "snapshot.entry_out_of_range",
            Self::CapacityOverflow { .. } => "snapshot.capacity_overflow",
            Self::Parse { .. } => "snapshot.parse_error",
        };
        Some(code)
    }
}
