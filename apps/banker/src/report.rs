//! Serializable command results

use banker_safety::EvaluationTrace;
use banker_types::{ResourceVector, SafetyResult};
use serde::Serialize;

/// Verdict for one snapshot
#[derive(Clone, Debug, Serialize)]
pub struct CheckReport {
    pub name: String,
    pub processes: usize,
    pub resources: usize,
    #[serde(flatten)]
    pub result: SafetyResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<EvaluationTrace>,
}

/// Successful replay of a caller-supplied order
#[derive(Clone, Debug, Serialize)]
pub struct ReplayReport {
    pub name: String,
    pub order: Vec<usize>,
    pub final_work: ResourceVector,
}

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Verdicts, one per snapshot, in argument order
    Check(Vec<CheckReport>),
    /// Order replay
    Replay(ReplayReport),
}

impl OperationResult {
    /// Convert to JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Whether any checked snapshot was unsafe
    pub fn any_unsafe(&self) -> bool {
        match self {
            Self::Check(reports) => reports.iter().any(|r| !r.result.is_safe()),
            Self::Replay(_) => false,
        }
    }
}
