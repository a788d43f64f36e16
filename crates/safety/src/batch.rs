//! Concurrent evaluation of independent snapshots

use crate::evaluator::{evaluate, evaluate_traced, Evaluation};
use banker_errors::Error;
use banker_types::{SafetyResult, Snapshot};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// Evaluate many snapshots concurrently, at most `jobs` at a time.
///
/// Each snapshot is evaluated whole on a blocking worker task; a single
/// search is never split. Results come back in input order. `jobs` is
/// clamped to at least one.
///
/// # Errors
///
/// Returns [`Error::Internal`] if a worker task panics or is cancelled.
pub async fn evaluate_batch(
    snapshots: Vec<Snapshot>,
    jobs: usize,
) -> Result<Vec<SafetyResult>, Error> {
    run_batch(snapshots, jobs, evaluate).await
}

/// Traced variant of [`evaluate_batch`]
///
/// # Errors
///
/// Returns [`Error::Internal`] if a worker task panics or is cancelled.
pub async fn evaluate_batch_traced(
    snapshots: Vec<Snapshot>,
    jobs: usize,
) -> Result<Vec<Evaluation>, Error> {
    run_batch(snapshots, jobs, evaluate_traced).await
}

async fn run_batch<T>(
    snapshots: Vec<Snapshot>,
    jobs: usize,
    eval: fn(&Snapshot) -> T,
) -> Result<Vec<T>, Error>
where
    T: Send + 'static,
{
    let jobs = jobs.max(1);
    debug!(snapshots = snapshots.len(), jobs, "starting batch evaluation");

    let semaphore = Arc::new(Semaphore::new(jobs));
    let mut handles = Vec::with_capacity(snapshots.len());

    for snapshot in snapshots {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| Error::internal("evaluation semaphore closed"))?;

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            eval(&snapshot)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for (index, handle) in handles.into_iter().enumerate() {
        let result = handle
            .await
            .map_err(|e| Error::internal(format!("evaluation of snapshot {index} failed: {e}")))?;
        results.push(result);
    }

    Ok(results)
}
