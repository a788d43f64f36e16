//! Greedy safety search over a resource snapshot

use banker_types::{ResourceVector, SafetyResult, Snapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// One process judged able to finish
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    /// 1-based pass in which the process finished
    pub pass: usize,
    /// Process index
    pub process: usize,
    /// Outstanding need at the time of the check
    pub need: ResourceVector,
    /// Work before the process released its allocation
    pub work_before: ResourceVector,
    /// Work after the release
    pub work_after: ResourceVector,
}

/// Step-by-step record of one evaluation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationTrace {
    /// Processes in the order they finished
    pub steps: Vec<TraceStep>,
    /// Number of passes that finished at least one process
    pub passes: usize,
    /// Processes that could never finish, ascending
    pub blocked: Vec<usize>,
    /// Work when the search stopped
    pub final_work: ResourceVector,
}

/// Verdict together with the trace that produced it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Same verdict [`evaluate`] returns for this snapshot
    pub result: SafetyResult,
    /// Steps taken by the search, including the blocked set on an unsafe verdict
    pub trace: EvaluationTrace,
}

trait StepObserver {
    fn finished(
        &mut self,
        pass: usize,
        process: usize,
        need: &ResourceVector,
        work: &ResourceVector,
        released: &ResourceVector,
    );
}

struct Silent;

impl StepObserver for Silent {
    fn finished(
        &mut self,
        _pass: usize,
        _process: usize,
        _need: &ResourceVector,
        _work: &ResourceVector,
        _released: &ResourceVector,
    ) {
    }
}

impl StepObserver for Vec<TraceStep> {
    fn finished(
        &mut self,
        pass: usize,
        process: usize,
        need: &ResourceVector,
        work: &ResourceVector,
        released: &ResourceVector,
    ) {
        let mut work_after = work.clone();
        work_after += released;
        self.push(TraceStep {
            pass,
            process,
            need: need.clone(),
            work_before: work.clone(),
            work_after,
        });
    }
}

struct SearchOutcome {
    result: SafetyResult,
    passes: usize,
    blocked: Vec<usize>,
    work: ResourceVector,
}

/// Decide whether every process in `snapshot` can run to completion.
///
/// Processes are scanned in ascending index order, pass after pass. A
/// process whose need fits in the current work finishes at once and its
/// allocation is returned to work, where later processes of the same pass
/// already see it. The search stops after a pass that finishes nothing.
///
/// Returns [`SafetyResult::Safe`] with the completion order when every
/// process finished, otherwise [`SafetyResult::Unsafe`].
#[must_use]
pub fn evaluate(snapshot: &Snapshot) -> SafetyResult {
    search(snapshot, &mut Silent).result
}

/// Same search as [`evaluate`], also recording every step
#[must_use]
pub fn evaluate_traced(snapshot: &Snapshot) -> Evaluation {
    let mut steps = Vec::with_capacity(snapshot.process_count());
    let outcome = search(snapshot, &mut steps);
    Evaluation {
        result: outcome.result,
        trace: EvaluationTrace {
            steps,
            passes: outcome.passes,
            blocked: outcome.blocked,
            final_work: outcome.work,
        },
    }
}

fn search(snapshot: &Snapshot, observer: &mut impl StepObserver) -> SearchOutcome {
    let processes = snapshot.process_count();
    let need = snapshot.needs();
    let allocation = snapshot.allocation();

    let mut work = snapshot.available().clone();
    let mut finish = vec![false; processes];
    let mut order = Vec::with_capacity(processes);
    let mut passes = 0;

    loop {
        let mut progressed = false;

        for i in 0..processes {
            if finish[i] || !need[i].fits_within(&work) {
                continue;
            }

            observer.finished(passes + 1, i, &need[i], &work, &allocation[i]);
            work += &allocation[i];
            finish[i] = true;
            order.push(i);
            progressed = true;

            trace!(pass = passes + 1, process = i, work = %work, "process can finish");
        }

        if !progressed {
            break;
        }
        passes += 1;
    }

    let blocked: Vec<usize> = (0..processes).filter(|&i| !finish[i]).collect();
    let result = if blocked.is_empty() {
        SafetyResult::Safe { order }
    } else {
        SafetyResult::Unsafe
    };

    debug!(
        processes,
        resources = snapshot.resource_type_count(),
        passes,
        blocked = blocked.len(),
        safe = result.is_safe(),
        "safety evaluation finished"
    );

    SearchOutcome {
        result,
        passes,
        blocked,
        work,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(available: &[u64], max: &[&[u64]], alloc: &[&[u64]]) -> Snapshot {
        Snapshot::new(
            ResourceVector::new(available.to_vec()),
            max.iter().map(|r| ResourceVector::new(r.to_vec())).collect(),
            alloc.iter().map(|r| ResourceVector::new(r.to_vec())).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_freed_capacity_visible_later_in_same_pass() {
        // Process 0 releases 5 units, which lets process 1 finish in pass 1.
        let s = snapshot(&[1], &[&[6], &[4]], &[&[5], &[0]]);
        let eval = evaluate_traced(&s);
        assert_eq!(eval.result, SafetyResult::Safe { order: vec![0, 1] });
        assert_eq!(eval.trace.passes, 1);
    }

    #[test]
    fn test_earlier_index_waits_for_next_pass() {
        // Process 1 unlocks process 0, but 0 was already scanned this pass.
        let s = snapshot(&[1], &[&[2], &[6]], &[&[0], &[5]]);
        let eval = evaluate_traced(&s);
        assert_eq!(eval.result, SafetyResult::Safe { order: vec![1, 0] });
        assert_eq!(eval.trace.passes, 2);
        assert_eq!(eval.trace.steps[0].pass, 1);
        assert_eq!(eval.trace.steps[1].pass, 2);
    }

    #[test]
    fn test_progressive_order_differs_from_buffered() {
        // Deferring releases to the end of a pass would yield [1, 0, 2].
        let s = snapshot(&[1], &[&[2], &[6], &[3]], &[&[0], &[5], &[0]]);
        assert_eq!(evaluate(&s), SafetyResult::Safe { order: vec![1, 2, 0] });
    }

    #[test]
    fn test_unsafe_trace_lists_blocked() {
        let s = snapshot(&[1, 0], &[&[1, 0], &[0, 2]], &[&[0, 0], &[0, 1]]);
        let eval = evaluate_traced(&s);
        assert_eq!(eval.result, SafetyResult::Unsafe);
        assert_eq!(eval.trace.blocked, vec![1]);
        assert_eq!(eval.trace.final_work, ResourceVector::from([1, 0]));
    }

    #[test]
    fn test_trace_steps_chain() {
        let s = snapshot(&[2, 1], &[&[2, 1], &[3, 2]], &[&[1, 0], &[1, 1]]);
        let eval = evaluate_traced(&s);
        for pair in eval.trace.steps.windows(2) {
            assert_eq!(pair[0].work_after, pair[1].work_before);
        }
        assert_eq!(
            eval.trace.steps.last().map(|s| &s.work_after),
            Some(&eval.trace.final_work)
        );
    }
}
