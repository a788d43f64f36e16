//! Verification of a proposed completion order

use banker_errors::OrderError;
use banker_types::{ResourceVector, Snapshot};
use tracing::debug;

/// Replay work accumulation in exactly the given order.
///
/// Unlike [`crate::evaluate`], no order is derived: each process in `order`
/// must fit in the work accumulated by its predecessors.
///
/// Returns the final work vector, which equals
/// [`Snapshot::total_units`] for any valid order.
///
/// # Errors
///
/// Returns [`OrderError::NotAPermutation`] if `order` does not list every
/// process exactly once, or [`OrderError::InsufficientWork`] for the first
/// step whose need exceeds the work available at that point.
pub fn replay(snapshot: &Snapshot, order: &[usize]) -> Result<ResourceVector, OrderError> {
    check_permutation(snapshot.process_count(), order)?;

    let mut work = snapshot.available().clone();
    for (step, &process) in order.iter().enumerate() {
        let need = snapshot.need(process);
        if let Some((resource, need, free)) = need.first_shortfall(&work) {
            debug!(step, process, resource, "replayed order stalls");
            return Err(OrderError::InsufficientWork {
                step,
                process,
                resource,
                need,
                work: free,
            });
        }
        work += &snapshot.allocation()[process];
    }

    Ok(work)
}

fn check_permutation(process_count: usize, order: &[usize]) -> Result<(), OrderError> {
    let reject = |reason: String| OrderError::NotAPermutation {
        process_count,
        reason,
    };

    if order.len() != process_count {
        return Err(reject(format!(
            "expected {process_count} entries, got {}",
            order.len()
        )));
    }

    let mut seen = vec![false; process_count];
    for &process in order {
        match seen.get_mut(process) {
            None => return Err(reject(format!("index {process} is out of range"))),
            Some(true) => return Err(reject(format!("index {process} appears twice"))),
            Some(slot) => *slot = true,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot::new(
            ResourceVector::from([1]),
            vec![ResourceVector::from([2]), ResourceVector::from([6])],
            vec![ResourceVector::from([0]), ResourceVector::from([5])],
        )
        .unwrap()
    }

    #[test]
    fn test_valid_order() {
        assert_eq!(replay(&snapshot(), &[1, 0]), Ok(ResourceVector::from([6])));
    }

    #[test]
    fn test_stalled_order() {
        assert_eq!(
            replay(&snapshot(), &[0, 1]),
            Err(OrderError::InsufficientWork {
                step: 0,
                process: 0,
                resource: 0,
                need: 2,
                work: 1,
            })
        );
    }

    #[test]
    fn test_not_a_permutation() {
        for order in [&[1][..], &[1, 1], &[0, 2], &[0, 1, 0]] {
            assert!(matches!(
                replay(&snapshot(), order),
                Err(OrderError::NotAPermutation { process_count: 2, .. })
            ));
        }
    }
}
