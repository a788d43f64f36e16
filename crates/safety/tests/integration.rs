//! Integration tests for safety evaluation

#[cfg(test)]
mod tests {
    use banker_errors::OrderError;
    use banker_safety::*;
    use banker_types::{ResourceVector, SafetyResult, Snapshot};
    use proptest::prelude::*;

    fn rows(data: &[[u64; 3]]) -> Vec<ResourceVector> {
        data.iter().map(|r| ResourceVector::from(*r)).collect()
    }

    fn reference_snapshot(available: [u64; 3]) -> Snapshot {
        Snapshot::new(
            ResourceVector::from(available),
            rows(&[[7, 5, 3], [3, 2, 2], [9, 0, 2], [2, 2, 2], [4, 3, 3]]),
            rows(&[[0, 1, 0], [2, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]]),
        )
        .unwrap()
    }

    #[test]
    fn test_reference_scenario_is_safe() {
        let snapshot = reference_snapshot([3, 3, 2]);
        assert_eq!(
            evaluate(&snapshot),
            SafetyResult::Safe {
                order: vec![1, 3, 4, 0, 2]
            }
        );

        let eval = evaluate_traced(&snapshot);
        assert_eq!(eval.trace.passes, 2);
        assert_eq!(eval.trace.final_work, ResourceVector::from([10, 5, 7]));
        assert_eq!(eval.trace.steps[0].need, ResourceVector::from([1, 2, 2]));
        assert_eq!(eval.trace.steps[0].work_after, ResourceVector::from([5, 3, 2]));
        assert!(eval.trace.blocked.is_empty());
    }

    #[test]
    fn test_reference_scenario_without_availability_is_unsafe() {
        let snapshot = reference_snapshot([0, 0, 0]);
        assert_eq!(evaluate(&snapshot), SafetyResult::Unsafe);

        let eval = evaluate_traced(&snapshot);
        assert!(eval.trace.steps.is_empty());
        assert_eq!(eval.trace.passes, 0);
        assert_eq!(eval.trace.blocked, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_no_processes_is_trivially_safe() {
        let snapshot = Snapshot::new(ResourceVector::from([4, 1]), vec![], vec![]).unwrap();
        assert_eq!(evaluate(&snapshot), SafetyResult::Safe { order: vec![] });

        let snapshot = Snapshot::new(ResourceVector::zeroed(0), vec![], vec![]).unwrap();
        assert_eq!(evaluate(&snapshot), SafetyResult::Safe { order: vec![] });
    }

    #[test]
    fn test_no_resource_types_finishes_everyone_in_index_order() {
        let empty = ResourceVector::zeroed(0);
        let snapshot = Snapshot::new(
            empty.clone(),
            vec![empty.clone(), empty.clone(), empty.clone()],
            vec![empty.clone(), empty.clone(), empty],
        )
        .unwrap();
        assert_eq!(
            evaluate(&snapshot),
            SafetyResult::Safe {
                order: vec![0, 1, 2]
            }
        );
    }

    #[test]
    fn test_all_zero_need_is_ascending() {
        let held = rows(&[[3, 0, 1], [0, 0, 0], [2, 2, 2], [9, 9, 9]]);
        let snapshot = Snapshot::new(ResourceVector::zeroed(3), held.clone(), held).unwrap();
        let eval = evaluate_traced(&snapshot);
        assert_eq!(
            eval.result,
            SafetyResult::Safe {
                order: vec![0, 1, 2, 3]
            }
        );
        assert_eq!(eval.trace.passes, 1);
    }

    #[test]
    fn test_replay_reference_order() {
        let snapshot = reference_snapshot([3, 3, 2]);
        assert_eq!(
            replay(&snapshot, &[1, 3, 4, 0, 2]),
            Ok(ResourceVector::from([10, 5, 7]))
        );
        // A different valid order also replays.
        assert!(replay(&snapshot, &[3, 1, 4, 0, 2]).is_ok());
        assert!(matches!(
            replay(&snapshot, &[0, 1, 2, 3, 4]),
            Err(OrderError::InsufficientWork {
                step: 0,
                process: 0,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_batch_preserves_input_order() {
        let snapshots = vec![
            reference_snapshot([3, 3, 2]),
            reference_snapshot([0, 0, 0]),
            reference_snapshot([10, 10, 10]),
            Snapshot::new(ResourceVector::zeroed(0), vec![], vec![]).unwrap(),
        ];
        let expected: Vec<SafetyResult> = snapshots.iter().map(evaluate).collect();

        let results = evaluate_batch(snapshots.clone(), 2).await.unwrap();
        assert_eq!(results, expected);
        assert_eq!(results[1], SafetyResult::Unsafe);

        let traced = evaluate_batch_traced(snapshots, 0).await.unwrap();
        let verdicts: Vec<SafetyResult> = traced.into_iter().map(|e| e.result).collect();
        assert_eq!(verdicts, expected);
    }

    #[test]
    fn test_evaluation_serializes() {
        let eval = evaluate_traced(&reference_snapshot([3, 3, 2]));
        let json = serde_json::to_value(&eval).unwrap();
        assert_eq!(json["result"]["verdict"], "safe");
        assert_eq!(json["trace"]["steps"][0]["process"], 1);
    }

    fn arb_snapshot(max_processes: usize) -> impl Strategy<Value = Snapshot> {
        (0..=max_processes, 0usize..4)
            .prop_flat_map(|(processes, resources)| {
                (
                    prop::collection::vec(0u64..8, resources),
                    prop::collection::vec(
                        prop::collection::vec((0u64..6, 0u64..8), resources),
                        processes,
                    ),
                )
            })
            .prop_map(|(available, held_and_need)| {
                let allocation: Vec<ResourceVector> = held_and_need
                    .iter()
                    .map(|row| row.iter().map(|(held, _)| *held).collect::<Vec<_>>().into())
                    .collect();
                let max_demand: Vec<ResourceVector> = held_and_need
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|(held, need)| held + need)
                            .collect::<Vec<_>>()
                            .into()
                    })
                    .collect();
                Snapshot::new(available.into(), max_demand, allocation).unwrap()
            })
    }

    /// Exhaustive search for any completion order.
    fn some_order_exists(snapshot: &Snapshot, work: &ResourceVector, done: &mut [bool]) -> bool {
        if done.iter().all(|&d| d) {
            return true;
        }
        for i in 0..done.len() {
            if !done[i] && snapshot.need(i).fits_within(work) {
                let mut next = work.clone();
                next += &snapshot.allocation()[i];
                done[i] = true;
                let found = some_order_exists(snapshot, &next, done);
                done[i] = false;
                if found {
                    return true;
                }
            }
        }
        false
    }

    proptest! {
        #[test]
        fn prop_deterministic(snapshot in arb_snapshot(8)) {
            let first = evaluate(&snapshot);
            prop_assert_eq!(&first, &evaluate(&snapshot));
            prop_assert_eq!(&first, &evaluate_traced(&snapshot).result);
        }

        #[test]
        fn prop_safe_order_is_valid_permutation(snapshot in arb_snapshot(8)) {
            if let SafetyResult::Safe { order } = evaluate(&snapshot) {
                let mut sorted = order.clone();
                sorted.sort_unstable();
                prop_assert_eq!(sorted, (0..snapshot.process_count()).collect::<Vec<_>>());
                prop_assert_eq!(replay(&snapshot, &order), Ok(snapshot.total_units()));
            }
        }

        #[test]
        fn prop_work_is_conserved_and_monotonic(snapshot in arb_snapshot(8)) {
            let eval = evaluate_traced(&snapshot);
            let mut work = snapshot.available().clone();
            for step in &eval.trace.steps {
                prop_assert_eq!(&step.work_before, &work);
                prop_assert!(step.need.fits_within(&step.work_before));
                prop_assert!(step.work_before.fits_within(&step.work_after));
                work = step.work_after.clone();
            }
            prop_assert_eq!(&work, &eval.trace.final_work);
            if eval.result.is_safe() {
                prop_assert_eq!(&eval.trace.final_work, &snapshot.total_units());
            }
        }

        #[test]
        fn prop_unsafe_is_a_fixed_point(snapshot in arb_snapshot(8)) {
            let eval = evaluate_traced(&snapshot);
            if eval.result == SafetyResult::Unsafe {
                prop_assert!(!eval.trace.blocked.is_empty());
                for &i in &eval.trace.blocked {
                    prop_assert!(!snapshot.need(i).fits_within(&eval.trace.final_work));
                }
            }
        }

        #[test]
        fn prop_verdict_matches_exhaustive_search(snapshot in arb_snapshot(6)) {
            let mut done = vec![false; snapshot.process_count()];
            let exists = some_order_exists(&snapshot, snapshot.available(), &mut done);
            prop_assert_eq!(evaluate(&snapshot).is_safe(), exists);
        }
    }
}
