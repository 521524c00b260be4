//! Property tests for the unwind laws.
//!
//! The central contracts - reverse-order release, exactly-once release, and
//! full failure collection - must hold for any number of entries and any
//! pattern of failing releases, so they are checked here over generated
//! stacks rather than hand-picked cases.

use proptest::prelude::*;

use undertow::testing::{Trace, TraceResource};
use undertow::{Plain, ResourceStack};

proptest! {
    #[test]
    fn releases_run_in_exact_reverse_push_order(n in 0usize..12) {
        let trace = Trace::new();
        let mut stack = ResourceStack::new();
        for i in 0..n {
            stack
                .enter(TraceResource::new(format!("r{}", i), &trace))
                .unwrap();
        }
        stack.unwind().unwrap();

        let mut expected: Vec<String> = (0..n).map(|i| format!("enter r{}", i)).collect();
        expected.extend((0..n).rev().map(|i| format!("exit r{}", i)));
        prop_assert_eq!(trace.events(), expected);
    }

    #[test]
    fn failing_releases_never_skip_or_repeat_entries(
        fail_mask in proptest::collection::vec(any::<bool>(), 0..10),
    ) {
        let n = fail_mask.len();
        let trace = Trace::new();
        let mut stack = ResourceStack::new();
        for (i, fail) in fail_mask.iter().enumerate() {
            let mut resource = TraceResource::new(format!("r{}", i), &trace);
            if *fail {
                resource = resource.fail_on_exit();
            }
            stack.enter(resource).unwrap();
        }

        let result = stack.unwind();

        // every entry released exactly once, top of stack first
        let exits: Vec<String> = trace.events()[n..].to_vec();
        prop_assert_eq!(exits.len(), n);
        for (offset, i) in (0..n).rev().enumerate() {
            prop_assert!(exits[offset].starts_with(&format!("exit r{}", i)), "exit order mismatch");
        }

        // every requested failure present, in release order
        let expected_failures: Vec<String> = (0..n)
            .rev()
            .filter(|i| fail_mask[*i])
            .map(|i| format!("exit r{} failed", i))
            .collect();
        match result {
            Ok(()) => prop_assert!(expected_failures.is_empty()),
            Err(err) => {
                prop_assert!(err.primary().is_none());
                prop_assert_eq!(err.release_failures().to_vec(), expected_failures);
            }
        }
    }

    #[test]
    fn checkpoints_bound_the_unwind(outer in 0usize..6, inner in 0usize..6) {
        let trace = Trace::new();
        let mut stack = ResourceStack::new();
        for i in 0..outer {
            stack
                .enter(TraceResource::new(format!("o{}", i), &trace))
                .unwrap();
        }

        let mut scope = stack.scope();
        prop_assert_eq!(scope.checkpoint(), outer);
        for i in 0..inner {
            scope
                .enter(TraceResource::new(format!("i{}", i), &trace))
                .unwrap();
        }
        scope.close().unwrap();

        prop_assert_eq!(stack.len(), outer);
        let exits: Vec<String> = trace
            .events()
            .into_iter()
            .filter(|e| e.starts_with("exit"))
            .collect();
        let expected: Vec<String> = (0..inner).rev().map(|i| format!("exit i{}", i)).collect();
        prop_assert_eq!(exits, expected);

        // the outer entries still release later, also in reverse
        stack.unwind().unwrap();
        let outer_exits: Vec<String> = trace
            .events()
            .into_iter()
            .filter(|e| e.starts_with("exit o"))
            .collect();
        let expected_outer: Vec<String> =
            (0..outer).rev().map(|i| format!("exit o{}", i)).collect();
        prop_assert_eq!(outer_exits, expected_outer);
    }

    #[test]
    fn repeated_unwind_releases_each_entry_at_most_once(n in 0usize..8) {
        let trace = Trace::new();
        let mut stack = ResourceStack::new();
        for i in 0..n {
            stack
                .enter(TraceResource::new(format!("r{}", i), &trace))
                .unwrap();
        }

        stack.unwind().unwrap();
        stack.unwind().unwrap();

        let exit_count = trace
            .events()
            .iter()
            .filter(|e| e.starts_with("exit"))
            .count();
        prop_assert_eq!(exit_count, n);
    }

    #[test]
    fn reads_return_values_in_push_order(
        values in proptest::collection::vec(any::<u32>(), 0..16),
    ) {
        let mut stack = ResourceStack::<u32, String>::new();
        for v in &values {
            let recorded = *stack.push(Plain(*v)).unwrap();
            prop_assert_eq!(recorded, *v);
        }

        prop_assert_eq!(stack.len(), values.len());
        for (i, v) in values.iter().enumerate() {
            prop_assert_eq!(stack.get(i), Some(v));
        }
        let collected: Vec<u32> = stack.values().copied().collect();
        prop_assert_eq!(collected, values.clone());
        let sliced: Vec<u32> = stack
            .slice(..)
            .unwrap()
            .into_iter()
            .copied()
            .collect();
        prop_assert_eq!(sliced, values);
    }

    #[test]
    fn failed_push_never_disturbs_recorded_entries(
        good in 0usize..6,
    ) {
        let trace = Trace::new();
        let mut stack = ResourceStack::new();
        for i in 0..good {
            stack
                .enter(TraceResource::new(format!("r{}", i), &trace))
                .unwrap();
        }

        let err = stack
            .enter(TraceResource::new("bad", &trace).fail_on_enter())
            .unwrap_err();
        prop_assert!(err.acquire_error().is_some());
        prop_assert_eq!(stack.len(), good);

        stack.unwind().unwrap();
        let exits: Vec<String> = trace
            .events()
            .into_iter()
            .filter(|e| e.starts_with("exit"))
            .collect();
        let expected: Vec<String> = (0..good).rev().map(|i| format!("exit r{}", i)).collect();
        prop_assert_eq!(exits, expected);
    }
}
