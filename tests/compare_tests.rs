//! Integration tests for the compare engine.

use deepdiff::diff::{ArrayDiff, AtomicDiff, ObjectDiff};
use deepdiff::error::CompareErrorKind;
use deepdiff::{
    compare, compare_with, DeepDiffError, DiffOptions, DiffType, Difference, Membership, Value,
};

fn unwrap_array(diff: Difference) -> ArrayDiff {
    match diff {
        Difference::Array(array) => array,
        other => panic!("expected array diff, got {other:?}"),
    }
}

fn unwrap_object(diff: Difference) -> ObjectDiff {
    match diff {
        Difference::Object(object) => object,
        other => panic!("expected object diff, got {other:?}"),
    }
}

mod primitives {
    use super::*;

    #[test]
    fn equal_and_unequal_numbers() {
        assert!(compare(&Value::Int(7), &Value::Int(7)).unwrap().same());
        assert!(!compare(&Value::Int(7), &Value::Int(8)).unwrap().same());
        assert!(compare(&Value::Int(1), &Value::Float(1.0)).unwrap().same());
    }

    #[test]
    fn nan_and_signed_zero() {
        let nan = Value::Float(f64::NAN);
        assert!(compare(&nan, &nan.clone()).unwrap().same());
        assert!(compare(&Value::Float(0.0), &Value::Float(-0.0)).unwrap().same());
    }

    #[test]
    fn null_and_undefined_are_distinct() {
        assert!(!compare(&Value::Null, &Value::Undefined).unwrap().same());
        assert!(compare(&Value::Null, &Value::Null).unwrap().same());
    }

    #[test]
    fn dates_compare_by_epoch_millis() {
        assert!(compare(&Value::date(1000), &Value::date(1000)).unwrap().same());
        assert!(!compare(&Value::date(1000), &Value::date(1001)).unwrap().same());
    }

    #[test]
    fn regexes_compare_by_source_and_flags() {
        assert!(compare(&Value::regex("a+", "gi"), &Value::regex("a+", "ig"))
            .unwrap()
            .same());
        assert!(!compare(&Value::regex("a+", "g"), &Value::regex("a+", "gi"))
            .unwrap()
            .same());
        assert!(!compare(&Value::regex("a+", "g"), &Value::regex("b+", "g"))
            .unwrap()
            .same());
    }

    #[test]
    fn functions_compare_by_identity() {
        let f = Value::func("handler");
        assert!(compare(&f, &f.clone()).unwrap().same());
        assert!(!compare(&f, &Value::func("handler")).unwrap().same());
    }

    #[test]
    fn shape_mismatch_is_an_atomic_difference() {
        let diff = compare(&Value::Int(1), &Value::str("1")).unwrap();
        assert!(!diff.same());
        assert!(matches!(diff, Difference::Atomic(AtomicDiff { .. })));

        let diff = compare(&Value::array([]), &Value::object([])).unwrap();
        assert!(matches!(diff, Difference::Atomic(_)));
    }
}

mod arrays {
    use super::*;

    #[test]
    fn positional_comparison_records_every_index() {
        let a = Value::array([Value::Int(1), Value::Int(2)]);
        let b = Value::array([Value::Int(1), Value::Int(3)]);
        let array = unwrap_array(compare(&a, &b).unwrap());

        assert!(!array.same);
        assert_eq!(array.entries.len(), 2);
        assert!(array.entries[0].difference.same());
        assert!(!array.entries[1].difference.same());
    }

    #[test]
    fn length_mismatch_yields_one_sided_tail_entries() {
        let a = Value::array([Value::Int(1)]);
        let b = Value::array([Value::Int(1), Value::Int(2), Value::Int(3)]);
        let array = unwrap_array(compare(&a, &b).unwrap());

        assert!(!array.same);
        assert_eq!((array.len1, array.len2), (1, 3));
        assert_eq!(array.entries.len(), 3);
        assert_eq!(array.entries[1].difference.diff_type(), DiffType::OnlyIn2);
        assert_eq!(array.entries[2].difference.diff_type(), DiffType::OnlyIn2);
    }

    #[test]
    fn empty_arrays_are_equal() {
        let array = unwrap_array(compare(&Value::array([]), &Value::array([])).unwrap());
        assert!(array.same);
        assert!(array.entries.is_empty());
    }
}

mod objects {
    use super::*;

    #[test]
    fn common_keys_then_exclusives() {
        let a = Value::object([
            ("shared", Value::Int(1)),
            ("left", Value::Int(2)),
        ]);
        let b = Value::object([
            ("right", Value::Int(3)),
            ("shared", Value::Int(1)),
        ]);
        let object = unwrap_object(compare(&a, &b).unwrap());

        let keys: Vec<&str> = object.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["shared", "left", "right"]);
        assert_eq!(object.entries[1].difference.diff_type(), DiffType::OnlyIn1);
        assert_eq!(object.entries[2].difference.diff_type(), DiffType::OnlyIn2);
    }

    #[test]
    fn nested_structures() {
        let a = Value::object([(
            "config",
            Value::object([("retries", Value::Int(3))]),
        )]);
        let b = Value::object([(
            "config",
            Value::object([("retries", Value::Int(5))]),
        )]);
        let object = unwrap_object(compare(&a, &b).unwrap());
        assert!(!object.same);
        let nested = match &object.entries[0].difference {
            Difference::Object(nested) => nested,
            other => panic!("expected nested object diff, got {other:?}"),
        };
        assert!(!nested.entries[0].difference.same());
    }

    #[test]
    fn class_names_are_cosmetic_by_default() {
        let a = Value::object_with_class("Point", [("x", Value::Int(1))]);
        let b = Value::object([("x", Value::Int(1))]);
        let object = unwrap_object(compare(&a, &b).unwrap());
        assert!(object.same);
        assert_eq!(object.class_name1.as_deref(), Some("Point"));
        assert_eq!(object.class_name2, None);
    }
}

mod collections {
    use super::*;

    #[test]
    fn set_elements_match_structurally_across_allocations() {
        let a = Value::set([
            Value::Int(1),
            Value::object([("id", Value::str("x"))]),
        ]);
        let b = Value::set([
            Value::object([("id", Value::str("x"))]),
            Value::Int(1),
        ]);
        assert!(compare(&a, &b).unwrap().same());
    }

    #[test]
    fn set_exclusive_elements_are_reported_with_membership() {
        let a = Value::set([Value::Int(1), Value::Int(2)]);
        let b = Value::set([Value::Int(2), Value::Int(3)]);
        let Difference::Set(set) = compare(&a, &b).unwrap() else {
            panic!("expected set diff");
        };

        assert!(!set.same);
        let memberships: Vec<Membership> = set.entries.iter().map(|e| e.membership).collect();
        assert_eq!(
            memberships,
            [Membership::Common, Membership::OnlyIn1, Membership::OnlyIn2]
        );
    }

    #[test]
    fn duplicate_set_elements_claim_one_candidate_each() {
        let a = Value::set([
            Value::object([("k", Value::Int(1))]),
            Value::object([("k", Value::Int(1))]),
        ]);
        let b = Value::set([Value::object([("k", Value::Int(1))])]);
        let Difference::Set(set) = compare(&a, &b).unwrap() else {
            panic!("expected set diff");
        };

        assert!(!set.same);
        let common = set
            .entries
            .iter()
            .filter(|e| e.membership == Membership::Common)
            .count();
        assert_eq!(common, 1);
    }

    #[test]
    fn map_keys_match_structurally_and_values_are_compared() {
        let a = Value::map([(Value::object([("id", Value::Int(1))]), Value::str("old"))]);
        let b = Value::map([(Value::object([("id", Value::Int(1))]), Value::str("new"))]);
        let Difference::Map(map) = compare(&a, &b).unwrap() else {
            panic!("expected map diff");
        };

        assert!(!map.same);
        assert_eq!(map.entries[0].membership, Membership::Common);
        assert!(map.entries[0].key_difference.same());
        assert!(!map.entries[0].value_difference.same());
    }

    #[test]
    fn map_exclusive_keys_carry_their_values() {
        let a = Value::map([(Value::str("gone"), Value::Int(1))]);
        let b = Value::map([]);
        let Difference::Map(map) = compare(&a, &b).unwrap() else {
            panic!("expected map diff");
        };

        assert_eq!(map.entries.len(), 1);
        assert_eq!(map.entries[0].membership, Membership::OnlyIn1);
        assert_eq!(map.entries[0].value_difference.diff_type(), DiffType::OnlyIn1);
    }
}

mod cycles {
    use super::*;

    fn self_cycle() -> Value {
        let value = Value::object([]);
        value
            .as_object()
            .expect("object")
            .borrow_mut()
            .entries
            .insert("next".into(), value.clone());
        value
    }

    #[test]
    fn matching_self_cycles_are_equal() {
        let diff = compare(&self_cycle(), &self_cycle()).unwrap();
        assert!(diff.same());
    }

    #[test]
    fn a_cyclic_value_equals_itself() {
        // reflexivity must hold for self-referencing input, not just trees
        let value = self_cycle();
        let diff = compare(&value, &value.clone()).unwrap();
        assert!(diff.same());
    }

    #[test]
    fn shared_acyclic_references_still_compare() {
        let shared = Value::object([("v", Value::Int(1))]);
        let a = Value::array([shared.clone(), shared.clone()]);
        let b = Value::array([
            Value::object([("v", Value::Int(1))]),
            Value::object([("v", Value::Int(1))]),
        ]);
        // side 1 reuses one allocation, side 2 does not: reference wiring differs
        let diff = compare(&a, &b).unwrap();
        assert!(!diff.same());
    }

    #[test]
    fn mismatched_cycle_depth_differs() {
        let a = self_cycle();
        let inner = self_cycle();
        let b = Value::object([("next", inner)]);
        assert!(!compare(&a, &b).unwrap().same());
    }

    #[test]
    fn mutual_cycles_are_equal() {
        let a1 = Value::object([]);
        let a2 = Value::object([("back", a1.clone())]);
        a1.as_object()
            .expect("object")
            .borrow_mut()
            .entries
            .insert("fwd".into(), a2.clone());

        let b1 = Value::object([]);
        let b2 = Value::object([("back", b1.clone())]);
        b1.as_object()
            .expect("object")
            .borrow_mut()
            .entries
            .insert("fwd".into(), b2.clone());

        assert!(compare(&a1, &b1).unwrap().same());
    }

    #[test]
    fn cyclic_sets_terminate() {
        let a = Value::set([]);
        a.as_set().expect("set").borrow_mut().push(a.clone());
        let b = Value::set([]);
        b.as_set().expect("set").borrow_mut().push(b.clone());
        // must terminate; the speculative matcher re-enters the visited pair
        let diff = compare(&a, &b).unwrap();
        assert!(diff.same());
    }

    #[test]
    fn cyclic_arrays_and_maps_terminate() {
        let a = Value::array([]);
        a.as_array().expect("array").borrow_mut().push(a.clone());
        let b = Value::array([]);
        b.as_array().expect("array").borrow_mut().push(b.clone());
        assert!(compare(&a, &b).unwrap().same());

        let m1 = Value::map([]);
        m1.as_map()
            .expect("map")
            .borrow_mut()
            .push((Value::str("loop"), m1.clone()));
        let m2 = Value::map([]);
        m2.as_map()
            .expect("map")
            .borrow_mut()
            .push((Value::str("loop"), m2.clone()));
        assert!(compare(&m1, &m2).unwrap().same());
    }
}

mod options {
    use super::*;

    #[test]
    fn omit_equal_keeps_only_differing_entries() {
        let a = Value::array([Value::Int(1), Value::Int(2), Value::Int(3)]);
        let b = Value::array([Value::Int(1), Value::Int(9), Value::Int(3)]);

        let options = DiffOptions::default().omit_equal(true);
        let array = unwrap_array(compare_with(&a, &b, &options).unwrap());
        assert_eq!(array.entries.len(), 1);
        assert_eq!(array.entries[0].index, 1);
    }

    #[test]
    fn omitted_entries_do_not_consume_the_budget() {
        let a = Value::array([Value::Int(1), Value::Int(1), Value::Int(1), Value::Int(9)]);
        let b = Value::array([Value::Int(1), Value::Int(1), Value::Int(1), Value::Int(8)]);

        let options = DiffOptions::default().omit_equal(true).max_differences(1);
        let array = unwrap_array(compare_with(&a, &b, &options).unwrap());
        assert!(!array.truncated, "equal entries must not eat the budget");
        assert_eq!(array.entries.len(), 1);
        assert_eq!(array.entries[0].index, 3);
    }

    #[test]
    fn require_same_class_rejects_different_classes() {
        let a = Value::object_with_class("Point", [("x", Value::Int(1))]);
        let b = Value::object_with_class("Vector", [("x", Value::Int(1))]);

        let options = DiffOptions::default().require_same_class(true);
        let diff = compare_with(&a, &b, &options).unwrap();
        assert!(!diff.same());
        assert!(matches!(diff, Difference::Atomic(_)));

        // same class still compares structurally
        let c = Value::object_with_class("Point", [("x", Value::Int(2))]);
        let diff = compare_with(&a, &c, &options).unwrap();
        assert!(matches!(diff, Difference::Object(_)));
    }

    #[test]
    fn budget_is_shared_across_the_whole_traversal() {
        let a = Value::object([
            ("xs", Value::array((0..5).map(Value::Int))),
            ("ys", Value::array((0..5).map(Value::Int))),
        ]);
        let b = Value::object([
            ("xs", Value::array((5..10).map(Value::Int))),
            ("ys", Value::array((5..10).map(Value::Int))),
        ]);

        let options = DiffOptions::default().max_differences(4);
        let diff = compare_with(&a, &b, &options).unwrap();
        assert!(diff.truncated() || {
            // truncation may land inside a child container instead
            let object = unwrap_object(diff);
            object.entries.iter().any(|e| e.difference.truncated())
        });
    }

    #[test]
    fn truncated_containers_never_report_same() {
        let a = Value::array((0..10).map(Value::Int));
        let options = DiffOptions::default().max_differences(3);
        let array = unwrap_array(compare_with(&a.clone(), &a, &options).unwrap());
        assert!(array.truncated);
        assert!(!array.same, "unexamined entries may differ");
    }

    #[test]
    fn zero_caps_are_rejected_up_front() {
        let err = compare_with(
            &Value::Int(1),
            &Value::Int(1),
            &DiffOptions::default().max_differences(0),
        );
        assert!(matches!(err, Err(DeepDiffError::Config(_))));
    }

    #[test]
    fn excessive_depth_is_an_error() {
        let mut value = Value::Int(0);
        for _ in 0..32 {
            value = Value::array([value]);
        }

        let options = DiffOptions::default().max_depth(8);
        let err = compare_with(&value.clone(), &value, &options);
        match err {
            Err(DeepDiffError::Compare {
                source: CompareErrorKind::TooDeep { max_depth, .. },
                ..
            }) => assert_eq!(max_depth, 8),
            other => panic!("expected depth error, got {other:?}"),
        }
    }

    #[test]
    fn options_roundtrip_through_serde() {
        let options = DiffOptions::default().omit_equal(true).max_depth(64);
        let json = serde_json::to_string(&options).unwrap();
        let back: DiffOptions = serde_json::from_str(&json).unwrap();
        assert!(back.omit_equal);
        assert_eq!(back.max_depth, 64);

        // missing fields fall back to defaults
        let sparse: DiffOptions = serde_json::from_str("{\"omit_equal\":true}").unwrap();
        assert!(sparse.omit_equal);
        assert_eq!(sparse.max_depth, DiffOptions::default().max_depth);
    }
}

#[test]
fn difference_tree_exposes_recorded_entries() {
    let a = Value::object([("n", Value::Int(1))]);
    let b = Value::object([("n", Value::Int(2))]);
    let diff = compare(&a, &b).unwrap();

    let object = unwrap_object(diff);
    assert_eq!(object.entries.len(), 1);
    match &object.entries[0].difference {
        Difference::Atomic(atomic) => {
            assert_eq!(atomic.diff_type(), DiffType::Both);
            assert!(!atomic.same);
        }
        other => panic!("expected atomic entry, got {other:?}"),
    }
}
