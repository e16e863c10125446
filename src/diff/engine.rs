//! The deep compare engine.
//!
//! Comparison is a simultaneous recursive walk over both values. Shape
//! dispatch is preceded by a visited-pair lookup, so cyclic and shared
//! structures terminate with [`ReferenceDiff`] nodes instead of recursing
//! forever. All work happens on a [`CompareState`] owned by the call; the
//! engine keeps no process-wide state.

use tracing::debug;

use crate::diff::engine_matching::{match_keys, CommonPair, KeySegmentKind};
use crate::diff::options::DiffOptions;
use crate::diff::path::PathSegment;
use crate::diff::result::{
    ArrayDiff, AtomicDiff, Difference, MapDiff, Membership, ObjectDiff, ReferenceDiff, SetDiff,
};
use crate::diff::state::CompareState;
use crate::error::{DeepDiffError, Result};
use crate::model::{same_value, ArrayRef, MapRef, ObjectRef, SetRef, Shape, Value};

/// Deep-compare two values with default options.
///
/// # Errors
///
/// Fails when nesting exceeds the configured depth cap.
pub fn compare(value1: &Value, value2: &Value) -> Result<Difference> {
    compare_with(value1, value2, &DiffOptions::default())
}

/// Deep-compare two values.
///
/// # Errors
///
/// Fails on invalid options or when nesting exceeds `max_depth`.
pub fn compare_with(
    value1: &Value,
    value2: &Value,
    options: &DiffOptions,
) -> Result<Difference> {
    options.validate()?;
    debug!(
        omit_equal = options.omit_equal,
        require_same_class = options.require_same_class,
        "starting deep compare"
    );
    let mut state = CompareState::new();
    compare_inner(value1, value2, options, &mut state)
}

/// One recursion step: depth bookkeeping around the dispatch. Also the
/// re-entry point for speculative key matching.
pub(crate) fn compare_inner(
    value1: &Value,
    value2: &Value,
    options: &DiffOptions,
    state: &mut CompareState,
) -> Result<Difference> {
    state.depth += 1;
    let result = compare_dispatch(value1, value2, options, state);
    state.depth -= 1;
    result
}

fn compare_dispatch(
    value1: &Value,
    value2: &Value,
    options: &DiffOptions,
    state: &mut CompareState,
) -> Result<Difference> {
    if state.depth > options.max_depth {
        return Err(DeepDiffError::too_deep(options.max_depth, state.path_display()));
    }

    // Cycle check comes before shape dispatch: re-entering a visited pair
    // must not recurse again, whatever the shapes are.
    let visit1 = state.visited1_of(value1).cloned();
    let visit2 = state.visited2_of(value2).cloned();
    match (visit1, visit2) {
        (Some(info1), Some(info2)) if info1.id == info2.id => {
            return Ok(Difference::Reference(ReferenceDiff {
                ref1: Some(info1.id),
                ref2: Some(info2.id),
                path1: Some(info1.path),
                path2: Some(info2.path),
                same: true,
            }));
        }
        (None, None) => {}
        // one side re-enters, or both do but out of step: the graphs wire
        // their references differently
        (info1, info2) => {
            return Ok(Difference::Reference(ReferenceDiff {
                ref1: info1.as_ref().map(|info| info.id),
                ref2: info2.as_ref().map(|info| info.id),
                path1: info1.map(|info| info.path),
                path2: info2.map(|info| info.path),
                same: false,
            }));
        }
    }

    if Shape::of(value1) != Shape::of(value2) {
        return Ok(Difference::Atomic(AtomicDiff::both(
            value1.clone(),
            value2.clone(),
            false,
        )));
    }

    match (value1, value2) {
        (Value::Array(items1), Value::Array(items2)) => {
            state.mark_visited(value1, value2);
            compare_arrays(value1, value2, items1, items2, options, state)
        }
        (Value::Object(obj1), Value::Object(obj2)) => {
            if options.require_same_class && value1.class_name() != value2.class_name() {
                return Ok(Difference::Atomic(AtomicDiff::both(
                    value1.clone(),
                    value2.clone(),
                    false,
                )));
            }
            state.mark_visited(value1, value2);
            compare_objects(value1, value2, obj1, obj2, options, state)
        }
        (Value::Set(items1), Value::Set(items2)) => {
            state.mark_visited(value1, value2);
            compare_sets(value1, value2, items1, items2, options, state)
        }
        (Value::Map(entries1), Value::Map(entries2)) => {
            state.mark_visited(value1, value2);
            compare_maps(value1, value2, entries1, entries2, options, state)
        }
        _ => Ok(Difference::Atomic(AtomicDiff::both(
            value1.clone(),
            value2.clone(),
            same_value(value1, value2),
        ))),
    }
}

fn compare_arrays(
    value1: &Value,
    value2: &Value,
    items1: &ArrayRef,
    items2: &ArrayRef,
    options: &DiffOptions,
    state: &mut CompareState,
) -> Result<Difference> {
    let arr1 = items1.borrow();
    let arr2 = items2.borrow();
    let min_len = arr1.len().min(arr2.len());
    let max_len = arr1.len().max(arr2.len());
    let mut diff = ArrayDiff::new(value1.clone(), value2.clone(), arr1.len(), arr2.len());

    for index in 0..min_len {
        state.push(PathSegment::ArrayIndex(index));
        let child = compare_inner(&arr1[index], &arr2[index], options, state);
        state.pop();
        let child = child?;

        if options.omit_equal && child.same() {
            continue;
        }
        if !state.try_record_entry(options.max_differences) {
            let mut diff = Difference::Array(diff);
            diff.mark_truncated();
            return Ok(diff);
        }
        diff.add_comparison(index, child);
    }

    // trailing delta exists on the longer side only
    let from_side1 = arr1.len() == max_len;
    for index in min_len..max_len {
        if !state.try_record_entry(options.max_differences) {
            let mut diff = Difference::Array(diff);
            diff.mark_truncated();
            return Ok(diff);
        }
        let entry = if from_side1 {
            AtomicDiff::only1(arr1[index].clone())
        } else {
            AtomicDiff::only2(arr2[index].clone())
        };
        diff.add_comparison(index, Difference::Atomic(entry));
    }

    Ok(Difference::Array(diff))
}

fn compare_objects(
    value1: &Value,
    value2: &Value,
    obj1: &ObjectRef,
    obj2: &ObjectRef,
    options: &DiffOptions,
    state: &mut CompareState,
) -> Result<Difference> {
    let obj1 = obj1.borrow();
    let obj2 = obj2.borrow();
    // keys travel as string values through the shared matcher
    let keys1: Vec<Value> = obj1.entries.keys().map(|k| Value::str(k.clone())).collect();
    let keys2: Vec<Value> = obj2.entries.keys().map(|k| Value::str(k.clone())).collect();
    let matched = match_keys(
        &keys1,
        &keys2,
        false,
        KeySegmentKind::ObjectKey,
        options,
        state,
    )?;

    let mut diff = ObjectDiff::new(value1.clone(), value2.clone());

    for pair in &matched.common {
        let key = expect_string_key(&pair.el1)?;
        let val1 = object_value(&obj1.entries, key)?;
        let val2 = object_value(&obj2.entries, key)?;

        state.push(PathSegment::ObjectKey(key.to_string()));
        let child = compare_inner(val1, val2, options, state);
        state.pop();
        let child = child?;

        if options.omit_equal && child.same() {
            continue;
        }
        if !state.try_record_entry(options.max_differences) {
            let mut diff = Difference::Object(diff);
            diff.mark_truncated();
            return Ok(diff);
        }
        diff.add_comparison(key, child);
    }

    for key_value in &matched.only_in_1 {
        if !state.try_record_entry(options.max_differences) {
            let mut diff = Difference::Object(diff);
            diff.mark_truncated();
            return Ok(diff);
        }
        let key = expect_string_key(key_value)?;
        let val1 = object_value(&obj1.entries, key)?;
        diff.add_comparison(key, Difference::Atomic(AtomicDiff::only1(val1.clone())));
    }

    for key_value in &matched.only_in_2 {
        if !state.try_record_entry(options.max_differences) {
            let mut diff = Difference::Object(diff);
            diff.mark_truncated();
            return Ok(diff);
        }
        let key = expect_string_key(key_value)?;
        let val2 = object_value(&obj2.entries, key)?;
        diff.add_comparison(key, Difference::Atomic(AtomicDiff::only2(val2.clone())));
    }

    Ok(Difference::Object(diff))
}

fn compare_sets(
    value1: &Value,
    value2: &Value,
    items1: &SetRef,
    items2: &SetRef,
    options: &DiffOptions,
    state: &mut CompareState,
) -> Result<Difference> {
    let set1 = items1.borrow();
    let set2 = items2.borrow();
    let matched = match_keys(
        &set1,
        &set2,
        true,
        KeySegmentKind::SetElement,
        options,
        state,
    )?;

    let mut diff = SetDiff::new(value1.clone(), value2.clone(), set1.len(), set2.len());

    for pair in matched.common {
        let child = structural_difference(pair)?;
        if options.omit_equal && child.same() {
            continue;
        }
        if !state.try_record_entry(options.max_differences) {
            let mut diff = Difference::Set(diff);
            diff.mark_truncated();
            return Ok(diff);
        }
        diff.add_comparison(Membership::Common, child);
    }

    for element in matched.only_in_1 {
        if !state.try_record_entry(options.max_differences) {
            let mut diff = Difference::Set(diff);
            diff.mark_truncated();
            return Ok(diff);
        }
        diff.add_comparison(
            Membership::OnlyIn1,
            Difference::Atomic(AtomicDiff::only1(element)),
        );
    }

    for element in matched.only_in_2 {
        if !state.try_record_entry(options.max_differences) {
            let mut diff = Difference::Set(diff);
            diff.mark_truncated();
            return Ok(diff);
        }
        diff.add_comparison(
            Membership::OnlyIn2,
            Difference::Atomic(AtomicDiff::only2(element)),
        );
    }

    Ok(Difference::Set(diff))
}

fn compare_maps(
    value1: &Value,
    value2: &Value,
    entries1: &MapRef,
    entries2: &MapRef,
    options: &DiffOptions,
    state: &mut CompareState,
) -> Result<Difference> {
    let map1 = entries1.borrow();
    let map2 = entries2.borrow();
    let keys1: Vec<Value> = map1.iter().map(|(k, _)| k.clone()).collect();
    let keys2: Vec<Value> = map2.iter().map(|(k, _)| k.clone()).collect();
    let matched = match_keys(&keys1, &keys2, true, KeySegmentKind::MapKey, options, state)?;

    let mut diff = MapDiff::new(value1.clone(), value2.clone(), map1.len(), map2.len());

    for pair in matched.common {
        let val1 = map_value(&map1, &pair.el1)?.clone();
        let val2 = map_value(&map2, &pair.el2)?.clone();
        let key_segment = pair.el1.clone();
        let key_difference = structural_difference(pair)?;

        state.push(PathSegment::MapKey(key_segment));
        let value_difference = compare_inner(&val1, &val2, options, state);
        state.pop();
        let value_difference = value_difference?;

        if options.omit_equal && key_difference.same() && value_difference.same() {
            continue;
        }
        if !state.try_record_entry(options.max_differences) {
            let mut diff = Difference::Map(diff);
            diff.mark_truncated();
            return Ok(diff);
        }
        diff.add_comparison(Membership::Common, key_difference, value_difference);
    }

    for key in matched.only_in_1 {
        if !state.try_record_entry(options.max_differences) {
            let mut diff = Difference::Map(diff);
            diff.mark_truncated();
            return Ok(diff);
        }
        let val1 = map_value(&map1, &key)?.clone();
        diff.add_comparison(
            Membership::OnlyIn1,
            Difference::Atomic(AtomicDiff::only1(key)),
            Difference::Atomic(AtomicDiff::only1(val1)),
        );
    }

    for key in matched.only_in_2 {
        if !state.try_record_entry(options.max_differences) {
            let mut diff = Difference::Map(diff);
            diff.mark_truncated();
            return Ok(diff);
        }
        let val2 = map_value(&map2, &key)?.clone();
        diff.add_comparison(
            Membership::OnlyIn2,
            Difference::Atomic(AtomicDiff::only2(key)),
            Difference::Atomic(AtomicDiff::only2(val2)),
        );
    }

    Ok(Difference::Map(diff))
}

// ============================================================================
// Lookup helpers
// ============================================================================

fn expect_string_key(key: &Value) -> Result<&str> {
    key.as_str().ok_or_else(|| {
        DeepDiffError::compare_invariant(format!("object key is not a string: {key:?}"))
    })
}

fn object_value<'e>(
    entries: &'e indexmap::IndexMap<String, Value>,
    key: &str,
) -> Result<&'e Value> {
    entries.get(key).ok_or_else(|| {
        DeepDiffError::compare_invariant(format!("object key {key:?} vanished mid-comparison"))
    })
}

fn map_value<'e>(entries: &'e [(Value, Value)], key: &Value) -> Result<&'e Value> {
    entries
        .iter()
        .find(|(k, _)| same_value(k, key))
        .map(|(_, v)| v)
        .ok_or_else(|| {
            DeepDiffError::compare_invariant(format!("map key {key:?} vanished mid-comparison"))
        })
}

fn structural_difference(pair: CommonPair) -> Result<Difference> {
    pair.difference.ok_or_else(|| {
        DeepDiffError::compare_invariant("structurally matched pair carries no comparison")
    })
}
