//! Key/element matching for unordered collections.

use tracing::trace;

use crate::diff::engine::compare_inner;
use crate::diff::options::DiffOptions;
use crate::diff::path::PathSegment;
use crate::diff::result::{AtomicDiff, Difference};
use crate::diff::state::CompareState;
use crate::error::Result;
use crate::model::{same_value, Value};

/// Which path segment the fallback scan records for candidate pairings.
#[derive(Debug, Clone, Copy)]
pub(crate) enum KeySegmentKind {
    ObjectKey,
    MapKey,
    SetElement,
}

impl KeySegmentKind {
    fn segment(self, candidate: &Value) -> PathSegment {
        match self {
            Self::MapKey => PathSegment::MapKey(candidate.clone()),
            Self::SetElement => PathSegment::SetElement(candidate.clone()),
            Self::ObjectKey => {
                PathSegment::ObjectKey(candidate.as_str().unwrap_or_default().to_string())
            }
        }
    }
}

/// A matched key/element pair. `difference` is present when the pairing was
/// established (or confirmed) structurally.
#[derive(Debug)]
pub(crate) struct CommonPair {
    pub el1: Value,
    pub el2: Value,
    pub difference: Option<Difference>,
}

/// Result of partitioning two key/element collections.
#[derive(Debug)]
pub(crate) struct KeyMatch {
    pub common: Vec<CommonPair>,
    pub only_in_1: Vec<Value>,
    pub only_in_2: Vec<Value>,
}

/// Partition two key/element collections into common pairs and exclusives.
///
/// First pass per element: identity/equality lookup (covers primitives and
/// shared references). When that fails and `structural_fallback` is set, the
/// remaining unmatched side-2 elements are scanned linearly with a full deep
/// compare per candidate, inside a speculative state that is committed only
/// for the winning pairing.
///
/// The fallback is O(n·m) in the worst case. That is a known scalability
/// ceiling, accepted for the small assertion payloads this engine targets;
/// hashing by structural equality over arbitrary graphs is out of scope.
pub(crate) fn match_keys(
    keys1: &[Value],
    keys2: &[Value],
    structural_fallback: bool,
    segment_kind: KeySegmentKind,
    options: &DiffOptions,
    state: &mut CompareState,
) -> Result<KeyMatch> {
    let mut common = Vec::new();
    let mut only_in_1 = Vec::new();
    let mut only_in_2: Vec<Value> = keys2.to_vec();

    'items: for item1 in keys1 {
        if let Some(position) = only_in_2.iter().position(|k| same_value(item1, k)) {
            let el2 = only_in_2.remove(position);
            common.push(CommonPair {
                el1: item1.clone(),
                el2,
                difference: structural_fallback.then(|| {
                    Difference::Atomic(AtomicDiff::both(item1.clone(), item1.clone(), true))
                }),
            });
            continue;
        }

        if structural_fallback {
            trace!(candidates = only_in_2.len(), "structural fallback scan");
            for position in 0..only_in_2.len() {
                let item2 = only_in_2[position].clone();
                let mut speculation = state.speculate();
                speculation.push(segment_kind.segment(&item2));

                let difference = compare_inner(item1, &item2, options, &mut speculation)?;
                if difference.same() {
                    state.commit(speculation);
                    only_in_2.remove(position);
                    common.push(CommonPair {
                        el1: item1.clone(),
                        el2: item2,
                        difference: Some(difference),
                    });
                    continue 'items;
                }
                // speculation dropped: rejected pairing leaves no trace
            }
        }

        only_in_1.push(item1.clone());
    }

    Ok(KeyMatch {
        common,
        only_in_1,
        only_in_2,
    })
}
