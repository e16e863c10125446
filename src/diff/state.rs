//! Per-traversal compare state: cycle tracking, paths, and speculation.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use crate::diff::path::{display_path, PathSegment};
use crate::model::Value;

/// Registration of a visited pair: the shared cycle-linkage id and the path
/// at which the pair was first entered.
#[derive(Debug, Clone)]
pub struct VisitInfo {
    pub id: u32,
    pub path: Vec<PathSegment>,
}

/// Mutable context for one top-level compare call.
///
/// Both sides of every compared container pair are stamped with the same
/// freshly allocated id before recursion, so a child that transitively
/// refers back to either value is detected as a cycle re-entry. The id
/// counter is owned here, never process-wide.
#[derive(Debug, Clone)]
pub struct CompareState {
    id_source: u32,
    pub(crate) depth: usize,
    entries_recorded: usize,
    key_path: Vec<PathSegment>,
    visited1: HashMap<usize, VisitInfo>,
    visited2: HashMap<usize, VisitInfo>,
}

impl CompareState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id_source: 0,
            depth: 0,
            entries_recorded: 0,
            key_path: Vec::new(),
            visited1: HashMap::new(),
            visited2: HashMap::new(),
        }
    }

    /// Stamp both sides of a container pair with one fresh id and the
    /// current path snapshot. Must be called exactly once per compared pair,
    /// before recursing into children.
    pub(crate) fn mark_visited(&mut self, v1: &Value, v2: &Value) -> u32 {
        let id = self.id_source;
        self.id_source += 1;
        let info = VisitInfo {
            id,
            path: self.path_snapshot(),
        };
        if let Some(identity) = v1.identity() {
            self.visited1.insert(identity, info.clone());
        }
        if let Some(identity) = v2.identity() {
            self.visited2.insert(identity, info);
        }
        id
    }

    pub(crate) fn visited1_of(&self, value: &Value) -> Option<&VisitInfo> {
        value.identity().and_then(|id| self.visited1.get(&id))
    }

    pub(crate) fn visited2_of(&self, value: &Value) -> Option<&VisitInfo> {
        value.identity().and_then(|id| self.visited2.get(&id))
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.key_path.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.key_path.pop();
    }

    pub(crate) fn path_snapshot(&self) -> Vec<PathSegment> {
        self.key_path.clone()
    }

    pub(crate) fn path_display(&self) -> String {
        display_path(&self.key_path)
    }

    /// Consume one slot of the entry budget. Returns false once the cap is
    /// reached; callers then truncate their entry collection.
    pub(crate) fn try_record_entry(&mut self, max_differences: usize) -> bool {
        if self.entries_recorded >= max_differences {
            return false;
        }
        self.entries_recorded += 1;
        true
    }

    /// Open a speculative branch: a scratch state with copied visited maps
    /// and a reset path. Dropping the speculation rejects it; [`commit`]
    /// merges it back.
    ///
    /// The unordered-collection matcher tries many tentative element
    /// pairings; rejected pairings must not pollute the parent's cycle
    /// tracking.
    ///
    /// [`commit`]: CompareState::commit
    #[must_use]
    pub fn speculate(&self) -> Speculation {
        Speculation {
            state: Self {
                id_source: self.id_source,
                depth: self.depth,
                entries_recorded: self.entries_recorded,
                key_path: Vec::new(),
                visited1: self.visited1.clone(),
                visited2: self.visited2.clone(),
            },
        }
    }

    /// Accept a speculative branch: adopt its id counter, visited maps, and
    /// entry budget. The scratch path is discarded.
    pub fn commit(&mut self, speculation: Speculation) {
        let state = speculation.state;
        self.id_source = state.id_source;
        self.entries_recorded = state.entries_recorded;
        self.visited1 = state.visited1;
        self.visited2 = state.visited2;
    }
}

impl Default for CompareState {
    fn default() -> Self {
        Self::new()
    }
}

/// A speculative compare transaction. Dereferences to the scratch
/// [`CompareState`]; pass it to [`CompareState::commit`] to accept, or drop
/// it to reject.
#[derive(Debug)]
pub struct Speculation {
    state: CompareState,
}

impl Deref for Speculation {
    type Target = CompareState;

    fn deref(&self) -> &CompareState {
        &self.state
    }
}

impl DerefMut for Speculation {
    fn deref_mut(&mut self) -> &mut CompareState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_visited_stamps_both_sides() {
        let mut state = CompareState::new();
        let a = Value::array([]);
        let b = Value::array([]);

        let id = state.mark_visited(&a, &b);
        assert_eq!(id, 0);
        assert_eq!(state.visited1_of(&a).map(|v| v.id), Some(0));
        assert_eq!(state.visited2_of(&b).map(|v| v.id), Some(0));
        assert!(state.visited1_of(&b).is_none(), "sides are tracked apart");

        let c = Value::object([]);
        let d = Value::object([]);
        assert_eq!(state.mark_visited(&c, &d), 1, "ids are sequential");
    }

    #[test]
    fn rejected_speculation_leaves_parent_untouched() {
        let mut state = CompareState::new();
        let a = Value::array([]);
        let b = Value::array([]);

        {
            let mut speculation = state.speculate();
            speculation.mark_visited(&a, &b);
            assert!(speculation.visited1_of(&a).is_some());
            // dropped without commit
        }

        assert!(state.visited1_of(&a).is_none());
        assert!(state.visited2_of(&b).is_none());
        let id = state.mark_visited(&a, &b);
        assert_eq!(id, 0, "id counter must not advance for rejected branches");
    }

    #[test]
    fn committed_speculation_merges() {
        let mut state = CompareState::new();
        let a = Value::array([]);
        let b = Value::array([]);

        let mut speculation = state.speculate();
        speculation.mark_visited(&a, &b);
        state.commit(speculation);

        assert_eq!(state.visited1_of(&a).map(|v| v.id), Some(0));
        let c = Value::set([]);
        let d = Value::set([]);
        assert_eq!(state.mark_visited(&c, &d), 1);
    }

    #[test]
    fn speculation_resets_path_but_keeps_budget() {
        let mut state = CompareState::new();
        state.push(PathSegment::ObjectKey("a".into()));
        assert!(state.try_record_entry(2));

        let mut speculation = state.speculate();
        assert_eq!(speculation.path_display(), "");
        assert!(speculation.try_record_entry(2));
        assert!(!speculation.try_record_entry(2), "budget is shared");
        state.commit(speculation);

        assert!(!state.try_record_entry(2));
        assert_eq!(state.path_display(), ".a");
    }

    #[test]
    fn visit_info_records_path() {
        let mut state = CompareState::new();
        state.push(PathSegment::ObjectKey("outer".into()));
        state.push(PathSegment::ArrayIndex(2));

        let a = Value::map([]);
        let b = Value::map([]);
        state.mark_visited(&a, &b);

        let info = state.visited1_of(&a).expect("registered");
        assert_eq!(display_path(&info.path), ".outer[ 2 ]");
    }
}
