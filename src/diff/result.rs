//! The difference model produced by the compare engine.
//!
//! A [`Difference`] is a tree: leaves are [`AtomicDiff`] comparisons (either
//! side may be absent), internal nodes mirror the compared container shapes,
//! and [`ReferenceDiff`] marks re-entry into an already-visited pair on
//! cyclic or shared structures.
//!
//! `same` is computed bottom-up while entries are added and is monotonic:
//! once a node has seen a differing child it stays `false`. Nodes are built
//! by the engine through the `add_*` methods and never mutated afterwards.

use crate::diff::path::PathSegment;
use crate::model::Value;

/// Which sides of the comparison a node carries (derived, never stored).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffType {
    Both,
    OnlyIn1,
    OnlyIn2,
}

/// Membership of a set element or map key in the two compared collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Common,
    OnlyIn1,
    OnlyIn2,
}

/// Leaf comparison. Absence (`None`) is distinct from a present
/// `Null`/`Undefined`.
#[derive(Debug, Clone)]
pub struct AtomicDiff {
    pub value1: Option<Value>,
    pub value2: Option<Value>,
    pub same: bool,
}

impl AtomicDiff {
    /// Leaf with both sides present.
    #[must_use]
    pub const fn both(value1: Value, value2: Value, same: bool) -> Self {
        Self {
            value1: Some(value1),
            value2: Some(value2),
            same,
        }
    }

    /// Leaf present only on side 1. Never `same`.
    #[must_use]
    pub const fn only1(value1: Value) -> Self {
        Self {
            value1: Some(value1),
            value2: None,
            same: false,
        }
    }

    /// Leaf present only on side 2. Never `same`.
    #[must_use]
    pub const fn only2(value2: Value) -> Self {
        Self {
            value1: None,
            value2: Some(value2),
            same: false,
        }
    }

    #[must_use]
    pub const fn diff_type(&self) -> DiffType {
        match (&self.value1, &self.value2) {
            (Some(_), Some(_)) => DiffType::Both,
            (Some(_), None) => DiffType::OnlyIn1,
            _ => DiffType::OnlyIn2,
        }
    }
}

/// One positional entry of an array comparison.
#[derive(Debug, Clone)]
pub struct ArrayEntry {
    pub index: usize,
    pub difference: Difference,
}

/// Positional array comparison (no alignment heuristics).
#[derive(Debug, Clone)]
pub struct ArrayDiff {
    pub value1: Value,
    pub value2: Value,
    pub len1: usize,
    pub len2: usize,
    pub same: bool,
    pub truncated: bool,
    pub entries: Vec<ArrayEntry>,
}

impl ArrayDiff {
    #[must_use]
    pub const fn new(value1: Value, value2: Value, len1: usize, len2: usize) -> Self {
        Self {
            value1,
            value2,
            len1,
            len2,
            same: true,
            truncated: false,
            entries: Vec::new(),
        }
    }

    pub fn add_comparison(&mut self, index: usize, difference: Difference) {
        if self.same && !difference.same() {
            self.same = false;
        }
        self.entries.push(ArrayEntry { index, difference });
    }
}

/// One keyed entry of an object comparison. Side presence is derived from
/// the entry's difference.
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    pub key: String,
    pub difference: Difference,
}

/// Object comparison. Entry order: common keys first in key-iteration order
/// of side 1, then keys only in side 1, then keys only in side 2.
#[derive(Debug, Clone)]
pub struct ObjectDiff {
    pub value1: Value,
    pub value2: Value,
    pub class_name1: Option<String>,
    pub class_name2: Option<String>,
    pub same: bool,
    pub truncated: bool,
    pub entries: Vec<ObjectEntry>,
}

impl ObjectDiff {
    #[must_use]
    pub fn new(value1: Value, value2: Value) -> Self {
        let class_name1 = value1.class_name();
        let class_name2 = value2.class_name();
        Self {
            value1,
            value2,
            class_name1,
            class_name2,
            same: true,
            truncated: false,
            entries: Vec::new(),
        }
    }

    pub fn add_comparison(&mut self, key: impl Into<String>, difference: Difference) {
        if self.same && !difference.same() {
            self.same = false;
        }
        self.entries.push(ObjectEntry {
            key: key.into(),
            difference,
        });
    }
}

/// One element entry of a set comparison.
#[derive(Debug, Clone)]
pub struct SetEntry {
    pub membership: Membership,
    pub difference: Difference,
}

/// Set comparison; elements are matched by identity, then structurally.
#[derive(Debug, Clone)]
pub struct SetDiff {
    pub value1: Value,
    pub value2: Value,
    pub size1: usize,
    pub size2: usize,
    pub same: bool,
    pub truncated: bool,
    pub entries: Vec<SetEntry>,
}

impl SetDiff {
    #[must_use]
    pub const fn new(value1: Value, value2: Value, size1: usize, size2: usize) -> Self {
        Self {
            value1,
            value2,
            size1,
            size2,
            same: true,
            truncated: false,
            entries: Vec::new(),
        }
    }

    pub fn add_comparison(&mut self, membership: Membership, difference: Difference) {
        if self.same && !difference.same() {
            self.same = false;
        }
        self.entries.push(SetEntry {
            membership,
            difference,
        });
    }
}

/// One entry of a map comparison: the key pairing plus the value comparison
/// at that key.
#[derive(Debug, Clone)]
pub struct MapEntry {
    pub membership: Membership,
    pub key_difference: Difference,
    pub value_difference: Difference,
}

/// Map comparison; keys are matched like set elements, values are
/// deep-compared for every matched key pair.
#[derive(Debug, Clone)]
pub struct MapDiff {
    pub value1: Value,
    pub value2: Value,
    pub size1: usize,
    pub size2: usize,
    pub same: bool,
    pub truncated: bool,
    pub entries: Vec<MapEntry>,
}

impl MapDiff {
    #[must_use]
    pub const fn new(value1: Value, value2: Value, size1: usize, size2: usize) -> Self {
        Self {
            value1,
            value2,
            size1,
            size2,
            same: true,
            truncated: false,
            entries: Vec::new(),
        }
    }

    pub fn add_comparison(
        &mut self,
        membership: Membership,
        key_difference: Difference,
        value_difference: Difference,
    ) {
        if self.same && (!key_difference.same() || !value_difference.same()) {
            self.same = false;
        }
        self.entries.push(MapEntry {
            membership,
            key_difference,
            value_difference,
        });
    }
}

/// Re-entry into an already-visited pair. The ids are the cycle linkage
/// tokens stamped by `mark_visited`; a side without a visited counterpart
/// has no id (and renders as absent). The first-visit paths are kept for
/// location reporting.
#[derive(Debug, Clone)]
pub struct ReferenceDiff {
    pub ref1: Option<u32>,
    pub ref2: Option<u32>,
    pub path1: Option<Vec<PathSegment>>,
    pub path2: Option<Vec<PathSegment>>,
    pub same: bool,
}

impl ReferenceDiff {
    #[must_use]
    pub const fn diff_type(&self) -> DiffType {
        match (&self.ref1, &self.ref2) {
            (Some(_), None) => DiffType::OnlyIn1,
            (None, Some(_)) => DiffType::OnlyIn2,
            _ => DiffType::Both,
        }
    }
}

/// A structural difference between two values.
#[derive(Debug, Clone)]
pub enum Difference {
    Atomic(AtomicDiff),
    Array(ArrayDiff),
    Object(ObjectDiff),
    Set(SetDiff),
    Map(MapDiff),
    Reference(ReferenceDiff),
}

impl Difference {
    /// True iff every descendant comparison reported equality.
    #[must_use]
    pub const fn same(&self) -> bool {
        match self {
            Self::Atomic(d) => d.same,
            Self::Array(d) => d.same,
            Self::Object(d) => d.same,
            Self::Set(d) => d.same,
            Self::Map(d) => d.same,
            Self::Reference(d) => d.same,
        }
    }

    /// Which sides this node carries. Container nodes are only built when
    /// both sides are present.
    #[must_use]
    pub const fn diff_type(&self) -> DiffType {
        match self {
            Self::Atomic(d) => d.diff_type(),
            Self::Reference(d) => d.diff_type(),
            Self::Array(_) | Self::Object(_) | Self::Set(_) | Self::Map(_) => DiffType::Both,
        }
    }

    /// Whether this node's traversal was cut short by the entry budget.
    #[must_use]
    pub const fn truncated(&self) -> bool {
        match self {
            Self::Array(d) => d.truncated,
            Self::Object(d) => d.truncated,
            Self::Set(d) => d.truncated,
            Self::Map(d) => d.truncated,
            Self::Atomic(_) | Self::Reference(_) => false,
        }
    }

    /// Mark a container as truncated. Unexamined children may differ, so the
    /// node conservatively stops reporting `same`.
    pub(crate) fn mark_truncated(&mut self) {
        match self {
            Self::Array(d) => {
                d.truncated = true;
                d.same = false;
            }
            Self::Object(d) => {
                d.truncated = true;
                d.same = false;
            }
            Self::Set(d) => {
                d.truncated = true;
                d.same = false;
            }
            Self::Map(d) => {
                d.truncated = true;
                d.same = false;
            }
            Self::Atomic(_) | Self::Reference(_) => {}
        }
    }
}
