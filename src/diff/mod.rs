//! Deep structural comparison.
//!
//! The entry points are [`compare`] and [`compare_with`]; they walk both
//! values simultaneously and produce a [`Difference`] tree that records
//! every examined entry, equal or not, for the renderers in
//! [`crate::reports`].

mod engine;
mod engine_matching;
mod options;
mod path;
mod result;
mod state;

pub use engine::{compare, compare_with};
pub use options::DiffOptions;
pub use path::{display_path, PathSegment};
pub use result::{
    ArrayDiff, ArrayEntry, AtomicDiff, DiffType, Difference, MapDiff, MapEntry, Membership,
    ObjectDiff, ObjectEntry, ReferenceDiff, SetDiff, SetEntry,
};
