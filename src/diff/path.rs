//! Structural paths for location reporting.

use std::fmt;

use crate::model::Value;

/// One step in a structural path, used to tell a caller where inside the
/// compared structures a difference (or a cycle target) lives.
#[derive(Debug, Clone)]
pub enum PathSegment {
    ObjectKey(String),
    ArrayIndex(usize),
    MapKey(Value),
    SetElement(Value),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectKey(key) => write!(f, ".{key}"),
            Self::ArrayIndex(index) => write!(f, "[ {index} ]"),
            Self::MapKey(key) => write!(f, ".get({key:?})"),
            Self::SetElement(element) => write!(f, ".element({element:?})"),
        }
    }
}

/// Join a path into a single human-readable location string.
#[must_use]
pub fn display_path(path: &[PathSegment]) -> String {
    path.iter().map(ToString::to_string).collect()
}
