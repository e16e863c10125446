//! Coarse runtime shape of a value.

use std::fmt;

use super::Value;

/// The coarse runtime category used for the engine's initial dispatch.
///
/// Two values with different shapes always produce a leaf difference, even
/// when both are container-like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Array,
    Object,
    Map,
    Set,
    Function,
    Regex,
    Date,
    /// Primitives: null, undefined, booleans, numbers, strings.
    Other,
}

impl Shape {
    /// Compute the shape of a value. Cheap; computed once per compared pair.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
            Value::Map(_) => Self::Map,
            Value::Set(_) => Self::Set,
            Value::Func(_) => Self::Function,
            Value::Regex(_) => Self::Regex,
            Value::Date(_) => Self::Date,
            Value::Null
            | Value::Undefined
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Str(_) => Self::Other,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Array => "Array",
            Self::Object => "Object",
            Self::Map => "Map",
            Self::Set => "Set",
            Self::Function => "Function",
            Self::Regex => "Regex",
            Self::Date => "Date",
            Self::Other => "Other",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_dispatch() {
        assert_eq!(Shape::of(&Value::Null), Shape::Other);
        assert_eq!(Shape::of(&Value::Int(1)), Shape::Other);
        assert_eq!(Shape::of(&Value::array([])), Shape::Array);
        assert_eq!(Shape::of(&Value::object([])), Shape::Object);
        assert_eq!(Shape::of(&Value::map([])), Shape::Map);
        assert_eq!(Shape::of(&Value::set([])), Shape::Set);
        assert_eq!(Shape::of(&Value::func("f")), Shape::Function);
        assert_eq!(Shape::of(&Value::regex("a", "")), Shape::Regex);
        assert_eq!(Shape::of(&Value::date(0)), Shape::Date);
    }
}
