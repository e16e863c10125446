//! The [`Value`] enum and SameValueZero equality.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// Shared array storage.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;
/// Shared object storage.
pub type ObjectRef = Rc<RefCell<ObjectValue>>;
/// Shared map storage (insertion-ordered, arbitrary keys).
pub type MapRef = Rc<RefCell<Vec<(Value, Value)>>>;
/// Shared set storage (insertion-ordered).
pub type SetRef = Rc<RefCell<Vec<Value>>>;

/// An object: optional class identity plus insertion-ordered entries.
#[derive(Debug, Clone, Default)]
pub struct ObjectValue {
    /// Constructor/class name; `None` means a plain anonymous object.
    pub class_name: Option<String>,
    pub entries: IndexMap<String, Value>,
}

/// A function value. Functions are opaque: only reference identity matters.
#[derive(Debug, Clone)]
pub struct FuncValue {
    pub name: String,
}

/// Regex flags, compared individually alongside the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegexFlags {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub sticky: bool,
    pub unicode: bool,
}

impl RegexFlags {
    /// Parse from a compact flag string such as `"gi"`.
    /// Unknown characters are ignored.
    #[must_use]
    pub fn parse(flags: &str) -> Self {
        let mut out = Self::default();
        for c in flags.chars() {
            match c {
                'g' => out.global = true,
                'i' => out.ignore_case = true,
                'm' => out.multiline = true,
                's' => out.dot_all = true,
                'y' => out.sticky = true,
                'u' => out.unicode = true,
                _ => {}
            }
        }
        out
    }

    /// Render back to the compact flag string, in canonical order.
    #[must_use]
    pub fn as_string(&self) -> String {
        let mut s = String::new();
        if self.global {
            s.push('g');
        }
        if self.ignore_case {
            s.push('i');
        }
        if self.multiline {
            s.push('m');
        }
        if self.dot_all {
            s.push('s');
        }
        if self.unicode {
            s.push('u');
        }
        if self.sticky {
            s.push('y');
        }
        s
    }
}

/// A regex value: source plus flags, compared structurally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexValue {
    pub source: String,
    pub flags: RegexFlags,
}

/// A dynamically shaped value.
///
/// Containers clone shallowly (shared storage), so a `Value` can participate
/// in several structures at once and can reference itself.
#[derive(Clone)]
pub enum Value {
    Null,
    Undefined,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Milliseconds since the Unix epoch.
    Date(i64),
    Regex(RegexValue),
    Func(Rc<FuncValue>),
    Array(ArrayRef),
    Object(ObjectRef),
    Map(MapRef),
    Set(SetRef),
}

impl Value {
    /// A string value.
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// An array from the given items.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Array(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// A plain object from `(key, value)` pairs.
    pub fn object<'a>(entries: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        Self::Object(Rc::new(RefCell::new(ObjectValue {
            class_name: None,
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        })))
    }

    /// An object carrying a class/constructor name.
    pub fn object_with_class<'a>(
        class_name: impl Into<String>,
        entries: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Self {
        let value = Self::object(entries);
        if let Self::Object(obj) = &value {
            obj.borrow_mut().class_name = Some(class_name.into());
        }
        value
    }

    /// A map from `(key, value)` pairs, preserving insertion order.
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Self::Map(Rc::new(RefCell::new(entries.into_iter().collect())))
    }

    /// A set from the given elements, preserving insertion order.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Set(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// A named function value with fresh identity.
    pub fn func(name: impl Into<String>) -> Self {
        Self::Func(Rc::new(FuncValue { name: name.into() }))
    }

    /// A regex from source and a compact flag string such as `"gi"`.
    pub fn regex(source: impl Into<String>, flags: &str) -> Self {
        Self::Regex(RegexValue {
            source: source.into(),
            flags: RegexFlags::parse(flags),
        })
    }

    /// A date from epoch milliseconds.
    #[must_use]
    pub const fn date(epoch_millis: i64) -> Self {
        Self::Date(epoch_millis)
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_set(&self) -> Option<&SetRef> {
        match self {
            Self::Set(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Allocation identity for containers and functions; `None` for values
    /// without reference identity.
    #[must_use]
    pub fn identity(&self) -> Option<usize> {
        match self {
            Self::Array(a) => Some(Rc::as_ptr(a) as usize),
            Self::Object(o) => Some(Rc::as_ptr(o) as usize),
            Self::Map(m) => Some(Rc::as_ptr(m) as usize),
            Self::Set(s) => Some(Rc::as_ptr(s) as usize),
            Self::Func(f) => Some(Rc::as_ptr(f) as usize),
            _ => None,
        }
    }

    /// Class name of an object value, if any.
    #[must_use]
    pub fn class_name(&self) -> Option<String> {
        match self {
            Self::Object(o) => o.borrow().class_name.clone(),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// SameValueZero-style equality.
///
/// `NaN` equals `NaN`, `0.0` equals `-0.0`, mixed `Int`/`Float` compare
/// numerically. Containers and functions compare by identity; `Date` by
/// epoch millis, `Regex` by source plus flags. Cross-shape is always false.
#[must_use]
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) | (Value::Undefined, Value::Undefined) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => (x.is_nan() && y.is_nan()) || x == y,
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => {
            #[allow(clippy::cast_precision_loss)]
            {
                *x as f64 == *y
            }
        }
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Date(x), Value::Date(y)) => x == y,
        (Value::Regex(x), Value::Regex(y)) => x == y,
        _ => match (a.identity(), b.identity()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

// Derived Debug would recurse forever on cyclic containers, so Value prints
// through a cycle-guarded writer.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut seen = Vec::new();
        debug_fmt(self, f, &mut seen)
    }
}

fn debug_fmt(value: &Value, f: &mut fmt::Formatter<'_>, seen: &mut Vec<usize>) -> fmt::Result {
    if let Some(id) = value.identity() {
        if seen.contains(&id) {
            return write!(f, "<cycle>");
        }
        seen.push(id);
    }
    let result = match value {
        Value::Null => write!(f, "null"),
        Value::Undefined => write!(f, "undefined"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Int(i) => write!(f, "{i}"),
        Value::Float(x) => write!(f, "{x}"),
        Value::Str(s) => write!(f, "{s:?}"),
        Value::Date(ms) => write!(f, "Date({ms})"),
        Value::Regex(r) => write!(f, "/{}/{}", r.source, r.flags.as_string()),
        Value::Func(func) => write!(f, "[Function: {}]", func.name),
        Value::Array(items) => {
            write!(f, "[")?;
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                debug_fmt(item, f, seen)?;
            }
            write!(f, "]")
        }
        Value::Object(obj) => {
            let obj = obj.borrow();
            if let Some(name) = &obj.class_name {
                write!(f, "{name} ")?;
            }
            write!(f, "{{")?;
            for (i, (key, item)) in obj.entries.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key:?}: ")?;
                debug_fmt(item, f, seen)?;
            }
            write!(f, "}}")
        }
        Value::Map(entries) => {
            write!(f, "Map {{")?;
            for (i, (key, val)) in entries.borrow().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                debug_fmt(key, f, seen)?;
                write!(f, " => ")?;
                debug_fmt(val, f, seen)?;
            }
            write!(f, "}}")
        }
        Value::Set(items) => {
            write!(f, "Set {{")?;
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                debug_fmt(item, f, seen)?;
            }
            write!(f, "}}")
        }
    };
    if let Some(id) = value.identity() {
        // keep siblings free to repeat shared (acyclic) references
        seen.retain(|&other| other != id);
    }
    result
}
