//! Pretty-printing of values into indented multi-line text.
//!
//! This is the leaf renderer the three-column report builds on: whenever a
//! value appears on only one side, or a comparison bottoms out in an atomic
//! leaf, the whole value is serialized through here.

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::model::Value;
use crate::reports::textblock::TextBlock;

/// Limits and layout for value serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializeConfig {
    /// Containers nested deeper than this render collapsed.
    pub max_depth: usize,
    /// Per-container cap on rendered entries; the rest collapse into a
    /// single "N more" line.
    pub max_wide: usize,
    /// Spaces per indentation level.
    pub indent_width: usize,
}

impl Default for SerializeConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_wide: 40,
            indent_width: 2,
        }
    }
}

impl SerializeConfig {
    /// Set the nesting depth cap.
    #[must_use]
    pub const fn max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
        self
    }

    /// Set the per-container entry cap.
    #[must_use]
    pub const fn max_wide(mut self, max: usize) -> Self {
        self.max_wide = max;
        self
    }

    /// Set the indentation width.
    #[must_use]
    pub const fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }
}

/// Serialize a value to indented multi-line text.
#[must_use]
pub fn serialize_value(value: &Value, config: &SerializeConfig) -> String {
    let mut block = TextBlock::new(config.indent_width);
    let mut seen = Vec::new();
    write_value(&mut block, value, config, 0, &mut seen);
    block.into_string()
}

/// Format an atomic (non-container) value on a single line.
fn format_leaf(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Undefined => "undefined".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(x) => {
            if x.is_nan() {
                "NaN".to_string()
            } else if x.is_infinite() {
                if *x > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
            } else {
                x.to_string()
            }
        }
        Value::Str(s) => format!("{s:?}"),
        Value::Date(millis) => match DateTime::from_timestamp_millis(*millis) {
            Some(date) => format!("Date({})", date.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => format!("Date({millis})"),
        },
        Value::Regex(regex) => format!("/{}/{}", regex.source, regex.flags.as_string()),
        Value::Func(func) => format!("[Function: {}]", func.name),
        Value::Array(_) | Value::Object(_) | Value::Map(_) | Value::Set(_) => {
            collapsed(value)
        }
    }
}

/// Collapsed single-line form for a container whose content is elided.
fn collapsed(value: &Value) -> String {
    match value {
        Value::Array(_) => "[…]".to_string(),
        Value::Object(obj) => match &obj.borrow().class_name {
            Some(name) => format!("{name} {{…}}"),
            None => "{…}".to_string(),
        },
        Value::Map(entries) => format!("Map ({}) {{…}}", entries.borrow().len()),
        Value::Set(items) => format!("Set ({}) {{…}}", items.borrow().len()),
        _ => format_leaf(value),
    }
}

fn write_value(
    block: &mut TextBlock,
    value: &Value,
    config: &SerializeConfig,
    depth: usize,
    seen: &mut Vec<usize>,
) {
    let identity = value.identity();
    if let Some(id) = identity {
        if seen.contains(&id) {
            block.write("[Circular]");
            return;
        }
    }
    if !matches!(
        value,
        Value::Array(_) | Value::Object(_) | Value::Map(_) | Value::Set(_)
    ) {
        block.write(&format_leaf(value));
        return;
    }
    if depth >= config.max_depth {
        block.write(&collapsed(value));
        return;
    }

    if let Some(id) = identity {
        seen.push(id);
    }
    match value {
        Value::Array(items) => {
            let items = items.borrow();
            if items.is_empty() {
                block.write("[]");
            } else {
                block.write("[");
                write_entries(block, items.len(), config, |block, i| {
                    write_value(block, &items[i], config, depth + 1, seen);
                });
                block.write("]");
            }
        }
        Value::Object(obj) => {
            let obj = obj.borrow();
            if let Some(name) = &obj.class_name {
                block.write(name);
                block.write(" ");
            }
            if obj.entries.is_empty() {
                block.write("{}");
            } else {
                block.write("{");
                let keys: Vec<&String> = obj.entries.keys().collect();
                write_entries(block, keys.len(), config, |block, i| {
                    block.write(&format!("{:?}: ", keys[i]));
                    if let Some(entry) = obj.entries.get(keys[i]) {
                        write_value(block, entry, config, depth + 1, seen);
                    }
                });
                block.write("}");
            }
        }
        Value::Map(entries) => {
            let entries = entries.borrow();
            block.write(&format!("Map ({}) ", entries.len()));
            if entries.is_empty() {
                block.write("{}");
            } else {
                block.write("{");
                write_entries(block, entries.len(), config, |block, i| {
                    let (key, val) = &entries[i];
                    write_value(block, key, config, depth + 1, seen);
                    block.write(" => ");
                    write_value(block, val, config, depth + 1, seen);
                });
                block.write("}");
            }
        }
        Value::Set(items) => {
            let items = items.borrow();
            block.write(&format!("Set ({}) ", items.len()));
            if items.is_empty() {
                block.write("{}");
            } else {
                block.write("{");
                write_entries(block, items.len(), config, |block, i| {
                    write_value(block, &items[i], config, depth + 1, seen);
                });
                block.write("}");
            }
        }
        _ => {}
    }
    if let Some(id) = identity {
        seen.retain(|&other| other != id);
    }
}

/// Shared entry-list layout: one indented line per entry, commas between,
/// wide containers elided past the configured cap.
fn write_entries(
    block: &mut TextBlock,
    count: usize,
    config: &SerializeConfig,
    mut write_entry: impl FnMut(&mut TextBlock, usize),
) {
    let shown = count.min(config.max_wide);
    block.push_indent();
    for i in 0..shown {
        block.newline();
        write_entry(block, i);
        if i + 1 < shown || shown < count {
            block.write(",");
        }
    }
    if shown < count {
        block.newline();
        block.write(&format!("… ({} more)", count - shown));
    }
    block.pop_indent();
    block.newline();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serialize(value: &Value) -> String {
        serialize_value(value, &SerializeConfig::default())
    }

    #[test]
    fn leaves() {
        assert_eq!(serialize(&Value::Null), "null");
        assert_eq!(serialize(&Value::Undefined), "undefined");
        assert_eq!(serialize(&Value::Float(f64::NAN)), "NaN");
        assert_eq!(serialize(&Value::str("hi")), "\"hi\"");
        assert_eq!(serialize(&Value::regex("a+", "gi")), "/a+/gi");
        assert_eq!(serialize(&Value::func("handler")), "[Function: handler]");
        assert_eq!(
            serialize(&Value::date(0)),
            "Date(1970-01-01T00:00:00.000Z)"
        );
    }

    #[test]
    fn nested_containers() {
        let value = Value::object([
            ("items", Value::array([Value::Int(1), Value::Int(2)])),
            ("name", Value::str("x")),
        ]);
        assert_eq!(
            serialize(&value),
            "{\n  \"items\": [\n    1,\n    2\n  ],\n  \"name\": \"x\"\n}"
        );
    }

    #[test]
    fn class_names_and_collections() {
        let value = Value::object_with_class("Point", [("x", Value::Int(1))]);
        assert_eq!(serialize(&value), "Point {\n  \"x\": 1\n}");

        let value = Value::set([Value::Int(1)]);
        assert_eq!(serialize(&value), "Set (1) {\n  1\n}");

        let value = Value::map([(Value::str("k"), Value::Int(1))]);
        assert_eq!(serialize(&value), "Map (1) {\n  \"k\" => 1\n}");

        assert_eq!(serialize(&Value::array([])), "[]");
        assert_eq!(serialize(&Value::set([])), "Set (0) {}");
    }

    #[test]
    fn cycles_are_guarded() {
        let value = Value::object([]);
        if let Value::Object(obj) = &value {
            obj.borrow_mut().entries.insert("me".into(), value.clone());
        }
        assert_eq!(serialize(&value), "{\n  \"me\": [Circular]\n}");
    }

    #[test]
    fn depth_cap_collapses() {
        let value = Value::array([Value::array([Value::array([Value::Int(1)])])]);
        let config = SerializeConfig::default().max_depth(2);
        assert_eq!(
            serialize_value(&value, &config),
            "[\n  [\n    […]\n  ]\n]"
        );
    }

    #[test]
    fn wide_cap_elides() {
        let value = Value::array((0..5).map(Value::Int));
        let config = SerializeConfig::default().max_wide(3);
        assert_eq!(
            serialize_value(&value, &config),
            "[\n  0,\n  1,\n  2,\n  … (2 more)\n]"
        );
    }
}
