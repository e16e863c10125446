//! Three-column differential rendering.
//!
//! A difference tree is rendered three times, once per column: received
//! values on the left, expected values on the right, and a narrow middle
//! column carrying per-entry markers (array indices). Each stream records
//! sync points at entry boundaries; [`combine`] then interleaves the three
//! line sequences, padding per boundary group, so corresponding entries
//! always share rows even when one side's subtree spans more lines.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use unicode_width::UnicodeWidthStr;

use crate::diff::{
    ArrayDiff, AtomicDiff, Difference, MapDiff, Membership, ObjectDiff, ReferenceDiff, SetDiff,
};
use crate::error::{DeepDiffError, RenderErrorKind, Result};
use crate::model::Value;
use crate::reports::serialize::{serialize_value, SerializeConfig};
use crate::reports::textblock::{SyncPoint, TextBlock};

/// Placeholder for an entry absent on one side.
const MISSING_GLYPH: &str = "░";

/// Layout and labels for the three-column report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Header of the left (received) column.
    pub left_label: String,
    /// Header of the right (expected) column.
    pub right_label: String,
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Limits for serializing leaf values.
    pub serialize: SerializeConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            left_label: "Received".to_string(),
            right_label: "Expected".to_string(),
            indent_width: 2,
            serialize: SerializeConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Set the column header labels.
    #[must_use]
    pub fn labels(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_label = left.into();
        self.right_label = right.into();
        self
    }

    /// Set the indentation width.
    #[must_use]
    pub const fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the leaf serialization limits.
    #[must_use]
    pub fn serialize(mut self, config: SerializeConfig) -> Self {
        self.serialize = config;
        self
    }
}

/// Which of the three output columns a renderer pass produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Left,
    Middle,
    Right,
}

/// Render a difference as a complete three-column report.
///
/// # Errors
///
/// Fails on malformed difference trees (a leaf carrying no value on either
/// side).
pub fn render_difference(difference: &Difference, config: &RenderConfig) -> Result<String> {
    let [left, middle, right] = render_difference_columns(difference, config)?;
    let rows: Vec<String> = left
        .iter()
        .zip(&middle)
        .zip(&right)
        .map(|((l, m), r)| format!("{l} │{m}│ {r}"))
        .collect();
    Ok(rows.join("\n"))
}

/// Render the three aligned, equal-height, space-padded columns.
///
/// Every returned column has the same number of lines, and all lines of one
/// column share one display width.
///
/// # Errors
///
/// Same conditions as [`render_difference`].
pub fn render_difference_columns(
    difference: &Difference,
    config: &RenderConfig,
) -> Result<[Vec<String>; 3]> {
    debug!(same = difference.same(), "rendering difference report");

    let mut sources = Vec::with_capacity(3);
    for stream in [Stream::Left, Stream::Middle, Stream::Right] {
        let mut block = TextBlock::new(config.indent_width);
        match stream {
            Stream::Left => block.write(&config.left_label),
            Stream::Right => block.write(&config.right_label),
            Stream::Middle => {}
        }
        block.newline();
        block.newline();
        block.sync(0);

        let renderer = StreamRenderer { config, stream };
        renderer.render(&mut block, difference, 0)?;
        block.newline();
        block.sync(0);

        sources.push(SyncedSource::new(block));
    }

    let mut columns = combine(sources);
    trim_blank_tail(&mut columns);
    for (i, column) in columns.iter_mut().enumerate() {
        // the middle column keeps a minimum body so separators never touch
        let floor = usize::from(i == 1);
        pad_column(column, floor);
    }
    Ok(columns)
}

// ============================================================================
// Per-stream tree rendering
// ============================================================================

struct StreamRenderer<'a> {
    config: &'a RenderConfig,
    stream: Stream,
}

impl StreamRenderer<'_> {
    fn render(&self, block: &mut TextBlock, difference: &Difference, depth: usize) -> Result<()> {
        match difference {
            Difference::Atomic(atomic) => self.render_atomic(block, atomic),
            Difference::Reference(reference) => {
                self.render_reference(block, reference);
                Ok(())
            }
            Difference::Array(array) => self.render_array(block, array, depth),
            Difference::Object(object) => self.render_object(block, object, depth),
            Difference::Set(set) => self.render_set(block, set, depth),
            Difference::Map(map) => self.render_map(block, map, depth),
        }
    }

    fn render_atomic(&self, block: &mut TextBlock, atomic: &AtomicDiff) -> Result<()> {
        if atomic.value1.is_none() && atomic.value2.is_none() {
            return Err(DeepDiffError::render(
                "rendering leaf comparison",
                RenderErrorKind::EmptyDifference,
            ));
        }
        let side = match self.stream {
            Stream::Left => atomic.value1.as_ref(),
            Stream::Right => atomic.value2.as_ref(),
            Stream::Middle => return Ok(()),
        };
        match side {
            Some(value) => self.write_value(block, value),
            None => block.write(MISSING_GLYPH),
        }
        Ok(())
    }

    fn render_reference(&self, block: &mut TextBlock, reference: &ReferenceDiff) {
        let side = match self.stream {
            Stream::Left => reference.ref1,
            Stream::Right => reference.ref2,
            Stream::Middle => return,
        };
        match side {
            Some(id) => block.write(&format!("[Circular *{id}]")),
            None => block.write(MISSING_GLYPH),
        }
    }

    fn render_array(&self, block: &mut TextBlock, array: &ArrayDiff, depth: usize) -> Result<()> {
        if array.entries.is_empty() && !array.truncated {
            self.write_sides(block, "[]");
            return Ok(());
        }
        self.open(block, "[");
        for (pos, entry) in array.entries.iter().enumerate() {
            block.newline();
            block.sync(depth + 1);
            if self.stream == Stream::Middle {
                block.write(&entry.index.to_string());
                self.render(block, &entry.difference, depth + 1)?;
            } else {
                self.render(block, &entry.difference, depth + 1)?;
                let present = self.carries_side(&entry.difference);
                if present && (pos + 1 < array.entries.len() || array.truncated) {
                    block.write(",");
                }
            }
        }
        self.close(block, array.truncated, depth, "]");
        Ok(())
    }

    fn render_object(&self, block: &mut TextBlock, object: &ObjectDiff, depth: usize) -> Result<()> {
        if self.stream != Stream::Middle {
            let class_name = match self.stream {
                Stream::Left => &object.class_name1,
                _ => &object.class_name2,
            };
            if let Some(name) = class_name {
                block.write(name);
                block.write(" ");
            }
        }
        if object.entries.is_empty() && !object.truncated {
            self.write_sides(block, "{}");
            return Ok(());
        }
        self.open(block, "{");
        for (pos, entry) in object.entries.iter().enumerate() {
            block.newline();
            block.sync(depth + 1);
            if self.stream == Stream::Middle {
                block.write(" ");
                self.render(block, &entry.difference, depth + 1)?;
            } else if self.carries_side(&entry.difference) {
                block.write(&format!("{:?}: ", entry.key));
                self.render(block, &entry.difference, depth + 1)?;
                if pos + 1 < object.entries.len() || object.truncated {
                    block.write(",");
                }
            } else {
                block.write(MISSING_GLYPH);
            }
        }
        self.close(block, object.truncated, depth, "}");
        Ok(())
    }

    fn render_set(&self, block: &mut TextBlock, set: &SetDiff, depth: usize) -> Result<()> {
        if self.stream != Stream::Middle {
            let size = match self.stream {
                Stream::Left => set.size1,
                _ => set.size2,
            };
            block.write(&format!("Set ({size}) "));
        }
        if set.entries.is_empty() && !set.truncated {
            self.write_sides(block, "{}");
            return Ok(());
        }
        self.open(block, "{");
        for (pos, entry) in set.entries.iter().enumerate() {
            block.newline();
            block.sync(depth + 1);
            if self.stream == Stream::Middle {
                block.write(" ");
                self.render(block, &entry.difference, depth + 1)?;
            } else {
                self.render(block, &entry.difference, depth + 1)?;
                let present = self.member_present(entry.membership);
                if present && (pos + 1 < set.entries.len() || set.truncated) {
                    block.write(",");
                }
            }
        }
        self.close(block, set.truncated, depth, "}");
        Ok(())
    }

    fn render_map(&self, block: &mut TextBlock, map: &MapDiff, depth: usize) -> Result<()> {
        if self.stream != Stream::Middle {
            let size = match self.stream {
                Stream::Left => map.size1,
                _ => map.size2,
            };
            block.write(&format!("Map ({size}) "));
        }
        if map.entries.is_empty() && !map.truncated {
            self.write_sides(block, "{}");
            return Ok(());
        }
        self.open(block, "{");
        for (pos, entry) in map.entries.iter().enumerate() {
            block.newline();
            block.sync(depth + 1);
            if self.stream == Stream::Middle {
                block.write(" ");
                self.render(block, &entry.key_difference, depth + 1)?;
                self.render(block, &entry.value_difference, depth + 1)?;
            } else if self.member_present(entry.membership) {
                self.render(block, &entry.key_difference, depth + 1)?;
                block.write(" => ");
                self.render(block, &entry.value_difference, depth + 1)?;
                if pos + 1 < map.entries.len() || map.truncated {
                    block.write(",");
                }
            } else {
                block.write(MISSING_GLYPH);
            }
        }
        self.close(block, map.truncated, depth, "}");
        Ok(())
    }

    fn open(&self, block: &mut TextBlock, token: &str) {
        if self.stream != Stream::Middle {
            block.write(token);
            block.push_indent();
        }
    }

    fn close(&self, block: &mut TextBlock, truncated: bool, depth: usize, token: &str) {
        if truncated {
            block.newline();
            block.sync(depth + 1);
            if self.stream != Stream::Middle {
                block.write("…");
            }
        }
        block.newline();
        block.sync(depth + 1);
        if self.stream != Stream::Middle {
            block.pop_indent();
            block.write(token);
        }
    }

    fn write_sides(&self, block: &mut TextBlock, text: &str) {
        if self.stream != Stream::Middle {
            block.write(text);
        }
    }

    fn write_value(&self, block: &mut TextBlock, value: &Value) {
        block.write(&serialize_value(value, &self.config.serialize));
    }

    /// Whether an entry has content on this stream's side.
    fn carries_side(&self, difference: &Difference) -> bool {
        use crate::diff::DiffType;
        match (self.stream, difference.diff_type()) {
            (Stream::Left, DiffType::OnlyIn2) | (Stream::Right, DiffType::OnlyIn1) => false,
            _ => true,
        }
    }

    fn member_present(&self, membership: Membership) -> bool {
        match (self.stream, membership) {
            (Stream::Left, Membership::OnlyIn2) | (Stream::Right, Membership::OnlyIn1) => false,
            _ => true,
        }
    }
}

// ============================================================================
// Stream combination
// ============================================================================

/// One rendered stream being consumed sync point by sync point.
struct SyncedSource {
    lines: Vec<String>,
    syncs: VecDeque<SyncPoint>,
    cursor: usize,
}

impl SyncedSource {
    fn new(block: TextBlock) -> Self {
        let (lines, syncs) = block.into_parts();
        Self {
            lines,
            syncs: syncs.into(),
            cursor: 0,
        }
    }

    fn next_depth(&self) -> Option<usize> {
        self.syncs.front().map(|sync| sync.depth)
    }

    /// Flush lines up to the next sync boundary.
    fn advance(&mut self, out: &mut Vec<String>) {
        if let Some(sync) = self.syncs.pop_front() {
            while self.cursor < sync.line {
                out.push(self.lines[self.cursor].clone());
                self.cursor += 1;
            }
        }
    }

    fn flush_rest(&mut self, out: &mut Vec<String>) {
        while self.cursor < self.lines.len() {
            out.push(self.lines[self.cursor].clone());
            self.cursor += 1;
        }
    }
}

/// Interleave the three streams on their sync points.
///
/// Each round targets the shallowest pending boundary: streams sitting on
/// deeper boundaries flush through them first (their nested lines simply
/// accumulate), then every stream crosses the shared boundary and all
/// columns are padded to the tallest. Corresponding entries therefore start
/// on the same row.
fn combine(mut sources: Vec<SyncedSource>) -> [Vec<String>; 3] {
    let mut outs: [Vec<String>; 3] = [Vec::new(), Vec::new(), Vec::new()];

    loop {
        let Some(min_depth) = sources.iter().filter_map(SyncedSource::next_depth).min() else {
            break;
        };
        trace!(min_depth, "combiner round");
        for (source, out) in sources.iter_mut().zip(outs.iter_mut()) {
            while source.next_depth().map_or(false, |depth| depth > min_depth) {
                source.advance(out);
            }
            if source.next_depth() == Some(min_depth) {
                source.advance(out);
            }
        }
        pad_height(&mut outs);
    }

    for (source, out) in sources.iter_mut().zip(outs.iter_mut()) {
        source.flush_rest(out);
    }
    pad_height(&mut outs);
    outs
}

fn pad_height(outs: &mut [Vec<String>; 3]) {
    let max_len = outs.iter().map(Vec::len).max().unwrap_or(0);
    for out in outs.iter_mut() {
        while out.len() < max_len {
            out.push(String::new());
        }
    }
}

fn trim_blank_tail(columns: &mut [Vec<String>; 3]) {
    while columns.iter().all(|column| {
        column.last().map_or(false, |line| line.is_empty())
    }) {
        for column in columns.iter_mut() {
            column.pop();
        }
    }
}

/// Pad every line of a column to one shared display width.
fn pad_column(column: &mut [String], min_width: usize) {
    let width = column
        .iter()
        .map(|line| line.width())
        .max()
        .unwrap_or(0)
        .max(min_width);
    for line in column.iter_mut() {
        let deficit = width.saturating_sub(line.width());
        for _ in 0..deficit {
            line.push(' ');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compare;

    #[test]
    fn atomic_report_layout() {
        let diff = compare(&Value::Int(1), &Value::Int(2)).unwrap();
        let report = render_difference(&diff, &RenderConfig::default()).unwrap();
        assert_eq!(
            report,
            "Received │ │ Expected\n         │ │         \n1        │ │ 2       "
        );
    }

    #[test]
    fn columns_share_height_and_width() {
        let a = Value::object([("items", Value::array([Value::Int(1), Value::Int(2)]))]);
        let b = Value::object([("items", Value::Int(5))]);
        let diff = compare(&a, &b).unwrap();

        let [left, middle, right] =
            render_difference_columns(&diff, &RenderConfig::default()).unwrap();
        assert_eq!(left.len(), middle.len());
        assert_eq!(left.len(), right.len());
        for lines in [&left, &middle, &right] {
            let width = lines[0].width();
            assert!(lines.iter().all(|line| line.width() == width));
        }
    }

    #[test]
    fn missing_entries_use_the_glyph() {
        let a = Value::object([("only_here", Value::Int(1))]);
        let b = Value::object([]);
        let diff = compare(&a, &b).unwrap();
        let report = render_difference(&diff, &RenderConfig::default()).unwrap();

        assert!(report.contains("\"only_here\": 1"), "got:\n{report}");
        assert!(report.contains(MISSING_GLYPH), "got:\n{report}");
    }

    #[test]
    fn custom_labels() {
        let diff = compare(&Value::Int(1), &Value::Int(2)).unwrap();
        let config = RenderConfig::default().labels("Got", "Want");
        let report = render_difference(&diff, &config).unwrap();
        assert!(report.starts_with("Got"), "got:\n{report}");
        assert!(report.lines().next().unwrap().contains("Want"));
    }

    #[test]
    fn array_indices_in_middle_column() {
        let a = Value::array([Value::Int(1), Value::Int(2)]);
        let b = Value::array([Value::Int(1), Value::Int(9)]);
        let diff = compare(&a, &b).unwrap();

        let [_, middle, _] = render_difference_columns(&diff, &RenderConfig::default()).unwrap();
        let body: Vec<&str> = middle.iter().map(|line| line.trim_end()).collect();
        assert!(body.contains(&"0"), "got: {body:?}");
        assert!(body.contains(&"1"), "got: {body:?}");
    }

    #[test]
    fn circular_references_are_annotated() {
        let a = Value::object([]);
        let b = Value::object([]);
        if let (Value::Object(obj_a), Value::Object(obj_b)) = (&a, &b) {
            obj_a.borrow_mut().entries.insert("next".into(), a.clone());
            obj_b.borrow_mut().entries.insert("next".into(), b.clone());
        }
        let diff = compare(&a, &b).unwrap();
        let report = render_difference(&diff, &RenderConfig::default()).unwrap();
        assert!(report.contains("[Circular *0]"), "got:\n{report}");
    }
}
