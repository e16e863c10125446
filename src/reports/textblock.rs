//! Line-oriented text accumulation with synchronization points.

/// A marker recorded at a line boundary. `line` is the index of the first
/// line of the segment that follows the boundary; `depth` is the structural
/// nesting depth the boundary belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SyncPoint {
    pub line: usize,
    pub depth: usize,
}

/// An append-only block of text lines with indentation tracking.
///
/// Indentation is applied lazily: a line only receives its indent prefix
/// when the first non-empty text lands on it, so blank lines stay truly
/// blank and sync points always sit on empty lines.
#[derive(Debug)]
pub(crate) struct TextBlock {
    lines: Vec<String>,
    syncs: Vec<SyncPoint>,
    indent_unit: String,
    indent_level: usize,
}

impl TextBlock {
    pub fn new(indent_width: usize) -> Self {
        Self {
            lines: vec![String::new()],
            syncs: Vec::new(),
            indent_unit: " ".repeat(indent_width),
            indent_level: 0,
        }
    }

    pub fn push_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn pop_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Start a new line.
    pub fn newline(&mut self) {
        self.lines.push(String::new());
    }

    /// Append text to the current line. Embedded newlines split the text
    /// across lines; continuation lines are indented like any other.
    pub fn write(&mut self, text: &str) {
        for (i, piece) in text.split('\n').enumerate() {
            if i > 0 {
                self.newline();
            }
            if piece.is_empty() {
                continue;
            }
            if let Some(current) = self.lines.last_mut() {
                if current.is_empty() {
                    for _ in 0..self.indent_level {
                        current.push_str(&self.indent_unit);
                    }
                }
                current.push_str(piece);
            }
        }
    }

    /// Record a synchronization point at the current (empty) line.
    pub fn sync(&mut self, depth: usize) {
        debug_assert!(
            self.lines.last().map_or(true, |line| line.is_empty()),
            "sync points must sit on line boundaries"
        );
        self.syncs.push(SyncPoint {
            line: self.lines.len() - 1,
            depth,
        });
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<SyncPoint>) {
        (self.lines, self.syncs)
    }

    /// Collapse into a plain string, dropping sync information.
    pub fn into_string(self) -> String {
        self.lines.join("\n")
    }
}
