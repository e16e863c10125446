//! Configuration for the compare engine.

use serde::{Deserialize, Serialize};

use crate::error::{DeepDiffError, Result};

/// Options applied consistently at every container level of a comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Omit fully-equal subtrees from container entry lists.
    pub omit_equal: bool,
    /// Treat object-shaped values with different class names as
    /// shape-mismatched, even when structurally identical.
    pub require_same_class: bool,
    /// Cap on total collected difference entries; reaching it truncates the
    /// traversal (containers are flagged and stop reporting `same`).
    pub max_differences: usize,
    /// Recursion depth cap; exceeding it aborts the compare call with a
    /// "too deep" error instead of overflowing the native stack.
    pub max_depth: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            omit_equal: false,
            require_same_class: false,
            max_differences: usize::MAX,
            max_depth: 512,
        }
    }
}

impl DiffOptions {
    /// Enable or disable omission of equal subtrees.
    #[must_use]
    pub const fn omit_equal(mut self, omit: bool) -> Self {
        self.omit_equal = omit;
        self
    }

    /// Enable or disable class identity checking for objects.
    #[must_use]
    pub const fn require_same_class(mut self, require: bool) -> Self {
        self.require_same_class = require;
        self
    }

    /// Set the entry budget.
    #[must_use]
    pub const fn max_differences(mut self, max: usize) -> Self {
        self.max_differences = max;
        self
    }

    /// Set the recursion depth cap.
    #[must_use]
    pub const fn max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
        self
    }

    /// Reject malformed option combinations at call time.
    pub fn validate(&self) -> Result<()> {
        if self.max_differences == 0 {
            return Err(DeepDiffError::config("max_differences must be at least 1"));
        }
        if self.max_depth == 0 {
            return Err(DeepDiffError::config("max_depth must be at least 1"));
        }
        Ok(())
    }
}
