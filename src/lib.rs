//! **Deep structural diffing with a synchronized three-column report.**
//!
//! `deepdiff` compares two arbitrarily shaped, possibly cyclic values and
//! records everything it examined, equal entries included, in a
//! [`Difference`] tree. The tree can then be rendered as an aligned
//! received/expected report, the kind of output an assertion framework
//! prints when a deep equality check fails.
//!
//! ## Key Features
//!
//! - **Structural comparison**: arrays positionally, objects by key, `Map`
//!   and `Set` by identity first and by structural equality as a fallback,
//!   so `Set { {a: 1} }` equals `Set { {a: 1} }` even across allocations.
//! - **Cycle safety**: both compare and render terminate on self-referential
//!   input; matching cycles count as equal, mismatched reference wiring is
//!   reported as a difference.
//! - **Three-column rendering**: received values left, expected values
//!   right, array indices in a narrow middle gutter, with corresponding
//!   entries kept on the same rows even when one side's subtree is taller.
//! - **Tunable traversal**: equal-entry omission, class identity checking,
//!   an entry budget for huge structures, and a recursion depth cap.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the [`Value`] enum — the dynamically shaped input the
//!   engine compares — and SameValueZero equality ([`same_value`]).
//! - **[`diff`]**: the compare engine. [`compare`] and [`compare_with`]
//!   produce a [`Difference`] tree; [`DiffOptions`] tunes the traversal.
//! - **[`reports`]**: [`render_difference`] for the three-column report and
//!   [`serialize_value`] for pretty-printing a single value.
//! - **[`error`]**: the [`DeepDiffError`] taxonomy shared by both stages.
//!
//! ## Getting Started
//!
//! ```
//! use deepdiff::{compare, render_difference, RenderConfig, Value};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let received = Value::object([
//!         ("name", Value::str("widget")),
//!         ("count", Value::Int(2)),
//!     ]);
//!     let expected = Value::object([
//!         ("name", Value::str("widget")),
//!         ("count", Value::Int(3)),
//!     ]);
//!
//!     let diff = compare(&received, &expected)?;
//!     assert!(!diff.same());
//!
//!     println!("{}", render_difference(&diff, &RenderConfig::default())?);
//!     Ok(())
//! }
//! ```
//!
//! ### Tuning the traversal
//!
//! ```
//! use deepdiff::{compare_with, DiffOptions, Value};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let a = Value::array((0..1000).map(Value::Int));
//!     let b = Value::array((1..1001).map(Value::Int));
//!
//!     let options = DiffOptions::default()
//!         .omit_equal(true)
//!         .max_differences(25);
//!     let diff = compare_with(&a, &b, &options)?;
//!     assert!(!diff.same());
//!     assert!(diff.truncated());
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Doc completeness: # Errors sections exist on the public entry points,
    // not on every internal fallible helper
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Stream renderers are long match-heavy functions — splitting hurts readability
    clippy::too_many_lines,
    // Variable names like `val1`/`val2` or `min`/`mid` are clear in context
    clippy::similar_names
)]

pub mod diff;
pub mod error;
pub mod model;
pub mod reports;

// Re-export main types for convenience
pub use diff::{
    compare, compare_with, display_path, DiffOptions, DiffType, Difference, Membership,
    PathSegment,
};
pub use error::{DeepDiffError, ErrorContext, Result};
pub use model::{same_value, Shape, Value};
pub use reports::{
    render_difference, render_difference_columns, serialize_value, RenderConfig, SerializeConfig,
};
