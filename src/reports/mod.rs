//! Rendering of difference trees for human consumption.
//!
//! [`serialize_value`] pretty-prints a single value; [`render_difference`]
//! produces the full three-column received/expected report.

mod serialize;
mod sidebyside;
mod textblock;

pub use serialize::{serialize_value, SerializeConfig};
pub use sidebyside::{render_difference, render_difference_columns, RenderConfig};
