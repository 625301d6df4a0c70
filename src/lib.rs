//! Load a fixed-schema spreadsheet range, normalize its numeric and percentage
//! cells into canonical floats, and render it as a formatted table.
//!
//! Stages, in order:
//! - `load`: read a sheet range into a `RawTable` of tagged cells
//! - `align`: map the loaded columns onto the configured schema
//! - `normalize`: coerce percentage/plain columns to `f64` (missing on failure)
//! - `format`: per-column display strings
//! - `render`: Markdown / HTML surfaces

pub mod align;
pub mod config;
pub mod error;
pub mod format;
pub mod load;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod table;

pub use config::{ColumnKind, ColumnSchema, ColumnSpec, DatasetConfig, HeaderMode};
pub use error::{Error, Result};
pub use format::{FormattedTable, MISSING_PLACEHOLDER};
pub use load::{CachedSource, FileSource, LoadRequest, TableSource};
pub use pipeline::{build_table, render_dataset};
pub use table::{Cell, RawTable};
