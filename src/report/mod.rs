//! Report query engine and text rendering.
//!
//! - `columns`: registry of every report column
//! - `plan`: list declarations, plan building and execution
//! - `render`: fixed-width text output
//! - `builtin`: the reports selectable by flag
//! - `summary`: grand totals

pub mod builtin;
pub mod columns;
pub mod plan;
pub mod render;
pub mod summary;

// Re-export main types and functions
pub use builtin::BuiltinReport;
pub use columns::{CellValue, Column, ColumnSpec, ListType, Row, COLUMNS};
pub use plan::{Direction, ListPlan, ListSpec, SortKey};
pub use render::{render, render_report};
pub use summary::render_summary;
